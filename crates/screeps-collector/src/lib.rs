//! screeps-collector — the collection loop of the Screeps exporter.
//!
//! # Architecture
//!
//! ```text
//! Collector::run()            ← one background task, one cycle at a time
//!   └── collect_once()
//!         ├── Fetcher::fetch(AccountSummary) ┐
//!         ├── Fetcher::fetch(MarketOrders)   ├ joined; any error aborts the cycle
//!         ├── Fetcher::fetch(ShardStats) × N ┘
//!         ├── decode → GameState
//!         ├── project → Projection
//!         └── MetricStore::publish + processing-time observation
//! ```
//!
//! A failed cycle publishes nothing, so the store keeps the values of the
//! last successful cycle until the next tick.

pub mod collector;
pub mod error;
pub mod fetcher;

pub use collector::{Collector, CycleReport};
pub use error::{CollectError, CollectResult, FetchError, FetchResult};
pub use fetcher::{Fetcher, HttpFetcher, Resource};
