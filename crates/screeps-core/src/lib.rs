//! screeps-core — shared types for the Screeps exporter.
//!
//! Holds the canonical [`GameState`] model every decoder converges on and
//! the [`ExporterConfig`] consumed by the fetcher and collection loop.
//!
//! # Architecture
//!
//! ```text
//! GameState
//!   ├── AccountSummary (money, resources, cpu per shard)
//!   ├── shards: shard → ShardState
//!   │     └── rooms: room → RoomState
//!   └── market_orders: shard → [MarketOrder]
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use config::{DecodeMode, ExporterConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
