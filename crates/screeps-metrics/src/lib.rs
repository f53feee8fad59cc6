//! screeps-metrics — label-indexed metric store for the Screeps exporter.
//!
//! Owns the exported gauge table, projects a [`screeps_core::GameState`]
//! into gauge writes, and renders the store in the Prometheus text
//! exposition format.
//!
//! # Architecture
//!
//! ```text
//! project(&GameState) → Projection { resets, writes }
//!                            │
//! MetricStore ◄──────────────┘ publish() (single writer: collection loop)
//!   ├── gauge families: Gauge → labels → value
//!   ├── processing-time histogram
//!   └── render() → text/plain for /metrics (many readers)
//! ```

pub mod error;
pub mod gauge;
pub mod labels;
pub mod projector;
pub mod prometheus;
pub mod store;

pub use error::{MetricError, MetricResult};
pub use gauge::{Gauge, METRIC_PREFIX};
pub use labels::{INTERSHARD, LabelSet};
pub use projector::{MetricWrite, Projection, project};
pub use prometheus::render_prometheus;
pub use store::{Histogram, MetricStore, PROCESSING_TIME_BUCKETS};
