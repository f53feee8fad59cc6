//! Error types for the metric store.

use thiserror::Error;

use crate::gauge::Gauge;

/// Result type alias for metric store operations.
pub type MetricResult<T> = Result<T, MetricError>;

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("label mismatch for {gauge}: expected {expected:?}, got {actual:?}")]
    LabelMismatch {
        gauge: Gauge,
        expected: &'static [&'static str],
        actual: Vec<&'static str>,
    },
}
