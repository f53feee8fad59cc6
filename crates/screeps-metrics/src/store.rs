//! Label-indexed gauge store.
//!
//! A cheaply clonable handle shared by the collection loop (single
//! writer) and the scrape handler (many readers).

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{MetricError, MetricResult};
use crate::gauge::Gauge;
use crate::labels::LabelSet;
use crate::projector::Projection;
use crate::prometheus::render_prometheus;

/// Bucket bounds (seconds) of the stats processing-time histogram.
pub const PROCESSING_TIME_BUCKETS: [f64; 13] = [
    0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

/// Series of one gauge family: label values (in the gauge's label order) → value.
pub type Series = BTreeMap<Vec<String>, f64>;

/// Fixed-bucket histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bounds: Vec<f64>,
    /// Per-bucket (non-cumulative) observation counts.
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl Histogram {
    pub fn new(bounds: &[f64]) -> Self {
        Self {
            bounds: bounds.to_vec(),
            counts: vec![0; bounds.len()],
            sum: 0.0,
            count: 0,
        }
    }

    pub fn observe(&mut self, value: f64) {
        if let Some(idx) = self.bounds.iter().position(|b| value <= *b) {
            self.counts[idx] += 1;
        }
        self.sum += value;
        self.count += 1;
    }

    /// `(upper bound, cumulative count)` pairs, excluding `+Inf`.
    pub fn cumulative(&self) -> Vec<(f64, u64)> {
        let mut acc = 0;
        self.bounds
            .iter()
            .zip(&self.counts)
            .map(|(bound, n)| {
                acc += n;
                (*bound, acc)
            })
            .collect()
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Debug)]
struct StoreInner {
    gauges: BTreeMap<Gauge, Series>,
    processing_time: Histogram,
}

/// Process-wide metric store.
#[derive(Debug, Clone)]
pub struct MetricStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_labels(gauge: Gauge, labels: &LabelSet) -> MetricResult<()> {
    let actual = labels.names();
    if actual.as_slice() != gauge.label_names() {
        return Err(MetricError::LabelMismatch {
            gauge,
            expected: gauge.label_names(),
            actual,
        });
    }
    Ok(())
}

impl MetricStore {
    pub fn new() -> Self {
        let gauges = Gauge::ALL.iter().map(|g| (*g, Series::new())).collect();
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                gauges,
                processing_time: Histogram::new(&PROCESSING_TIME_BUCKETS),
            })),
        }
    }

    /// Upsert one series.
    pub async fn set(&self, gauge: Gauge, labels: &LabelSet, value: f64) -> MetricResult<()> {
        check_labels(gauge, labels)?;
        let mut inner = self.inner.write().await;
        inner
            .gauges
            .entry(gauge)
            .or_default()
            .insert(labels.values(), value);
        Ok(())
    }

    /// Drop every series of a gauge family.
    pub async fn reset(&self, gauge: Gauge) {
        let mut inner = self.inner.write().await;
        if let Some(series) = inner.gauges.get_mut(&gauge) {
            series.clear();
        }
    }

    /// Apply a projection: reset its gauge families, then write its series.
    ///
    /// Labels are validated before anything is touched, so a rejected
    /// projection leaves the store unchanged. Returns the number of writes.
    pub async fn publish(&self, projection: &Projection) -> MetricResult<usize> {
        for write in &projection.writes {
            check_labels(write.gauge, &write.labels)?;
        }

        let mut inner = self.inner.write().await;
        for gauge in &projection.resets {
            if let Some(series) = inner.gauges.get_mut(gauge) {
                series.clear();
            }
        }
        for write in &projection.writes {
            inner
                .gauges
                .entry(write.gauge)
                .or_default()
                .insert(write.labels.values(), write.value);
        }

        debug!(
            resets = projection.resets.len(),
            writes = projection.writes.len(),
            "projection published"
        );
        Ok(projection.writes.len())
    }

    /// Record the duration (seconds) of a successful stats cycle.
    pub async fn observe_processing_time(&self, seconds: f64) {
        self.inner.write().await.processing_time.observe(seconds);
    }

    pub async fn processing_time(&self) -> Histogram {
        self.inner.read().await.processing_time.clone()
    }

    /// Current value of one series.
    pub async fn get(&self, gauge: Gauge, labels: &LabelSet) -> Option<f64> {
        let inner = self.inner.read().await;
        inner.gauges.get(&gauge)?.get(&labels.values()).copied()
    }

    /// Number of series in a gauge family.
    pub async fn series_count(&self, gauge: Gauge) -> usize {
        let inner = self.inner.read().await;
        inner.gauges.get(&gauge).map(|s| s.len()).unwrap_or(0)
    }

    /// Number of series, across all families, carrying `name="value"`.
    pub async fn count_labeled(&self, name: &str, value: &str) -> usize {
        let inner = self.inner.read().await;
        inner
            .gauges
            .iter()
            .map(|(gauge, series)| {
                match gauge.label_names().iter().position(|n| *n == name) {
                    Some(idx) => series.keys().filter(|values| values[idx] == value).count(),
                    None => 0,
                }
            })
            .sum()
    }

    /// Render the whole store in the Prometheus text format.
    pub async fn render(&self) -> String {
        let inner = self.inner.read().await;
        render_prometheus(&inner.gauges, &inner.processing_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::MetricWrite;

    #[tokio::test]
    async fn set_and_get() {
        let store = MetricStore::new();
        let labels = LabelSet::shard("shard0");
        store.set(Gauge::Tick, &labels, 42.0).await.unwrap();
        assert_eq!(store.get(Gauge::Tick, &labels).await, Some(42.0));

        store.set(Gauge::Tick, &labels, 43.0).await.unwrap();
        assert_eq!(store.get(Gauge::Tick, &labels).await, Some(43.0));
        assert_eq!(store.series_count(Gauge::Tick).await, 1);
    }

    #[tokio::test]
    async fn set_rejects_wrong_labels() {
        let store = MetricStore::new();
        let err = store
            .set(Gauge::Rcl, &LabelSet::shard("shard0"), 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, MetricError::LabelMismatch { gauge: Gauge::Rcl, .. }));
        assert_eq!(store.series_count(Gauge::Rcl).await, 0);
    }

    #[tokio::test]
    async fn reset_clears_only_that_family() {
        let store = MetricStore::new();
        store
            .set(Gauge::Creeps, &LabelSet::room("shard0", "W1N1"), 5.0)
            .await
            .unwrap();
        store
            .set(Gauge::Tick, &LabelSet::shard("shard0"), 1.0)
            .await
            .unwrap();

        store.reset(Gauge::Creeps).await;
        assert_eq!(store.series_count(Gauge::Creeps).await, 0);
        assert_eq!(store.series_count(Gauge::Tick).await, 1);
    }

    #[tokio::test]
    async fn publish_rejects_before_mutating() {
        let store = MetricStore::new();
        store
            .set(Gauge::Tick, &LabelSet::shard("shard0"), 1.0)
            .await
            .unwrap();

        let projection = Projection {
            resets: vec![Gauge::Tick],
            writes: vec![MetricWrite {
                gauge: Gauge::Tick,
                labels: LabelSet::room("shard0", "W1N1"),
                value: 2.0,
            }],
        };
        assert!(store.publish(&projection).await.is_err());
        assert_eq!(store.get(Gauge::Tick, &LabelSet::shard("shard0")).await, Some(1.0));
    }

    #[tokio::test]
    async fn count_labeled_spans_families() {
        let store = MetricStore::new();
        store
            .set(Gauge::Tick, &LabelSet::shard("shard1"), 1.0)
            .await
            .unwrap();
        store
            .set(Gauge::Energy, &LabelSet::room_typed("shard1", "W1N1", "available"), 1.0)
            .await
            .unwrap();
        store
            .set(Gauge::Tick, &LabelSet::shard("shard0"), 1.0)
            .await
            .unwrap();

        assert_eq!(store.count_labeled("shard", "shard1").await, 2);
        assert_eq!(store.count_labeled("room", "W1N1").await, 1);
        assert_eq!(store.count_labeled("room", "W9N9").await, 0);
    }

    #[test]
    fn histogram_buckets() {
        let mut h = Histogram::new(&PROCESSING_TIME_BUCKETS);
        h.observe(0.003);
        h.observe(0.2);
        h.observe(120.0);

        assert_eq!(h.count(), 3);
        assert!((h.sum() - 120.203).abs() < 1e-9);
        let cumulative = h.cumulative();
        assert_eq!(cumulative[0], (0.001, 0));
        assert_eq!(cumulative[1], (0.005, 1));
        assert_eq!(cumulative[5], (0.25, 2));
        // 120s is above the last bound and only shows up in +Inf.
        assert_eq!(cumulative.last().unwrap(), &(60.0, 2));
    }
}
