//! Operational metrics for shared filters.
//!
//! [`SharedCuckooFilter`](crate::sync::SharedCuckooFilter) records one
//! [`MetricsCollector`] entry per batch when the `metrics` feature is on.
//! Snapshots export to Prometheus text or, with `serde`, to JSON.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};

/// Types that expose a metrics collector.
pub trait FilterMetrics {
    /// The collector, if metrics are recorded.
    fn metrics(&self) -> Option<&MetricsCollector>;

    /// Snapshot of the collector, if any.
    fn metrics_snapshot(&self) -> Option<MetricsSnapshot> {
        self.metrics().map(MetricsCollector::snapshot)
    }
}
