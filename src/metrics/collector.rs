//! Operation counters for shared filters.
//!
//! Counters are plain relaxed atomics: they are diagnostics, never used to
//! make decisions, so no ordering with the table itself is required.
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::metrics::MetricsCollector;
//! use cuckoocraft::{Operation, Status};
//!
//! let metrics = MetricsCollector::new();
//! metrics.record_batch(Operation::Insert, &[Status::Success, Status::CapacityExceeded]);
//! metrics.record_batch(Operation::Lookup, &[Status::Present, Status::Absent]);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.total_batches, 2);
//! assert_eq!(snapshot.total_inserts, 2);
//! assert_eq!(snapshot.insert_failures, 1);
//! assert_eq!(snapshot.lookup_hits, 1);
//! ```

use crate::core::{Operation, Status};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free operation counters.
#[derive(Debug)]
pub struct MetricsCollector {
    batches: AtomicU64,
    inserts: AtomicU64,
    insert_failures: AtomicU64,
    ignored_duplicates: AtomicU64,
    lookups: AtomicU64,
    lookup_hits: AtomicU64,
    deletes: AtomicU64,
    delete_misses: AtomicU64,
    clears: AtomicU64,
    start_time: Instant,
}

impl MetricsCollector {
    /// Create a collector with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            batches: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            insert_failures: AtomicU64::new(0),
            ignored_duplicates: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            lookup_hits: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            delete_misses: AtomicU64::new(0),
            clears: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Tally one completed batch.
    pub fn record_batch(&self, op: Operation, statuses: &[Status]) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        let n = statuses.len() as u64;

        match op {
            Operation::Insert => {
                self.inserts.fetch_add(n, Ordering::Relaxed);
                let (mut failed, mut ignored) = (0, 0);
                for status in statuses {
                    match status {
                        Status::CapacityExceeded => failed += 1,
                        Status::AlreadyPresentIgnored => ignored += 1,
                        _ => {}
                    }
                }
                self.insert_failures.fetch_add(failed, Ordering::Relaxed);
                self.ignored_duplicates.fetch_add(ignored, Ordering::Relaxed);
            }
            Operation::Lookup => {
                self.lookups.fetch_add(n, Ordering::Relaxed);
                let hits = statuses.iter().filter(|&&s| s == Status::Present).count() as u64;
                self.lookup_hits.fetch_add(hits, Ordering::Relaxed);
            }
            Operation::Delete => {
                self.deletes.fetch_add(n, Ordering::Relaxed);
                let misses = statuses.iter().filter(|&&s| s == Status::NotFound).count() as u64;
                self.delete_misses.fetch_add(misses, Ordering::Relaxed);
            }
        }
    }

    /// Record a `clear()`.
    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the collector was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Read every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_batches: self.batches.load(Ordering::Relaxed),
            total_inserts: self.inserts.load(Ordering::Relaxed),
            insert_failures: self.insert_failures.load(Ordering::Relaxed),
            ignored_duplicates: self.ignored_duplicates.load(Ordering::Relaxed),
            total_lookups: self.lookups.load(Ordering::Relaxed),
            lookup_hits: self.lookup_hits.load(Ordering::Relaxed),
            total_deletes: self.deletes.load(Ordering::Relaxed),
            delete_misses: self.delete_misses.load(Ordering::Relaxed),
            total_clears: self.clears.load(Ordering::Relaxed),
            uptime: self.uptime(),
        }
    }

    /// Zero every counter. Uptime keeps running.
    pub fn reset(&self) {
        for counter in [
            &self.batches,
            &self.inserts,
            &self.insert_failures,
            &self.ignored_duplicates,
            &self.lookups,
            &self.lookup_hits,
            &self.deletes,
            &self.delete_misses,
            &self.clears,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricsSnapshot {
    /// Batches applied, including single-element calls.
    pub total_batches: u64,
    /// Insert elements processed.
    pub total_inserts: u64,
    /// Inserts that returned `CapacityExceeded`.
    pub insert_failures: u64,
    /// Inserts that returned `AlreadyPresentIgnored`.
    pub ignored_duplicates: u64,
    /// Lookup elements processed.
    pub total_lookups: u64,
    /// Lookups that returned `Present`.
    pub lookup_hits: u64,
    /// Delete elements processed.
    pub total_deletes: u64,
    /// Deletes that returned `NotFound`.
    pub delete_misses: u64,
    /// `clear()` calls.
    pub total_clears: u64,
    /// Time since the collector was created.
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Fraction of lookups answered `Present`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            return 0.0;
        }
        self.lookup_hits as f64 / self.total_lookups as f64
    }

    /// Elements processed per second across all operations.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn operations_per_second(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.total_inserts + self.total_lookups + self.total_deletes) as f64 / secs
    }

    /// Export as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`CuckooCraftError::SerializationError`](crate::CuckooCraftError::SerializationError)
    /// if encoding fails.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::CuckooCraftError::serialization_error(e.to_string()))
    }

    /// Export in Prometheus text format.
    #[must_use]
    pub fn to_prometheus_format(&self, prefix: &str) -> String {
        let counters = [
            ("batches_total", "Batches applied", self.total_batches),
            ("inserts_total", "Insert elements processed", self.total_inserts),
            ("insert_failures_total", "Inserts rejected for capacity", self.insert_failures),
            ("ignored_duplicates_total", "Inserts ignored as duplicates", self.ignored_duplicates),
            ("lookups_total", "Lookup elements processed", self.total_lookups),
            ("lookup_hits_total", "Lookups answered present", self.lookup_hits),
            ("deletes_total", "Delete elements processed", self.total_deletes),
            ("delete_misses_total", "Deletes that found nothing", self.delete_misses),
            ("clears_total", "Clear calls", self.total_clears),
        ];

        let mut lines = Vec::with_capacity(counters.len() * 3);
        for (name, help, value) in counters {
            lines.push(format!("# HELP {prefix}_{name} {help}"));
            lines.push(format!("# TYPE {prefix}_{name} counter"));
            lines.push(format!("{prefix}_{name} {value}"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_batch_tallies() {
        let metrics = MetricsCollector::new();
        metrics.record_batch(
            Operation::Insert,
            &[Status::Success, Status::AlreadyPresentIgnored, Status::CapacityExceeded],
        );
        metrics.record_batch(Operation::Delete, &[Status::Success, Status::NotFound]);
        metrics.record_clear();

        let s = metrics.snapshot();
        assert_eq!(s.total_batches, 2);
        assert_eq!(s.total_inserts, 3);
        assert_eq!(s.insert_failures, 1);
        assert_eq!(s.ignored_duplicates, 1);
        assert_eq!(s.total_deletes, 2);
        assert_eq!(s.delete_misses, 1);
        assert_eq!(s.total_clears, 1);
    }

    #[test]
    fn test_hit_rate() {
        let metrics = MetricsCollector::new();
        assert_eq!(metrics.snapshot().hit_rate(), 0.0);
        metrics.record_batch(
            Operation::Lookup,
            &[Status::Present, Status::Absent, Status::Present, Status::Absent],
        );
        assert!((metrics.snapshot().hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsCollector::new();
        metrics.record_batch(Operation::Insert, &[Status::Success]);
        metrics.reset();
        let s = metrics.snapshot();
        assert_eq!(s.total_batches, 0);
        assert_eq!(s.total_inserts, 0);
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = MetricsCollector::new();
        metrics.record_batch(Operation::Lookup, &[Status::Present]);
        let text = metrics.snapshot().to_prometheus_format("cuckoo");
        assert!(text.contains("# TYPE cuckoo_lookups_total counter"));
        assert!(text.contains("cuckoo_lookup_hits_total 1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_export() {
        let metrics = MetricsCollector::new();
        metrics.record_batch(Operation::Insert, &[Status::Success]);
        let json = metrics.snapshot().to_json().unwrap();
        assert!(json.contains("\"total_inserts\": 1"));
    }

    #[test]
    fn test_concurrent_recording() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(MetricsCollector::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        m.record_batch(Operation::Insert, &[Status::Success]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().total_inserts, 4000);
    }
}
