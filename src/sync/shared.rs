//! Thread-safe cuckoo filter with batch-granularity atomicity.
//!
//! # Locking Discipline
//!
//! One `parking_lot::RwLock` guards the whole engine:
//!
//! - insert and delete batches take the write lock once for the entire batch
//! - lookup batches take the read lock once for the entire batch
//!
//! Any two batches therefore behave as if they ran in some total order. A
//! lookup batch either sees every element of a concurrent insert batch or
//! none of them, and many lookup batches can run at once.
//!
//! `parking_lot::RwLock` is used for its writer fairness: a steady stream of
//! lookup batches cannot starve a writer.
//!
//! # Hashing Outside the Lock
//!
//! Candidate derivation `(fp, i1, i2)` depends only on the engine's hasher and
//! configuration, so it runs before the lock is taken. With the `rayon`
//! feature, large batches are hashed on the rayon pool; results keep input
//! order.
//!
//! Both inputs are fixed once the filter is shared. [`with_exclusive`] hands
//! out an [`ExclusiveFilter`], which can mutate the table but cannot swap the
//! engine, so the copy of the fingerprinter kept here never goes stale.
//!
//! [`with_exclusive`]: SharedCuckooFilter::with_exclusive
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::{Operation, SharedCuckooFilter, Status};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let filter = Arc::new(SharedCuckooFilter::new(1024, 4, 16).unwrap());
//!
//! let writers: Vec<_> = (0..4)
//!     .map(|t| {
//!         let f = Arc::clone(&filter);
//!         thread::spawn(move || {
//!             let batch: Vec<String> = (0..100).map(|i| format!("t{t}-{i}")).collect();
//!             f.apply_batch(Operation::Insert, &batch)
//!         })
//!     })
//!     .collect();
//!
//! for w in writers {
//!     assert!(w.join().unwrap().iter().all(|&s| s == Status::Success));
//! }
//! assert_eq!(filter.count(), 400);
//! ```

#![allow(clippy::module_name_repetitions)]

use crate::core::filter::SharedMembershipFilter;
use crate::core::params::FilterConfig;
use crate::core::{Operation, Status};
use crate::error::Result;
use crate::filters::cuckoo::{CuckooFilter, EngineStats};
use crate::hash::{Candidates, ElementHasher, Fingerprinter, StdHasher};
use parking_lot::RwLock;
use std::fmt;
use std::ops::Deref;

#[cfg(feature = "metrics")]
use crate::metrics::{FilterMetrics, MetricsCollector};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Batches at least this long are hashed in parallel.
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 1024;

/// Cuckoo filter shared by many threads.
///
/// Every public operation is one atomic batch against the table. Wrap in an
/// `Arc` to share; no outer lock is needed.
pub struct SharedCuckooFilter<H = StdHasher> {
    inner: RwLock<CuckooFilter<H>>,
    /// Copy of the engine's fingerprinter, used before locking.
    fingerprinter: Fingerprinter<H>,
    /// Engine configuration; the engine is never replaced while shared.
    config: FilterConfig,
    #[cfg(feature = "metrics")]
    metrics: MetricsCollector,
}

impl SharedCuckooFilter<StdHasher> {
    /// Create a shared filter with `table_size` buckets of `bucket_capacity` slots.
    ///
    /// # Errors
    ///
    /// See [`CuckooFilter::new`].
    pub fn new(table_size: usize, bucket_capacity: usize, fingerprint_bits: u32) -> Result<Self> {
        Ok(Self::from_filter(CuckooFilter::new(
            table_size,
            bucket_capacity,
            fingerprint_bits,
        )?))
    }

    /// Create a shared filter from a full configuration.
    ///
    /// # Errors
    ///
    /// Any error of [`FilterConfig::validate`].
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        Ok(Self::from_filter(CuckooFilter::with_config(config)?))
    }

    /// Create a shared filter sized for `expected_items` at rate `fpr`.
    ///
    /// # Errors
    ///
    /// See [`FilterConfig::for_capacity`].
    pub fn for_capacity(expected_items: usize, fpr: f64) -> Result<Self> {
        Ok(Self::from_filter(CuckooFilter::for_capacity(expected_items, fpr)?))
    }
}

impl<H: ElementHasher + Clone> SharedCuckooFilter<H> {
    /// Share an existing engine.
    #[must_use]
    pub fn from_filter(filter: CuckooFilter<H>) -> Self {
        Self {
            fingerprinter: filter.fingerprinter().clone(),
            config: *filter.config(),
            inner: RwLock::new(filter),
            #[cfg(feature = "metrics")]
            metrics: MetricsCollector::new(),
        }
    }

    /// Unwrap the engine.
    #[must_use]
    pub fn into_inner(self) -> CuckooFilter<H> {
        self.inner.into_inner()
    }

    /// Consistent copy of the engine, taken under the read lock.
    #[must_use]
    pub fn snapshot(&self) -> CuckooFilter<H> {
        self.inner.read().clone()
    }

    // ------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------

    /// Apply `op` to every element, in order, as one atomic batch.
    ///
    /// Returns one status per element, positionally aligned. A failing
    /// element does not stop the batch and earlier elements stay applied.
    pub fn apply_batch<E: AsRef<[u8]> + Sync>(&self, op: Operation, elements: &[E]) -> Vec<Status> {
        #[cfg(feature = "trace")]
        tracing::trace!(%op, elements = elements.len(), "SharedCuckooFilter::apply_batch");

        let candidates = self.derive_candidates(elements);
        let statuses = self.apply_candidates(op, &candidates);

        #[cfg(feature = "metrics")]
        self.metrics.record_batch(op, &statuses);

        statuses
    }

    /// Atomic insert batch.
    pub fn insert_batch<E: AsRef<[u8]> + Sync>(&self, elements: &[E]) -> Vec<Status> {
        self.apply_batch(Operation::Insert, elements)
    }

    /// Atomic lookup batch.
    pub fn lookup_batch<E: AsRef<[u8]> + Sync>(&self, elements: &[E]) -> Vec<Status> {
        self.apply_batch(Operation::Lookup, elements)
    }

    /// Atomic delete batch.
    pub fn delete_batch<E: AsRef<[u8]> + Sync>(&self, elements: &[E]) -> Vec<Status> {
        self.apply_batch(Operation::Delete, elements)
    }

    fn apply_candidates(&self, op: Operation, candidates: &[Candidates]) -> Vec<Status> {
        if op.is_mutating() {
            self.inner.write().apply_candidates(op, candidates)
        } else {
            self.inner.read().lookup_all(candidates)
        }
    }

    fn apply_one<E: AsRef<[u8]> + ?Sized>(&self, op: Operation, element: &E) -> Status {
        let candidates = [self.fingerprinter.candidates(element.as_ref())];
        let statuses = self.apply_candidates(op, &candidates);

        #[cfg(feature = "metrics")]
        self.metrics.record_batch(op, &statuses);

        statuses[0]
    }

    #[cfg(feature = "rayon")]
    fn derive_candidates<E: AsRef<[u8]> + Sync>(&self, elements: &[E]) -> Vec<Candidates> {
        if elements.len() >= PARALLEL_THRESHOLD {
            elements
                .par_iter()
                .map(|e| self.fingerprinter.candidates(e.as_ref()))
                .collect()
        } else {
            elements
                .iter()
                .map(|e| self.fingerprinter.candidates(e.as_ref()))
                .collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn derive_candidates<E: AsRef<[u8]> + Sync>(&self, elements: &[E]) -> Vec<Candidates> {
        elements
            .iter()
            .map(|e| self.fingerprinter.candidates(e.as_ref()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Single-element operations (one-element batches)
    // ------------------------------------------------------------------

    /// Add an element.
    pub fn insert<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> Status {
        self.apply_one(Operation::Insert, element)
    }

    /// [`Status::Present`] or [`Status::Absent`].
    pub fn lookup<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> Status {
        self.apply_one(Operation::Lookup, element)
    }

    /// Whether `element` may be in the set.
    pub fn contains<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> bool {
        self.lookup(element) == Status::Present
    }

    /// Remove one occurrence.
    pub fn delete<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> Status {
        self.apply_one(Operation::Delete, element)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    /// Alias of [`count`](Self::count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Empty the table under the write lock.
    pub fn clear(&self) {
        self.inner.write().clear();

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    // ------------------------------------------------------------------
    // Closures under the lock
    // ------------------------------------------------------------------

    /// Run `f` with exclusive access to the engine.
    ///
    /// Everything `f` does is one atomic batch to other callers. The
    /// [`ExclusiveFilter`] view mutates the table in place; the engine itself
    /// cannot be replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoocraft::SharedCuckooFilter;
    ///
    /// let filter = SharedCuckooFilter::new(64, 4, 16).unwrap();
    /// let moved = filter.with_exclusive(|f| {
    ///     if f.delete("old").is_success() { f.insert("new"); true } else { false }
    /// });
    /// assert!(!moved);
    /// ```
    ///
    /// The engine cannot be swapped out from under concurrent batches:
    ///
    /// ```compile_fail
    /// use cuckoocraft::{CuckooFilter, SharedCuckooFilter};
    ///
    /// let filter = SharedCuckooFilter::new(16, 4, 16).unwrap();
    /// filter.with_exclusive(|f| **f = CuckooFilter::new(256, 2, 16).unwrap());
    /// ```
    pub fn with_exclusive<R>(&self, f: impl FnOnce(&mut ExclusiveFilter<'_, H>) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut ExclusiveFilter { engine: &mut *guard })
    }

    /// Run `f` with shared read access to the engine.
    pub fn with_shared<R>(&self, f: impl FnOnce(&CuckooFilter<H>) -> R) -> R {
        f(&*self.inner.read())
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// The engine's configuration, fixed for the life of the filter.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Total slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Fraction of occupied slots.
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.inner.read().load_factor()
    }

    /// Upper bound on the per-lookup false positive probability.
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        self.inner.read().false_positive_rate()
    }

    /// Kick diagnostics of the engine.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.inner.read().stats()
    }

    /// Operation counters.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }
}

/// Write access to a shared engine for the duration of
/// [`SharedCuckooFilter::with_exclusive`].
///
/// Dereferences to the engine for reads. Mutation goes through the element
/// operations below, which keep the engine's hasher and shape intact.
pub struct ExclusiveFilter<'a, H> {
    engine: &'a mut CuckooFilter<H>,
}

impl<H: ElementHasher> ExclusiveFilter<'_, H> {
    /// See [`CuckooFilter::insert`].
    pub fn insert<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Status {
        self.engine.insert(element)
    }

    /// See [`CuckooFilter::try_insert`].
    ///
    /// # Errors
    ///
    /// [`CuckooCraftError::CapacityExceeded`](crate::CuckooCraftError::CapacityExceeded)
    /// if the kick chain failed.
    pub fn try_insert<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Result<bool> {
        self.engine.try_insert(element)
    }

    /// See [`CuckooFilter::delete`].
    pub fn delete<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Status {
        self.engine.delete(element)
    }

    /// See [`CuckooFilter::apply_batch`].
    pub fn apply_batch<E: AsRef<[u8]>>(&mut self, op: Operation, elements: &[E]) -> Vec<Status> {
        self.engine.apply_batch(op, elements)
    }

    /// See [`CuckooFilter::clear`].
    pub fn clear(&mut self) {
        self.engine.clear();
    }
}

impl<H> Deref for ExclusiveFilter<'_, H> {
    type Target = CuckooFilter<H>;

    fn deref(&self) -> &CuckooFilter<H> {
        &*self.engine
    }
}

impl<H: ElementHasher> fmt::Debug for ExclusiveFilter<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExclusiveFilter").field(&*self.engine).finish()
    }
}

impl<H: ElementHasher + Clone> Clone for SharedCuckooFilter<H> {
    /// Independent copy of the current table with fresh metrics.
    fn clone(&self) -> Self {
        Self::from_filter(self.snapshot())
    }
}

impl<H: ElementHasher + Clone> From<CuckooFilter<H>> for SharedCuckooFilter<H> {
    fn from(filter: CuckooFilter<H>) -> Self {
        Self::from_filter(filter)
    }
}

impl<H: ElementHasher> fmt::Debug for SharedCuckooFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCuckooFilter")
            .field("config", &self.config)
            .field("len", &self.inner.read().len())
            .finish_non_exhaustive()
    }
}

impl<H: ElementHasher + Clone> SharedMembershipFilter for SharedCuckooFilter<H> {
    fn apply_batch<E>(&self, op: Operation, elements: &[E]) -> Vec<Status>
    where
        E: AsRef<[u8]> + Sync,
    {
        SharedCuckooFilter::apply_batch(self, op, elements)
    }

    fn insert(&self, element: &[u8]) -> Status {
        SharedCuckooFilter::insert(self, element)
    }

    fn lookup(&self, element: &[u8]) -> Status {
        SharedCuckooFilter::lookup(self, element)
    }

    fn delete(&self, element: &[u8]) -> Status {
        SharedCuckooFilter::delete(self, element)
    }

    fn len(&self) -> usize {
        self.count()
    }

    fn clear(&self) {
        SharedCuckooFilter::clear(self);
    }

    fn capacity(&self) -> usize {
        SharedCuckooFilter::capacity(self)
    }

    fn false_positive_rate(&self) -> f64 {
        SharedCuckooFilter::false_positive_rate(self)
    }
}

#[cfg(feature = "metrics")]
impl<H> FilterMetrics for SharedCuckooFilter<H> {
    fn metrics(&self) -> Option<&MetricsCollector> {
        Some(&self.metrics)
    }
}
