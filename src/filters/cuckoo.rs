//! Cuckoo filter engine.
//!
//! # Algorithm
//!
//! Every element has a fingerprint `fp` and two legal buckets `i1`, `i2`
//! (see [`Fingerprinter`]). The engine keeps one invariant: a stored
//! fingerprint always sits in one of the two legal buckets of the element it
//! came from.
//!
//! - **Insert**: place `fp` in `i1` or `i2` if either has a free slot.
//!   Otherwise start a kick chain: pick `i1` or `i2` at random, evict a random
//!   slot, store `fp` there, and move the evicted fingerprint to its own
//!   alternate bucket, repeating up to `max_kicks` times.
//! - **Lookup**: `fp` in `i1` or `i2`.
//! - **Delete**: clear one slot holding `fp`, `i1` first.
//!
//! # Rollback
//!
//! Each eviction is journaled as `(bucket, slot, previous)`. When the chain
//! runs out of kicks the journal is replayed backwards, so a failed insert
//! leaves every slot exactly as it was and reports
//! [`Status::CapacityExceeded`].
//!
//! # Eviction Randomness
//!
//! Victims are chosen by a `ChaCha8Rng` seeded from [`FilterConfig::seed`].
//! Two filters with the same configuration that see the same operation
//! sequence end up with identical tables.
//!
//! # Concurrency
//!
//! Mutation takes `&mut self`. For shared use wrap the engine in
//! [`SharedCuckooFilter`](crate::sync::SharedCuckooFilter), which adds
//! batch-granularity reader/writer locking.
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::{CuckooFilter, Status};
//!
//! let mut filter = CuckooFilter::new(1024, 4, 16).unwrap();
//! assert_eq!(filter.insert("alice"), Status::Success);
//! assert_eq!(filter.lookup("alice"), Status::Present);
//! assert_eq!(filter.delete("alice"), Status::Success);
//! assert_eq!(filter.delete("alice"), Status::NotFound);
//! ```

#![allow(clippy::module_name_repetitions)]

use crate::core::filter::MembershipFilter;
use crate::core::params::{DuplicatePolicy, FilterConfig};
use crate::core::table::{BucketTable, Fingerprint};
use crate::core::{Operation, Status};
use crate::error::{CuckooCraftError, Result};
use crate::hash::{Candidates, ElementHasher, Fingerprinter, StdHasher};
use crate::util::bitops::fingerprint_mask;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// One eviction of a kick chain.
#[derive(Debug, Clone, Copy)]
struct KickRecord {
    bucket: usize,
    slot: usize,
    previous: Fingerprint,
}

/// Cumulative diagnostics of one engine.
///
/// Not part of the filter's state: equality and serialization ignore it, and
/// [`CuckooFilter::clear`] keeps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Evictions performed, including those later rolled back.
    pub kicks: u64,
    /// Inserts that ran out of kicks.
    pub capacity_failures: u64,
}

/// Cuckoo filter over byte-string elements.
///
/// `H` is the element hasher; the default [`StdHasher`] is deterministic, so
/// tables are portable between processes.
#[derive(Clone)]
pub struct CuckooFilter<H = StdHasher> {
    table: BucketTable,
    fingerprinter: Fingerprinter<H>,
    config: FilterConfig,
    len: usize,
    rng: ChaCha8Rng,
    stats: EngineStats,
    /// Scratch journal, reused across inserts.
    journal: Vec<KickRecord>,
}

impl CuckooFilter<StdHasher> {
    /// Create a filter with `table_size` buckets of `bucket_capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`CuckooCraftError::InvalidTableSize`] unless `table_size` is a power of two
    /// - [`CuckooCraftError::InvalidBucketCapacity`] if `bucket_capacity == 0`
    /// - [`CuckooCraftError::InvalidFingerprintWidth`] unless `fingerprint_bits` is in `1..=32`
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoocraft::CuckooFilter;
    ///
    /// assert!(CuckooFilter::new(16, 4, 8).is_ok());
    /// assert!(CuckooFilter::new(12, 4, 8).is_err());
    /// ```
    pub fn new(table_size: usize, bucket_capacity: usize, fingerprint_bits: u32) -> Result<Self> {
        Self::with_config(FilterConfig::new(table_size, bucket_capacity, fingerprint_bits))
    }

    /// Create a filter from a full configuration.
    ///
    /// # Errors
    ///
    /// Any error of [`FilterConfig::validate`].
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, StdHasher::new())
    }

    /// Create a filter sized for `expected_items` at false positive rate `fpr`.
    ///
    /// # Errors
    ///
    /// See [`FilterConfig::for_capacity`].
    pub fn for_capacity(expected_items: usize, fpr: f64) -> Result<Self> {
        Self::with_config(FilterConfig::for_capacity(expected_items, fpr)?)
    }
}

impl<H: ElementHasher> CuckooFilter<H> {
    /// Create a filter with a custom hasher.
    ///
    /// # Errors
    ///
    /// Any error of [`FilterConfig::validate`].
    pub fn with_config_and_hasher(config: FilterConfig, hasher: H) -> Result<Self> {
        let fingerprinter = Fingerprinter::new(hasher, &config)?;
        let table = BucketTable::new(config.table_size, config.bucket_capacity);
        Ok(Self::from_parts(config, fingerprinter, table))
    }

    /// Rebuild a filter from a raw slot array, as produced by [`raw_slots`](Self::raw_slots).
    ///
    /// The element count is recomputed from the occupied slots. The eviction
    /// RNG restarts from the configured seed.
    ///
    /// # Errors
    ///
    /// - any error of [`FilterConfig::validate`]
    /// - [`CuckooCraftError::InvalidParameters`] if the slot count does not
    ///   match the configuration or a slot is wider than `fingerprint_bits`
    pub fn from_raw_slots(config: FilterConfig, hasher: H, slots: Vec<Fingerprint>) -> Result<Self> {
        let fingerprinter = Fingerprinter::new(hasher, &config)?;

        let mask = fingerprint_mask(config.fingerprint_bits);
        if let Some(pos) = slots.iter().position(|&s| s & !mask != 0) {
            return Err(CuckooCraftError::invalid_parameters(format!(
                "slot {pos} holds 0x{:x}, wider than {} bits",
                slots[pos], config.fingerprint_bits
            )));
        }

        let got = slots.len();
        let table = BucketTable::from_raw(config.table_size, config.bucket_capacity, slots)
            .ok_or_else(|| {
                CuckooCraftError::invalid_parameters(format!(
                    "expected {} slots, got {got}",
                    config.capacity()
                ))
            })?;

        let mut filter = Self::from_parts(config, fingerprinter, table);
        filter.len = filter.table.occupied();
        Ok(filter)
    }

    fn from_parts(config: FilterConfig, fingerprinter: Fingerprinter<H>, table: BucketTable) -> Self {
        Self {
            table,
            fingerprinter,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            len: 0,
            stats: EngineStats::default(),
            journal: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Element operations
    // ------------------------------------------------------------------

    /// Fingerprint and candidate buckets of `element`.
    #[inline]
    #[must_use]
    pub fn candidates<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> Candidates {
        self.fingerprinter.candidates(element.as_ref())
    }

    /// Add an element.
    ///
    /// Returns [`Status::Success`], [`Status::AlreadyPresentIgnored`] (under
    /// [`DuplicatePolicy::Ignore`]) or [`Status::CapacityExceeded`]. A failed
    /// insert leaves the table unchanged.
    pub fn insert<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Status {
        let candidates = self.candidates(element);
        self.insert_candidates(candidates)
    }

    /// [`insert`](Self::insert) with a `Result`.
    ///
    /// Returns `Ok(true)` if a slot was consumed and `Ok(false)` for an
    /// ignored duplicate.
    ///
    /// # Errors
    ///
    /// [`CuckooCraftError::CapacityExceeded`] if the kick chain failed.
    pub fn try_insert<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Result<bool> {
        match self.insert(element) {
            Status::Success => Ok(true),
            Status::AlreadyPresentIgnored => Ok(false),
            _ => Err(CuckooCraftError::capacity_exceeded(self.capacity(), self.len)),
        }
    }

    /// Whether `element` may be in the set. Never false for an inserted element.
    #[must_use]
    pub fn contains<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> bool {
        self.holds(&self.candidates(element))
    }

    /// [`Status::Present`] or [`Status::Absent`].
    #[must_use]
    pub fn lookup<E: AsRef<[u8]> + ?Sized>(&self, element: &E) -> Status {
        self.lookup_candidates(&self.candidates(element))
    }

    /// Remove one occurrence: [`Status::Success`] or [`Status::NotFound`].
    ///
    /// A never-inserted element, an already deleted one, and one whose
    /// colliding fingerprint was already removed all report `NotFound`.
    pub fn delete<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> Status {
        let candidates = self.candidates(element);
        self.delete_candidates(candidates)
    }

    /// Apply `op` to each element in order.
    ///
    /// One status per element, positionally aligned. A failed element does
    /// not stop the batch.
    pub fn apply_batch<E: AsRef<[u8]>>(&mut self, op: Operation, elements: &[E]) -> Vec<Status> {
        #[cfg(feature = "trace")]
        tracing::trace!(%op, elements = elements.len(), "CuckooFilter::apply_batch");

        let candidates: Vec<Candidates> = elements.iter().map(|e| self.candidates(e)).collect();
        self.apply_candidates(op, &candidates)
    }

    // ------------------------------------------------------------------
    // Candidate-level operations (hashing already done)
    // ------------------------------------------------------------------

    pub(crate) fn apply_candidates(&mut self, op: Operation, candidates: &[Candidates]) -> Vec<Status> {
        match op {
            Operation::Insert => candidates.iter().map(|&c| self.insert_candidates(c)).collect(),
            Operation::Delete => candidates.iter().map(|&c| self.delete_candidates(c)).collect(),
            Operation::Lookup => self.lookup_all(candidates),
        }
    }

    pub(crate) fn lookup_all(&self, candidates: &[Candidates]) -> Vec<Status> {
        candidates.iter().map(|c| self.lookup_candidates(c)).collect()
    }

    #[inline]
    fn holds(&self, c: &Candidates) -> bool {
        self.table.contains(c.primary, c.fingerprint) || self.table.contains(c.alternate, c.fingerprint)
    }

    #[inline]
    pub(crate) fn lookup_candidates(&self, c: &Candidates) -> Status {
        if self.holds(c) {
            Status::Present
        } else {
            Status::Absent
        }
    }

    pub(crate) fn insert_candidates(&mut self, c: Candidates) -> Status {
        if self.config.duplicate_policy == DuplicatePolicy::Ignore && self.holds(&c) {
            return Status::AlreadyPresentIgnored;
        }

        let placed = self.table.try_place(c.primary, c.fingerprint).is_some()
            || self.table.try_place(c.alternate, c.fingerprint).is_some()
            || self.kick(c);

        if placed {
            self.len += 1;
            Status::Success
        } else {
            self.stats.capacity_failures += 1;

            #[cfg(feature = "trace")]
            tracing::debug!(
                len = self.len,
                capacity = self.capacity(),
                max_kicks = self.config.max_kicks,
                "cuckoo insert exhausted kick bound, rolled back"
            );

            Status::CapacityExceeded
        }
    }

    pub(crate) fn delete_candidates(&mut self, c: Candidates) -> Status {
        if self.table.remove(c.primary, c.fingerprint) || self.table.remove(c.alternate, c.fingerprint) {
            self.len -= 1;
            Status::Success
        } else {
            Status::NotFound
        }
    }

    /// Run a kick chain for `c`, whose two buckets are both full.
    ///
    /// Returns `false` after restoring the table if no home was found.
    fn kick(&mut self, c: Candidates) -> bool {
        self.journal.clear();

        let mut index = if self.rng.gen::<bool>() { c.primary } else { c.alternate };
        let mut fp = c.fingerprint;

        for _ in 0..self.config.max_kicks {
            let slot = self.rng.gen_range(0..self.config.bucket_capacity);
            let previous = self.table.swap(index, slot, fp);
            self.journal.push(KickRecord {
                bucket: index,
                slot,
                previous,
            });
            self.stats.kicks += 1;

            fp = previous;
            index = self.fingerprinter.alt_index(index, fp);
            if self.table.try_place(index, fp).is_some() {
                return true;
            }
        }

        while let Some(record) = self.journal.pop() {
            self.table.swap(record.bucket, record.slot, record.previous);
        }
        false
    }

    // ------------------------------------------------------------------
    // Counters and introspection
    // ------------------------------------------------------------------

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias of [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.len
    }

    /// Whether no slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots, `table_size * bucket_capacity`.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.table.slot_count()
    }

    /// Fraction of occupied slots.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Upper bound on the per-lookup false positive probability, `2b / 2^bits`.
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        self.config.false_positive_bound()
    }

    /// Empty every slot and reset the counter.
    ///
    /// Diagnostics and the eviction RNG keep their state.
    pub fn clear(&mut self) {
        #[cfg(feature = "trace")]
        tracing::debug!(len = self.len, "CuckooFilter::clear");

        self.table.clear();
        self.len = 0;
    }

    /// The filter's configuration.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Number of buckets.
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.config.table_size
    }

    /// Slots per bucket.
    #[must_use]
    pub fn bucket_capacity(&self) -> usize {
        self.config.bucket_capacity
    }

    /// Fingerprint width in bits.
    #[must_use]
    pub fn fingerprint_bits(&self) -> u32 {
        self.config.fingerprint_bits
    }

    /// Eviction bound per insert.
    #[must_use]
    pub fn max_kicks(&self) -> u32 {
        self.config.max_kicks
    }

    /// Duplicate handling.
    #[must_use]
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.config.duplicate_policy
    }

    /// Cumulative kick diagnostics.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// The slot array, bucket-major. Empty slots are `0`.
    #[must_use]
    pub fn raw_slots(&self) -> &[Fingerprint] {
        self.table.raw_slots()
    }

    /// The bucket table.
    #[must_use]
    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    /// The fingerprint function.
    #[must_use]
    pub fn fingerprinter(&self) -> &Fingerprinter<H> {
        &self.fingerprinter
    }

    /// Approximate heap plus inline size in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.table.memory_usage()
            + self.journal.capacity() * std::mem::size_of::<KickRecord>()
    }
}

impl<H> PartialEq for CuckooFilter<H> {
    /// Filters are equal when configuration, slots and count match.
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.len == other.len && self.table == other.table
    }
}

impl<H: ElementHasher> fmt::Debug for CuckooFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooFilter")
            .field("config", &self.config)
            .field("len", &self.len)
            .field("hasher", &self.fingerprinter.hasher().name())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<H: ElementHasher> fmt::Display for CuckooFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CuckooFilter {{ buckets: {}, slots/bucket: {}, fp bits: {}, len: {}/{}, load: {:.1}% }}",
            self.config.table_size,
            self.config.bucket_capacity,
            self.config.fingerprint_bits,
            self.len,
            self.capacity(),
            self.load_factor() * 100.0
        )
    }
}

impl<H: ElementHasher> MembershipFilter for CuckooFilter<H> {
    fn insert(&mut self, element: &[u8]) -> Status {
        CuckooFilter::insert(self, element)
    }

    fn lookup(&self, element: &[u8]) -> Status {
        CuckooFilter::lookup(self, element)
    }

    fn delete(&mut self, element: &[u8]) -> Status {
        CuckooFilter::delete(self, element)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        CuckooFilter::clear(self);
    }

    fn capacity(&self) -> usize {
        CuckooFilter::capacity(self)
    }

    fn false_positive_rate(&self) -> f64 {
        CuckooFilter::false_positive_rate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}-{i}")).collect()
    }

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            CuckooFilter::new(0, 4, 8),
            Err(CuckooCraftError::InvalidTableSize { size: 0 })
        ));
        assert!(matches!(
            CuckooFilter::new(16, 0, 8),
            Err(CuckooCraftError::InvalidBucketCapacity { capacity: 0 })
        ));
        assert!(matches!(
            CuckooFilter::new(16, 4, 0),
            Err(CuckooCraftError::InvalidFingerprintWidth { bits: 0, .. })
        ));
    }

    #[test]
    fn test_empty_filter() {
        let filter = CuckooFilter::new(16, 4, 8).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.capacity(), 64);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.lookup("x"), Status::Absent);
    }

    #[test]
    fn test_insert_lookup_small_table() {
        let mut filter = CuckooFilter::new(16, 4, 16).unwrap();
        for e in ["a", "b", "c"] {
            assert_eq!(filter.insert(e), Status::Success);
        }
        let statuses: Vec<Status> = ["a", "b", "c", "d"].iter().map(|e| filter.lookup(e)).collect();
        assert_eq!(
            statuses,
            vec![Status::Present, Status::Present, Status::Present, Status::Absent]
        );
        assert_eq!(filter.count(), 3);
    }

    #[test]
    fn test_delete_twice() {
        let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
        filter.insert("x");
        assert_eq!(filter.delete("x"), Status::Success);
        assert_eq!(filter.delete("x"), Status::NotFound);
        assert_eq!(filter.lookup("x"), Status::Absent);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_delete_never_inserted() {
        let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
        filter.insert("present");
        assert_eq!(filter.delete("missing"), Status::NotFound);
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_counter_consistency() {
        let mut filter = CuckooFilter::new(256, 4, 16).unwrap();
        let items = keys("k", 200);
        for item in &items {
            assert_eq!(filter.insert(item), Status::Success);
        }
        assert_eq!(filter.count(), 200);
        assert_eq!(filter.table().occupied(), 200);

        for item in &items[..75] {
            assert_eq!(filter.delete(item), Status::Success);
        }
        assert_eq!(filter.count(), 125);
        assert_eq!(filter.table().occupied(), 125);
    }

    #[test]
    fn test_no_false_negatives_at_high_load() {
        let mut filter = CuckooFilter::new(1024, 4, 16).unwrap();
        let items = keys("load", 3500);
        for item in &items {
            assert_eq!(filter.insert(item), Status::Success);
        }
        assert!(items.iter().all(|item| filter.contains(item)));
        assert!(filter.stats().kicks > 0);
        assert!(filter.load_factor() > 0.85);
    }

    #[test]
    fn test_capacity_bound() {
        let mut filter = CuckooFilter::new(4, 2, 16).unwrap();
        let statuses: Vec<Status> = keys("cap", 9).iter().map(|k| filter.insert(k)).collect();
        assert!(statuses.contains(&Status::CapacityExceeded));
        assert!(filter.len() <= 8);
        assert_eq!(filter.len(), filter.table().occupied());
        assert!(filter.stats().capacity_failures >= 1);
    }

    #[test]
    fn test_failed_insert_restores_table() {
        let mut filter = CuckooFilter::new(8, 2, 12).unwrap();
        let mut failures = 0;
        for key in keys("rb", 40) {
            let before = filter.raw_slots().to_vec();
            let len_before = filter.len();
            if filter.insert(&key) == Status::CapacityExceeded {
                failures += 1;
                assert_eq!(filter.raw_slots(), &before[..]);
                assert_eq!(filter.len(), len_before);
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn test_zero_max_kicks() {
        let config = FilterConfig::new(1, 2, 16).with_max_kicks(0);
        let mut filter = CuckooFilter::with_config(config).unwrap();
        assert_eq!(filter.insert("a"), Status::Success);
        assert_eq!(filter.insert("b"), Status::Success);
        assert_eq!(filter.insert("c"), Status::CapacityExceeded);
        assert_eq!(filter.stats().kicks, 0);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_duplicates_allowed_by_default() {
        let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
        assert_eq!(filter.insert("dup"), Status::Success);
        assert_eq!(filter.insert("dup"), Status::Success);
        assert_eq!(filter.count(), 2);
        assert_eq!(filter.delete("dup"), Status::Success);
        assert_eq!(filter.lookup("dup"), Status::Present);
        assert_eq!(filter.delete("dup"), Status::Success);
        assert_eq!(filter.delete("dup"), Status::NotFound);
    }

    #[test]
    fn test_duplicates_ignored() {
        let config = FilterConfig::new(64, 4, 16).with_duplicate_policy(DuplicatePolicy::Ignore);
        let mut filter = CuckooFilter::with_config(config).unwrap();
        assert_eq!(filter.insert("dup"), Status::Success);
        assert_eq!(filter.insert("dup"), Status::AlreadyPresentIgnored);
        assert_eq!(filter.count(), 1);
        assert_eq!(filter.try_insert("dup"), Ok(false));
        assert_eq!(filter.delete("dup"), Status::Success);
        assert_eq!(filter.delete("dup"), Status::NotFound);
    }

    #[test]
    fn test_same_seed_same_table() {
        let config = FilterConfig::new(64, 4, 12).with_seed(99);
        let mut a = CuckooFilter::with_config(config).unwrap();
        let mut b = CuckooFilter::with_config(config).unwrap();
        for key in keys("seed", 250) {
            assert_eq!(a.insert(&key), b.insert(&key));
        }
        assert!(a.stats().kicks > 0);
        assert_eq!(a.raw_slots(), b.raw_slots());
        assert_eq!(a, b);
    }

    #[test]
    fn test_try_insert_error() {
        let config = FilterConfig::new(1, 1, 16).with_max_kicks(3);
        let mut filter = CuckooFilter::with_config(config).unwrap();
        assert_eq!(filter.try_insert("a"), Ok(true));
        assert_eq!(
            filter.try_insert("b"),
            Err(CuckooCraftError::capacity_exceeded(1, 1))
        );
    }

    #[test]
    fn test_one_bit_fingerprints() {
        let mut filter = CuckooFilter::new(1, 4, 1).unwrap();
        for key in keys("bit", 4) {
            assert_eq!(filter.insert(&key), Status::Success);
        }
        assert_eq!(filter.insert("overflow"), Status::CapacityExceeded);
        assert!(filter.contains("never-inserted"));
        assert_eq!(filter.false_positive_rate(), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut filter = CuckooFilter::new(32, 4, 16).unwrap();
        for key in keys("c", 50) {
            filter.insert(&key);
        }
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.table().occupied(), 0);
        assert_eq!(filter.lookup("c-1"), Status::Absent);
        assert_eq!(filter.insert("c-1"), Status::Success);
    }

    #[test]
    fn test_apply_batch_order() {
        let mut filter = CuckooFilter::new(16, 4, 16).unwrap();
        assert_eq!(
            filter.apply_batch(Operation::Insert, &["e1", "e2", "e3"]),
            vec![Status::Success; 3]
        );
        assert_eq!(
            filter.apply_batch(Operation::Delete, &["e2", "e9", "e2"]),
            vec![Status::Success, Status::NotFound, Status::NotFound]
        );
        assert_eq!(
            filter.apply_batch(Operation::Lookup, &["e1", "e2", "e3"]),
            vec![Status::Present, Status::Absent, Status::Present]
        );
        let empty: [&str; 0] = [];
        assert!(filter.apply_batch(Operation::Lookup, &empty).is_empty());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let mut filter = CuckooFilter::new(64, 4, 8).unwrap();
        filter.insert("a");
        let first: Vec<Status> = keys("q", 100).iter().map(|k| filter.lookup(k)).collect();
        let second: Vec<Status> = keys("q", 100).iter().map(|k| filter.lookup(k)).collect();
        assert_eq!(first, second);
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_false_positive_rate_bound() {
        let filter = CuckooFilter::new(16, 4, 8).unwrap();
        assert!((filter.false_positive_rate() - 8.0 / 256.0).abs() < 1e-12);
    }

    #[test]
    fn test_empirical_false_positives_within_bound() {
        let mut filter = CuckooFilter::new(1024, 4, 12).unwrap();
        for key in keys("member", 3000) {
            filter.insert(&key);
        }
        let probes = 20_000;
        let hits = keys("probe", probes).iter().filter(|k| filter.contains(k)).count();
        let observed = hits as f64 / probes as f64;
        assert!(observed <= filter.false_positive_rate() * 1.5);
    }

    #[test]
    fn test_from_raw_slots() {
        let mut filter = CuckooFilter::new(8, 2, 8).unwrap();
        filter.insert("a");
        filter.insert("b");

        let rebuilt =
            CuckooFilter::from_raw_slots(*filter.config(), StdHasher::new(), filter.raw_slots().to_vec())
                .unwrap();
        assert_eq!(rebuilt, filter);
        assert!(rebuilt.contains("a") && rebuilt.contains("b"));

        let mut wide = filter.raw_slots().to_vec();
        wide[0] = 0x1FF;
        assert!(CuckooFilter::from_raw_slots(*filter.config(), StdHasher::new(), wide).is_err());
        assert!(CuckooFilter::from_raw_slots(*filter.config(), StdHasher::new(), vec![0; 3]).is_err());
    }

    #[test]
    fn test_delete_prefers_primary_bucket() {
        let config = FilterConfig::new(16, 4, 16);
        let probe = CuckooFilter::with_config(config).unwrap();
        let (key, c) = keys("dual", 64)
            .into_iter()
            .map(|k| {
                let c = probe.candidates(&k);
                (k, c)
            })
            .find(|(_, c)| c.primary != c.alternate)
            .unwrap();

        // same fingerprint in the first slot of both candidate buckets
        let mut slots = vec![0; config.capacity()];
        slots[c.primary * 4] = c.fingerprint;
        slots[c.alternate * 4] = c.fingerprint;
        let mut filter = CuckooFilter::from_raw_slots(config, StdHasher::new(), slots).unwrap();
        assert_eq!(filter.len(), 2);

        assert_eq!(filter.delete(&key), Status::Success);
        assert!(!filter.table().contains(c.primary, c.fingerprint));
        assert!(filter.table().contains(c.alternate, c.fingerprint));

        assert_eq!(filter.delete(&key), Status::Success);
        assert!(!filter.table().contains(c.alternate, c.fingerprint));
        assert_eq!(filter.delete(&key), Status::NotFound);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_membership_filter_trait() {
        fn exercise<F: MembershipFilter>(filter: &mut F) {
            assert_eq!(filter.insert(b"t"), Status::Success);
            assert!(filter.contains(b"t"));
            assert_eq!(MembershipFilter::apply_batch(filter, Operation::Lookup, &["t", "u"])[0], Status::Present);
            assert_eq!(filter.delete(b"t"), Status::Success);
            assert!(filter.is_empty());
        }
        let mut filter = CuckooFilter::new(32, 4, 16).unwrap();
        exercise(&mut filter);
    }

    #[test]
    fn test_display_and_debug() {
        let mut filter = CuckooFilter::new(16, 4, 8).unwrap();
        filter.insert("a");
        let display = filter.to_string();
        assert!(display.contains("buckets: 16"));
        assert!(display.contains("len: 1/64"));
        assert!(format!("{filter:?}").contains("StdHasher"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut filter = CuckooFilter::new(16, 4, 16).unwrap();
        filter.insert("a");
        let mut copy = filter.clone();
        copy.insert("b");
        assert_eq!(filter.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_ne!(filter, copy);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CuckooFilter>();
    }
}
