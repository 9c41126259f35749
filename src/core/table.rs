//! Fixed-size bucket table.
//!
//! The table is a flat `m * b` array of fingerprint slots; bucket `i` owns the
//! slots `i * b .. (i + 1) * b`. A slot holding [`EMPTY_SLOT`] is free, which
//! is why fingerprints are never zero.
//!
//! The table knows nothing about hashing or relocation. It only answers
//! "is this fingerprint in bucket `i`" and moves fingerprints in and out of
//! slots; the filter engine layers the cuckoo algorithm on top.

use std::fmt;

/// Stored fingerprint. Only the low `fingerprint_bits` bits are ever set.
pub type Fingerprint = u32;

/// Value of an unoccupied slot.
pub const EMPTY_SLOT: Fingerprint = 0;

/// `m` buckets of `b` fingerprint slots.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::table::BucketTable;
///
/// let mut table = BucketTable::new(4, 2);
/// assert_eq!(table.try_place(1, 0xAB), Some(0));
/// assert!(table.contains(1, 0xAB));
/// assert!(!table.contains(0, 0xAB));
/// assert!(table.remove(1, 0xAB));
/// assert_eq!(table.occupied(), 0);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BucketTable {
    slots: Box<[Fingerprint]>,
    table_size: usize,
    bucket_capacity: usize,
}

impl BucketTable {
    /// Allocate an empty table.
    ///
    /// # Panics
    ///
    /// Panics if `table_size * bucket_capacity` overflows. Filters validate
    /// their configuration before allocating, so this only fires on direct
    /// misuse.
    #[must_use]
    pub fn new(table_size: usize, bucket_capacity: usize) -> Self {
        let len = table_size
            .checked_mul(bucket_capacity)
            .unwrap_or_else(|| panic!("table of {table_size} x {bucket_capacity} slots overflows"));

        Self {
            slots: vec![EMPTY_SLOT; len].into_boxed_slice(),
            table_size,
            bucket_capacity,
        }
    }

    /// Rebuild a table from its raw slot array.
    ///
    /// Returns `None` if `slots.len() != table_size * bucket_capacity`.
    #[must_use]
    pub fn from_raw(table_size: usize, bucket_capacity: usize, slots: Vec<Fingerprint>) -> Option<Self> {
        let expected = table_size.checked_mul(bucket_capacity)?;
        if slots.len() != expected {
            return None;
        }

        Some(Self {
            slots: slots.into_boxed_slice(),
            table_size,
            bucket_capacity,
        })
    }

    /// Number of buckets.
    #[inline]
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Slots per bucket.
    #[inline]
    #[must_use]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Total slots.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The slots of bucket `index`.
    #[inline]
    #[must_use]
    pub fn bucket(&self, index: usize) -> &[Fingerprint] {
        let start = index * self.bucket_capacity;
        &self.slots[start..start + self.bucket_capacity]
    }

    #[inline]
    fn bucket_mut(&mut self, index: usize) -> &mut [Fingerprint] {
        let start = index * self.bucket_capacity;
        &mut self.slots[start..start + self.bucket_capacity]
    }

    /// Whether bucket `index` holds `fp` in any slot.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize, fp: Fingerprint) -> bool {
        self.bucket(index).contains(&fp)
    }

    /// Whether bucket `index` has a free slot.
    #[inline]
    #[must_use]
    pub fn has_free_slot(&self, index: usize) -> bool {
        self.bucket(index).contains(&EMPTY_SLOT)
    }

    /// Put `fp` in the first free slot of bucket `index`.
    ///
    /// Returns the slot used, or `None` if the bucket is full.
    #[inline]
    pub fn try_place(&mut self, index: usize, fp: Fingerprint) -> Option<usize> {
        debug_assert_ne!(fp, EMPTY_SLOT);
        let bucket = self.bucket_mut(index);
        let slot = bucket.iter().position(|&s| s == EMPTY_SLOT)?;
        bucket[slot] = fp;
        Some(slot)
    }

    /// Clear one slot of bucket `index` holding `fp`.
    ///
    /// Returns `false` if no slot matched.
    #[inline]
    pub fn remove(&mut self, index: usize, fp: Fingerprint) -> bool {
        let bucket = self.bucket_mut(index);
        match bucket.iter().position(|&s| s == fp) {
            Some(slot) => {
                bucket[slot] = EMPTY_SLOT;
                true
            }
            None => false,
        }
    }

    /// Read one slot.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize, slot: usize) -> Fingerprint {
        self.bucket(index)[slot]
    }

    /// Overwrite one slot, returning what it held.
    #[inline]
    pub fn swap(&mut self, index: usize, slot: usize, fp: Fingerprint) -> Fingerprint {
        std::mem::replace(&mut self.bucket_mut(index)[slot], fp)
    }

    /// Number of non-empty slots. Linear in the table size.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|&&s| s != EMPTY_SLOT).count()
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots.fill(EMPTY_SLOT);
    }

    /// The whole slot array, bucket-major.
    #[must_use]
    pub fn raw_slots(&self) -> &[Fingerprint] {
        &self.slots
    }

    /// Heap bytes used by the slot array.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of_val(&*self.slots)
    }
}

impl fmt::Debug for BucketTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketTable")
            .field("table_size", &self.table_size)
            .field("bucket_capacity", &self.bucket_capacity)
            .field("occupied", &self.occupied())
            .finish()
    }
}
