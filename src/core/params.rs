//! Filter configuration and sizing math for cuckoo filters.
//!
//! A cuckoo filter is described by three fixed numbers plus a few tuning knobs:
//!
//! - `m`: number of buckets (`table_size`, a power of two)
//! - `b`: slots per bucket (`bucket_capacity`)
//! - `f`: fingerprint width in bits (`fingerprint_bits`, `1..=32`)
//!
//! # False Positive Bound
//!
//! A lookup compares its fingerprint against at most `2b` stored fingerprints
//! (two candidate buckets of `b` slots each). Each stored fingerprint matches by
//! accident with probability `1 / (2^f - 1)`, so
//!
//! - `ε ≤ 2b / 2^f`
//!
//! and conversely `f ≥ log2(2b / ε)` reaches a target rate `ε`.
//!
//! # Load
//!
//! With `b = 4`, random-walk insertion reliably reaches about 95% occupancy
//! before the kick bound starts to fail, so [`table_size_for`] sizes the table
//! for that load.
//!
//! # References
//!
//! - Fan, Andersen, Kaminsky & Mitzenmacher (2014). "Cuckoo Filter: Practically Better Than Bloom"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{CuckooCraftError, Result};
use crate::util::bitops::is_power_of_two;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Narrowest supported fingerprint.
pub const MIN_FINGERPRINT_BITS: u32 = 1;

/// Widest supported fingerprint (one `u32` slot).
pub const MAX_FINGERPRINT_BITS: u32 = 32;

/// Default bound on evictions per insert.
pub const DEFAULT_MAX_KICKS: u32 = 500;

/// Most slots per bucket; the binary image stores the count as a `u32`.
pub const MAX_BUCKET_CAPACITY: usize = u32::MAX as usize;

/// Default slots per bucket.
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Default eviction RNG seed.
pub const DEFAULT_SEED: u64 = 0x5eed_cafe_f00d_d00d;

/// Occupancy [`table_size_for`] plans for.
pub const DEFAULT_TARGET_LOAD: f64 = 0.95;

/// How a repeated insert of an element that is already present is handled.
///
/// "Already present" means the element's fingerprint occurs in one of its two
/// candidate buckets, so a colliding element also counts as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DuplicatePolicy {
    /// Every insert consumes a slot; `count()` counts insertions and each copy
    /// needs its own delete.
    #[default]
    Allow,
    /// An insert whose fingerprint is already present is reported as
    /// [`Status::AlreadyPresentIgnored`](crate::core::Status::AlreadyPresentIgnored)
    /// and leaves the table untouched.
    Ignore,
}

impl DuplicatePolicy {
    /// Byte tag used in the binary image.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Allow => 0,
            Self::Ignore => 1,
        }
    }

    /// Decode a byte tag written by [`to_byte`](Self::to_byte).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Allow),
            1 => Some(Self::Ignore),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
fn default_max_kicks() -> u32 {
    DEFAULT_MAX_KICKS
}

#[cfg(feature = "serde")]
fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Complete, fixed configuration of one cuckoo filter.
///
/// Fields are public so a configuration can be written literally or loaded
/// with serde (the tuning fields default when missing); [`validate`](Self::validate)
/// is run by every constructor that accepts one.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::params::{DuplicatePolicy, FilterConfig};
///
/// let config = FilterConfig::new(1024, 4, 12)
///     .with_max_kicks(100)
///     .with_duplicate_policy(DuplicatePolicy::Ignore);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.capacity(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterConfig {
    /// Number of buckets (`m`). Power of two, at least 1.
    pub table_size: usize,
    /// Slots per bucket (`b`). At least 1.
    pub bucket_capacity: usize,
    /// Fingerprint width in bits, `1..=32`.
    pub fingerprint_bits: u32,
    /// Eviction bound per insert. `0` disables kicking.
    #[cfg_attr(feature = "serde", serde(default = "default_max_kicks"))]
    pub max_kicks: u32,
    /// Seed of the eviction RNG.
    #[cfg_attr(feature = "serde", serde(default = "default_seed"))]
    pub seed: u64,
    /// Handling of repeated inserts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duplicate_policy: DuplicatePolicy,
}

impl FilterConfig {
    /// Configuration with the given shape and default tuning.
    ///
    /// Not validated; see [`validate`](Self::validate).
    #[must_use]
    pub const fn new(table_size: usize, bucket_capacity: usize, fingerprint_bits: u32) -> Self {
        Self {
            table_size,
            bucket_capacity,
            fingerprint_bits,
            max_kicks: DEFAULT_MAX_KICKS,
            seed: DEFAULT_SEED,
            duplicate_policy: DuplicatePolicy::Allow,
        }
    }

    /// Size a configuration for `expected_items` at false positive rate `fpr`.
    ///
    /// Uses [`DEFAULT_BUCKET_CAPACITY`] slots per bucket.
    ///
    /// # Errors
    ///
    /// [`CuckooCraftError::InvalidParameters`] if `expected_items == 0`, `fpr`
    /// is outside `(0, 1)` or below what 32-bit fingerprints reach, or the
    /// table would not fit in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoocraft::core::params::FilterConfig;
    ///
    /// let config = FilterConfig::for_capacity(10_000, 0.001).unwrap();
    /// assert!(config.capacity() >= 10_000);
    /// assert!(config.false_positive_bound() <= 0.001);
    /// ```
    pub fn for_capacity(expected_items: usize, fpr: f64) -> Result<Self> {
        let bucket_capacity = DEFAULT_BUCKET_CAPACITY;
        let fingerprint_bits = recommended_fingerprint_bits(fpr, bucket_capacity)?;
        let table_size = table_size_for(expected_items, bucket_capacity, DEFAULT_TARGET_LOAD)?;

        let config = Self::new(table_size, bucket_capacity, fingerprint_bits);
        config.validate()?;
        Ok(config)
    }

    /// Replace the kick bound.
    #[must_use]
    pub const fn with_max_kicks(mut self, max_kicks: u32) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    /// Replace the eviction seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the duplicate policy.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// - [`CuckooCraftError::InvalidTableSize`] if `table_size` is zero or not a power of two
    /// - [`CuckooCraftError::InvalidBucketCapacity`] if `bucket_capacity` is zero or above [`MAX_BUCKET_CAPACITY`]
    /// - [`CuckooCraftError::InvalidFingerprintWidth`] if `fingerprint_bits` is outside `1..=32`
    /// - [`CuckooCraftError::InvalidParameters`] if `table_size * bucket_capacity` overflows
    pub fn validate(&self) -> Result<()> {
        if !is_power_of_two(self.table_size) {
            return Err(CuckooCraftError::invalid_table_size(self.table_size));
        }

        if self.bucket_capacity == 0 || self.bucket_capacity > MAX_BUCKET_CAPACITY {
            return Err(CuckooCraftError::invalid_bucket_capacity(self.bucket_capacity));
        }

        if !(MIN_FINGERPRINT_BITS..=MAX_FINGERPRINT_BITS).contains(&self.fingerprint_bits) {
            return Err(CuckooCraftError::invalid_fingerprint_width(
                self.fingerprint_bits,
                MIN_FINGERPRINT_BITS,
                MAX_FINGERPRINT_BITS,
            ));
        }

        if self.table_size.checked_mul(self.bucket_capacity).is_none() {
            return Err(CuckooCraftError::invalid_parameters(format!(
                "table_size {} x bucket_capacity {} overflows usize",
                self.table_size, self.bucket_capacity
            )));
        }

        Ok(())
    }

    /// Total slots, `table_size * bucket_capacity`.
    ///
    /// Saturates instead of overflowing on unvalidated input.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.table_size.saturating_mul(self.bucket_capacity)
    }

    /// Upper bound on the per-lookup false positive probability.
    #[must_use]
    pub fn false_positive_bound(&self) -> f64 {
        false_positive_bound(self.bucket_capacity, self.fingerprint_bits)
    }
}

impl Default for FilterConfig {
    /// 1024 buckets of 4 slots with 16-bit fingerprints.
    fn default() -> Self {
        Self::new(1024, DEFAULT_BUCKET_CAPACITY, 16)
    }
}

/// Upper bound on the false positive rate: `2b / 2^bits`, capped at 1.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::params::false_positive_bound;
///
/// assert_eq!(false_positive_bound(4, 8), 8.0 / 256.0);
/// assert_eq!(false_positive_bound(4, 1), 1.0);
/// ```
#[must_use]
pub fn false_positive_bound(bucket_capacity: usize, fingerprint_bits: u32) -> f64 {
    let bound = (2 * bucket_capacity) as f64 / 2f64.powi(fingerprint_bits as i32);
    bound.min(1.0)
}

/// Fingerprint width reaching `fpr` with `bucket_capacity` slots per bucket.
///
/// Computes `ceil(log2(2b / fpr))`, at least 1.
///
/// # Errors
///
/// [`CuckooCraftError::InvalidParameters`] if `fpr` is outside `(0, 1)`,
/// `bucket_capacity == 0`, or reaching `fpr` needs more than 32 bits.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::params::recommended_fingerprint_bits;
///
/// assert_eq!(recommended_fingerprint_bits(0.01, 4).unwrap(), 10);
/// assert!(recommended_fingerprint_bits(1e-12, 4).is_err());
/// ```
pub fn recommended_fingerprint_bits(fpr: f64, bucket_capacity: usize) -> Result<u32> {
    if !(fpr > 0.0 && fpr < 1.0) {
        return Err(CuckooCraftError::invalid_parameters(format!(
            "false positive rate {fpr} must be in (0, 1)"
        )));
    }

    if bucket_capacity == 0 {
        return Err(CuckooCraftError::invalid_bucket_capacity(bucket_capacity));
    }

    let bits = ((2 * bucket_capacity) as f64 / fpr).log2().ceil();
    if bits > f64::from(MAX_FINGERPRINT_BITS) {
        return Err(CuckooCraftError::invalid_parameters(format!(
            "false positive rate {fpr} needs {bits} fingerprint bits, at most {MAX_FINGERPRINT_BITS} supported"
        )));
    }
    Ok((bits as u32).max(MIN_FINGERPRINT_BITS))
}

/// Smallest power-of-two bucket count holding `expected_items` at `target_load`.
///
/// # Errors
///
/// [`CuckooCraftError::InvalidParameters`] if `expected_items == 0`,
/// `bucket_capacity == 0`, `target_load` is outside `(0, 1]`, or the result
/// overflows.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::params::table_size_for;
///
/// assert_eq!(table_size_for(1, 4, 0.95).unwrap(), 1);
/// assert_eq!(table_size_for(1000, 4, 0.95).unwrap(), 512);
/// ```
pub fn table_size_for(expected_items: usize, bucket_capacity: usize, target_load: f64) -> Result<usize> {
    if expected_items == 0 {
        return Err(CuckooCraftError::invalid_parameters(
            "expected_items must be positive",
        ));
    }

    if bucket_capacity == 0 {
        return Err(CuckooCraftError::invalid_bucket_capacity(bucket_capacity));
    }

    if !(target_load > 0.0 && target_load <= 1.0) {
        return Err(CuckooCraftError::invalid_parameters(format!(
            "target load {target_load} must be in (0, 1]"
        )));
    }

    let buckets = (expected_items as f64 / (bucket_capacity as f64 * target_load)).ceil();
    if buckets >= (usize::MAX / 2) as f64 {
        return Err(CuckooCraftError::invalid_parameters(format!(
            "{expected_items} items need more buckets than fit in memory"
        )));
    }

    (buckets as usize)
        .max(1)
        .checked_next_power_of_two()
        .ok_or_else(|| CuckooCraftError::invalid_parameters("table size overflows usize"))
}
