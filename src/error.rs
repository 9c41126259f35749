//! Error types for CuckooCraft operations.
//!
//! Per-element outcomes of insert, lookup and delete are reported as
//! [`Status`](crate::core::Status) values and never surface here. This module
//! covers the failures that are genuinely exceptional: invalid construction
//! parameters, malformed serialized images, and the `Result`-flavoured insert
//! ([`CuckooFilter::try_insert`](crate::filters::CuckooFilter::try_insert)).
//!
//! # Error Propagation
//!
//! ```
//! use cuckoocraft::{Result, CuckooCraftError};
//! use cuckoocraft::core::params::FilterConfig;
//!
//! fn small_config(table_size: usize) -> Result<FilterConfig> {
//!     let config = FilterConfig::new(table_size, 4, 16);
//!     config.validate()?;
//!     Ok(config)
//! }
//! # assert!(small_config(64).is_ok());
//! # assert!(small_config(63).is_err());
//! ```

#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

/// Result type alias for CuckooCraft operations.
///
/// All fallible operations return [`Result<T>`] where the error type is
/// [`CuckooCraftError`].
pub type Result<T> = std::result::Result<T, CuckooCraftError>;

/// Errors that can occur while building, operating or (de)serializing a filter.
///
/// # Design Notes
/// - `Clone` + `PartialEq` keep errors comparable in tests
/// - Configuration errors are reported once, at construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CuckooCraftError {
    /// Table size is zero or not a power of two.
    ///
    /// The alternate-bucket relation `i2 = i1 XOR hash(fp)` only stays inside
    /// the table when the index mask is `table_size - 1`.
    #[error("Invalid table size: {size}. Must be a non-zero power of two.")]
    InvalidTableSize {
        /// The rejected number of buckets.
        size: usize,
    },

    /// Bucket capacity is zero.
    #[error("Invalid bucket capacity: {capacity}. Buckets must hold at least one fingerprint.")]
    InvalidBucketCapacity {
        /// The rejected slot count per bucket.
        capacity: usize,
    },

    /// Fingerprint width is outside the supported range.
    #[error("Invalid fingerprint width: {bits} bits. Must be in range [{min}, {max}].")]
    InvalidFingerprintWidth {
        /// The rejected width in bits.
        bits: u32,
        /// Minimum supported width.
        min: u32,
        /// Maximum supported width.
        max: u32,
    },

    /// Sizing or other parameters are invalid.
    #[error("Invalid cuckoo filter parameters: {message}.")]
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// An insert could not find a home within the kick bound.
    ///
    /// Only returned by the `Result`-flavoured insert; batch operations report
    /// [`Status::CapacityExceeded`](crate::core::Status::CapacityExceeded) instead.
    #[error("Filter capacity of {capacity} slots exceeded with {occupied} slots occupied.")]
    CapacityExceeded {
        /// Total slot count (`table_size * bucket_capacity`).
        capacity: usize,
        /// Occupied slots at the time of the failed insert.
        occupied: usize,
    },

    /// A serialized filter image could not be decoded.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {message}.")]
    SerializationError {
        /// Description of what failed.
        message: String,
    },
}

impl CuckooCraftError {
    /// Create an `InvalidTableSize` error.
    #[must_use]
    pub fn invalid_table_size(size: usize) -> Self {
        Self::InvalidTableSize { size }
    }

    /// Create an `InvalidBucketCapacity` error.
    #[must_use]
    pub fn invalid_bucket_capacity(capacity: usize) -> Self {
        Self::InvalidBucketCapacity { capacity }
    }

    /// Create an `InvalidFingerprintWidth` error.
    #[must_use]
    pub fn invalid_fingerprint_width(bits: u32, min: u32, max: u32) -> Self {
        Self::InvalidFingerprintWidth { bits, min, max }
    }

    /// Create an `InvalidParameters` error with a formatted message.
    ///
    /// # Examples
    /// ```
    /// use cuckoocraft::CuckooCraftError;
    ///
    /// let err = CuckooCraftError::invalid_parameters(
    ///     format!("expected_items={} must be positive", 0)
    /// );
    /// assert!(err.to_string().contains("expected_items=0"));
    /// ```
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a `CapacityExceeded` error.
    #[must_use]
    pub fn capacity_exceeded(capacity: usize, occupied: usize) -> Self {
        Self::CapacityExceeded { capacity, occupied }
    }

    /// Create a `SerializationError`.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Whether this error was raised while validating construction parameters.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTableSize { .. }
                | Self::InvalidBucketCapacity { .. }
                | Self::InvalidFingerprintWidth { .. }
                | Self::InvalidParameters { .. }
        )
    }
}
