//! Compact binary image of a cuckoo filter.
//!
//! The image is a fixed header followed by the raw slot array. Every field is
//! written explicitly in little-endian order, so the format does not depend on
//! struct layout or platform endianness and no unsafe code is involved.
//!
//! # Format
//!
//! ```text
//! [Header: 32 bytes]
//!   Magic:            4 bytes  ("CUCK")
//!   Version:          2 bytes  (format version)
//!   Fingerprint bits: 1 byte
//!   Duplicate policy: 1 byte   (0=Allow, 1=Ignore)
//!   Table size:       8 bytes  (buckets)
//!   Bucket capacity:  4 bytes  (slots per bucket)
//!   Max kicks:        4 bytes
//!   Count:            8 bytes  (occupied slots)
//!
//! [Data: Variable]
//!   table_size * bucket_capacity slots, each ceil(bits / 8) bytes
//! ```
//!
//! The eviction seed is not part of the image. Deserialization restarts the
//! eviction RNG from [`DEFAULT_SEED`] unless a seed is supplied.
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::filters::CuckooFilter;
//! use cuckoocraft::serde_support::zerocopy::ZeroCopyCuckooFilter;
//!
//! let mut filter = CuckooFilter::new(256, 4, 16).unwrap();
//! filter.insert("hello");
//!
//! let bytes = ZeroCopyCuckooFilter::serialize(&filter);
//! assert_eq!(bytes.len(), ZeroCopyCuckooFilter::serialized_size(&filter));
//!
//! let restored = ZeroCopyCuckooFilter::deserialize(&bytes).unwrap();
//! assert!(restored.contains("hello"));
//! assert_eq!(restored.count(), 1);
//! ```

use super::{ZEROCOPY_MAGIC, ZEROCOPY_VERSION};
use crate::core::params::{DuplicatePolicy, FilterConfig, DEFAULT_SEED};
use crate::core::table::Fingerprint;
use crate::error::{CuckooCraftError, Result};
use crate::filters::CuckooFilter;
use crate::hash::{ElementHasher, StdHasher};
use crate::util::bitops::bytes_for_bits;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 32;

/// Binary image errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZeroCopyError {
    /// Magic bytes do not read "CUCK".
    #[error("Invalid magic bytes (expected 'CUCK')")]
    InvalidMagic,

    /// Format version this build cannot read.
    #[error("Unsupported format version: {0} (expected {})", ZEROCOPY_VERSION)]
    UnsupportedVersion(u16),

    /// Unknown duplicate policy tag.
    #[error("Invalid duplicate policy tag: {0}")]
    InvalidDuplicatePolicy(u8),

    /// A header dimension does not fit in `usize`.
    #[error("Header field {field} out of range: {value}")]
    FieldOutOfRange {
        /// Field name.
        field: &'static str,
        /// Value read from the header.
        value: u64,
    },

    /// Buffer length disagrees with the header.
    #[error("Buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Length implied by the header.
        expected: usize,
        /// Length provided.
        actual: usize,
    },

    /// Buffer shorter than the header.
    #[error("Buffer too small: expected at least {expected} bytes, got {actual}")]
    BufferTooSmall {
        /// Minimum buffer size.
        expected: usize,
        /// Buffer size provided.
        actual: usize,
    },

    /// Stored count disagrees with the occupied slots.
    #[error("Count mismatch: header says {stored}, table holds {occupied}")]
    CountMismatch {
        /// Count read from the header.
        stored: u64,
        /// Occupied slots found in the data.
        occupied: usize,
    },
}

impl From<ZeroCopyError> for CuckooCraftError {
    fn from(err: ZeroCopyError) -> Self {
        CuckooCraftError::serialization_error(err.to_string())
    }
}

/// Parsed header fields.
#[derive(Debug, Clone, Copy)]
struct Header {
    fingerprint_bits: u32,
    duplicate_policy: DuplicatePolicy,
    table_size: usize,
    bucket_capacity: usize,
    max_kicks: u32,
    count: u64,
}

impl Header {
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ZeroCopyError::BufferTooSmall {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into());
        }

        if &bytes[0..4] != ZEROCOPY_MAGIC {
            return Err(ZeroCopyError::InvalidMagic.into());
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != ZEROCOPY_VERSION {
            return Err(ZeroCopyError::UnsupportedVersion(version).into());
        }

        let fingerprint_bits = u32::from(bytes[6]);
        let duplicate_policy = DuplicatePolicy::from_byte(bytes[7])
            .ok_or(ZeroCopyError::InvalidDuplicatePolicy(bytes[7]))?;

        let table_size = read_u64(&bytes[8..16]);
        let bucket_capacity = read_u32(&bytes[16..20]);
        let max_kicks = read_u32(&bytes[20..24]);
        let count = read_u64(&bytes[24..32]);

        Ok(Self {
            fingerprint_bits,
            duplicate_policy,
            table_size: to_usize("table_size", table_size)?,
            bucket_capacity: to_usize("bucket_capacity", u64::from(bucket_capacity))?,
            max_kicks,
            count,
        })
    }

    fn config(&self, seed: u64) -> FilterConfig {
        FilterConfig::new(self.table_size, self.bucket_capacity, self.fingerprint_bits)
            .with_max_kicks(self.max_kicks)
            .with_seed(seed)
            .with_duplicate_policy(self.duplicate_policy)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn to_usize(field: &'static str, value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| ZeroCopyError::FieldOutOfRange { field, value }.into())
}

/// Byte length of the data section for `config`, or `None` on overflow.
fn data_size(config: &FilterConfig) -> Option<usize> {
    config
        .table_size
        .checked_mul(config.bucket_capacity)?
        .checked_mul(bytes_for_bits(config.fingerprint_bits))
}

/// Binary image codec for [`CuckooFilter`].
pub struct ZeroCopyCuckooFilter;

impl ZeroCopyCuckooFilter {
    /// Encode `filter` as a binary image.
    #[must_use]
    pub fn serialize<H: ElementHasher>(filter: &CuckooFilter<H>) -> Vec<u8> {
        let config = filter.config();
        let width = bytes_for_bits(config.fingerprint_bits);
        let slots = filter.raw_slots();
        let total_size = HEADER_SIZE + slots.len() * width;

        let mut bytes = Vec::with_capacity(total_size);

        bytes.extend_from_slice(ZEROCOPY_MAGIC);
        bytes.extend_from_slice(&ZEROCOPY_VERSION.to_le_bytes());
        // fingerprint_bits <= 32 by construction
        bytes.push(config.fingerprint_bits as u8);
        bytes.push(config.duplicate_policy.to_byte());
        bytes.extend_from_slice(&(config.table_size as u64).to_le_bytes());
        // bucket_capacity <= MAX_BUCKET_CAPACITY by construction
        bytes.extend_from_slice(&(config.bucket_capacity as u32).to_le_bytes());
        bytes.extend_from_slice(&config.max_kicks.to_le_bytes());
        bytes.extend_from_slice(&(filter.len() as u64).to_le_bytes());

        debug_assert_eq!(bytes.len(), HEADER_SIZE);

        for &slot in slots {
            bytes.extend_from_slice(&slot.to_le_bytes()[..width]);
        }

        debug_assert_eq!(bytes.len(), total_size);
        bytes
    }

    /// Decode an image with the default hasher and seed.
    ///
    /// # Errors
    ///
    /// [`CuckooCraftError::SerializationError`] if the image is malformed or
    /// truncated, or a configuration error if the header describes an
    /// invalid table.
    pub fn deserialize(bytes: &[u8]) -> Result<CuckooFilter<StdHasher>> {
        Self::deserialize_with_hasher(bytes, StdHasher::new(), DEFAULT_SEED)
    }

    /// Decode an image with an explicit hasher and eviction seed.
    ///
    /// The hasher must match the one the image was written with, or lookups
    /// will miss.
    ///
    /// # Errors
    ///
    /// See [`deserialize`](Self::deserialize).
    pub fn deserialize_with_hasher<H: ElementHasher>(
        bytes: &[u8],
        hasher: H,
        seed: u64,
    ) -> Result<CuckooFilter<H>> {
        let header = Header::parse(bytes)?;
        let config = header.config(seed);
        config.validate()?;

        let width = bytes_for_bits(config.fingerprint_bits);
        let expected = data_size(&config)
            .and_then(|d| d.checked_add(HEADER_SIZE))
            .ok_or(ZeroCopyError::FieldOutOfRange {
                field: "table_size",
                value: config.table_size as u64,
            })?;
        if bytes.len() != expected {
            return Err(ZeroCopyError::LengthMismatch {
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let slots: Vec<Fingerprint> = bytes[HEADER_SIZE..]
            .chunks_exact(width)
            .map(|chunk| {
                let mut buf = [0u8; 4];
                buf[..width].copy_from_slice(chunk);
                u32::from_le_bytes(buf)
            })
            .collect();

        let filter = CuckooFilter::from_raw_slots(config, hasher, slots)
            .map_err(|e| CuckooCraftError::serialization_error(e.to_string()))?;

        if filter.len() as u64 != header.count {
            return Err(ZeroCopyError::CountMismatch {
                stored: header.count,
                occupied: filter.len(),
            }
            .into());
        }

        Ok(filter)
    }

    /// Image size of `filter` in bytes.
    #[must_use]
    pub fn serialized_size<H: ElementHasher>(filter: &CuckooFilter<H>) -> usize {
        HEADER_SIZE + filter.raw_slots().len() * bytes_for_bits(filter.fingerprint_bits())
    }

    /// Check header and length without decoding the slots.
    ///
    /// # Errors
    ///
    /// See [`deserialize`](Self::deserialize).
    pub fn validate(bytes: &[u8]) -> Result<()> {
        let header = Header::parse(bytes)?;
        let config = header.config(DEFAULT_SEED);
        config.validate()?;

        let expected = data_size(&config).and_then(|d| d.checked_add(HEADER_SIZE));
        match expected {
            Some(expected) if expected == bytes.len() => Ok(()),
            Some(expected) => Err(ZeroCopyError::LengthMismatch {
                expected,
                actual: bytes.len(),
            }
            .into()),
            None => Err(ZeroCopyError::FieldOutOfRange {
                field: "table_size",
                value: config.table_size as u64,
            }
            .into()),
        }
    }
}
