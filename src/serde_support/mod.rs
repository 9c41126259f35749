//! Serialization support for cuckoo filters.
//!
//! Two formats are provided, both behind the `serde` feature:
//!
//! - **Serde**: [`CuckooFilter`](crate::filters::CuckooFilter) and
//!   [`SharedCuckooFilter`](crate::sync::SharedCuckooFilter) implement
//!   `Serialize`/`Deserialize` through a versioned intermediate struct. Works
//!   with any serde format (JSON, bincode, ...) and keeps the eviction seed.
//! - **Binary image**: [`ZeroCopyCuckooFilter`] writes a fixed 32-byte header
//!   followed by the packed slot array. Smallest output, no serde machinery.
//!
//! # Examples
//!
//! ## Serde (JSON)
//!
//! ```
//! use cuckoocraft::filters::CuckooFilter;
//!
//! let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
//! filter.insert("hello");
//!
//! let json = serde_json::to_string(&filter).unwrap();
//! let restored: CuckooFilter = serde_json::from_str(&json).unwrap();
//! assert!(restored.contains("hello"));
//! ```
//!
//! ## Binary Image
//!
//! ```
//! use cuckoocraft::filters::CuckooFilter;
//! use cuckoocraft::serde_support::ZeroCopyCuckooFilter;
//!
//! let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
//! filter.insert("hello");
//!
//! let bytes = ZeroCopyCuckooFilter::serialize(&filter);
//! ZeroCopyCuckooFilter::validate(&bytes).unwrap();
//! let restored = ZeroCopyCuckooFilter::deserialize(&bytes).unwrap();
//! assert!(restored.contains("hello"));
//! ```
//!
//! # Versioning
//!
//! Both formats carry a version number and refuse to decode any other
//! version. Bump the matching constant on any breaking layout change.

pub mod cuckoo;
pub mod shared;
pub mod zerocopy;

pub use zerocopy::{ZeroCopyCuckooFilter, ZeroCopyError};

/// Serde representation version.
pub const SERIALIZATION_VERSION: u16 = 1;

/// Magic bytes of the binary image.
pub const ZEROCOPY_MAGIC: &[u8; 4] = b"CUCK";

/// Binary image version.
pub const ZEROCOPY_VERSION: u16 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_constants() {
        assert_eq!(ZEROCOPY_MAGIC, b"CUCK");
        assert!(SERIALIZATION_VERSION > 0);
        assert!(ZEROCOPY_VERSION > 0);
    }
}
