//! Fluent builders for cuckoo filters.
//!
//! [`CuckooFilterBuilder`] uses the type-state pattern so a filter cannot be
//! built before its table shape is known. Validation of the values themselves
//! happens once, in `build()`.
//!
//! ```
//! use cuckoocraft::builder::CuckooFilterBuilder;
//!
//! let filter = CuckooFilterBuilder::new()
//!     .table_size(256)
//!     .bucket_capacity(4)
//!     .fingerprint_bits(12)
//!     .build()
//!     .unwrap();
//! assert!(filter.is_empty());
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod cuckoo;

pub use cuckoo::CuckooFilterBuilder;
