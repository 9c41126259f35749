//! CuckooCraft: a concurrent cuckoo filter with atomic batch operations.
//!
//! A cuckoo filter is an approximate-membership set that stores short
//! fingerprints in a bucketed table. Unlike a Bloom filter it supports deletion.
//! It can produce:
//! - **False positives**: a lookup may report an element that was never inserted
//! - **Zero false negatives**: an inserted, not yet deleted element is always found
//!
//! # Quick Start
//!
//! ```
//! use cuckoocraft::{CuckooFilter, Status};
//!
//! // 1024 buckets of 4 slots, 16-bit fingerprints
//! let mut filter = CuckooFilter::new(1024, 4, 16).unwrap();
//!
//! assert_eq!(filter.insert("hello"), Status::Success);
//! assert_eq!(filter.lookup("hello"), Status::Present);
//! assert_eq!(filter.delete("hello"), Status::Success);
//! assert_eq!(filter.delete("hello"), Status::NotFound);
//! ```
//!
//! # Two Access Models
//!
//! ## 1. Single Owner (`MembershipFilter` trait)
//!
//! [`CuckooFilter`] mutates through `&mut self`. Failed inserts roll back their
//! eviction chain, so the table is unchanged after `CapacityExceeded`.
//!
//! ## 2. Shared Batches (`SharedMembershipFilter` trait)
//!
//! [`SharedCuckooFilter`] takes `&self` and applies whole batches under one
//! reader/writer lock. Candidate buckets are computed before the lock is taken.
//!
//! ```
//! use cuckoocraft::{Operation, SharedCuckooFilter, Status};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let filter = Arc::new(SharedCuckooFilter::new(1024, 4, 16).unwrap());
//!
//! let writer = Arc::clone(&filter);
//! thread::spawn(move || {
//!     writer.apply_batch(Operation::Insert, &["a", "b", "c"]);
//! })
//! .join()
//! .unwrap();
//!
//! let statuses = filter.apply_batch(Operation::Lookup, &["a", "b", "c"]);
//! assert!(statuses.iter().all(|&s| s == Status::Present));
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use cuckoocraft::builder::CuckooFilterBuilder;
//! use cuckoocraft::DuplicatePolicy;
//!
//! let filter = CuckooFilterBuilder::new()
//!     .sized_for(10_000, 0.001)
//!     .duplicate_policy(DuplicatePolicy::Ignore)
//!     .build()
//!     .unwrap();
//! assert!(filter.capacity() >= 10_000);
//! ```
//!
//! # Features
//!
//! - `serde` (default): serde impls and the compact binary image
//! - `trace` (default): `tracing` events for kick chains and batches
//! - `metrics` (default): operation counters on [`SharedCuckooFilter`]
//! - `xxhash`: [`XxHasher`](hash::XxHasher), an XXH3-based element hasher
//! - `rayon`: derive candidates for large batches in parallel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::len_zero)]
#![allow(clippy::bool_assert_comparison)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/cuckoocraft/0.1.0")]

/// Core types, traits and parameters
pub mod core;

/// Error types and result aliases
pub mod error;

/// Filter engines
pub mod filters;

/// Element hashers and fingerprint derivation
pub mod hash;

/// Utility functions and helpers
pub mod util;

/// Concurrent batch access
pub mod sync;

/// Type-safe builders
pub mod builder;

/// Serialization support (requires `serde` feature)
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_support;

/// Operation counters (requires `metrics` feature)
#[cfg(feature = "metrics")]
#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
pub mod metrics;

pub use error::{CuckooCraftError, Result};

pub use core::filter::{MembershipFilter, SharedMembershipFilter};
pub use core::params::{DuplicatePolicy, FilterConfig};
pub use core::{Operation, Status};

pub use filters::{CuckooFilter, EngineStats};

pub use builder::CuckooFilterBuilder;

pub use sync::{ExclusiveFilter, SharedCuckooFilter};

pub use hash::{ElementHasher, StdHasher};

#[cfg(feature = "xxhash")]
pub use hash::XxHasher;

#[cfg(feature = "serde")]
pub use serde_support::ZeroCopyCuckooFilter;

#[cfg(feature = "metrics")]
pub use metrics::{FilterMetrics, MetricsCollector, MetricsSnapshot};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use cuckoocraft::prelude::*;
///
/// let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
/// filter.insert("hello");
/// assert!(filter.contains("hello"));
/// ```
pub mod prelude {
    pub use crate::builder::CuckooFilterBuilder;
    pub use crate::core::filter::{MembershipFilter, SharedMembershipFilter};
    pub use crate::core::params::{DuplicatePolicy, FilterConfig};
    pub use crate::core::{Operation, Status};
    pub use crate::error::{CuckooCraftError, Result};
    pub use crate::filters::CuckooFilter;
    pub use crate::hash::{ElementHasher, StdHasher};
    pub use crate::sync::SharedCuckooFilter;

    #[cfg(feature = "xxhash")]
    pub use crate::hash::XxHasher;

    #[cfg(feature = "serde")]
    pub use crate::serde_support::ZeroCopyCuckooFilter;

    #[cfg(feature = "metrics")]
    pub use crate::metrics::{FilterMetrics, MetricsCollector};
}
