//! Builder for cuckoo filters.
//!
//! # Type-State Pattern
//!
//! The shape of the table must be given before `build()` is available. Two
//! paths lead to a complete builder:
//!
//! ```text
//! Initial → WithTableSize → WithBucketCapacity → Complete → CuckooFilter
//!     ↓           ↓                  ↓               ↓
//!  .table_size() .bucket_capacity() .fingerprint_bits() .build()
//!
//! Initial → Complete
//!     ↓
//!  .sized_for(expected_items, fpr)
//! ```
//!
//! Tuning knobs (`max_kicks`, `seed`, `duplicate_policy`, `hasher`) can be set
//! in any state.
//!
//! # Examples
//!
//! ## Explicit Shape
//!
//! ```
//! use cuckoocraft::builder::CuckooFilterBuilder;
//! use cuckoocraft::core::params::DuplicatePolicy;
//!
//! let filter = CuckooFilterBuilder::new()
//!     .table_size(1024)
//!     .bucket_capacity(4)
//!     .fingerprint_bits(16)
//!     .max_kicks(200)
//!     .duplicate_policy(DuplicatePolicy::Ignore)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(filter.capacity(), 4096);
//! assert_eq!(filter.max_kicks(), 200);
//! ```
//!
//! ## Sized For a Workload
//!
//! ```
//! use cuckoocraft::builder::CuckooFilterBuilder;
//!
//! let shared = CuckooFilterBuilder::new()
//!     .sized_for(100_000, 0.001)
//!     .seed(7)
//!     .build_shared()
//!     .unwrap();
//!
//! assert!(shared.capacity() >= 100_000);
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use cuckoocraft::builder::CuckooFilterBuilder;
//!
//! let result = CuckooFilterBuilder::new()
//!     .table_size(1000) // not a power of two
//!     .bucket_capacity(4)
//!     .fingerprint_bits(16)
//!     .build();
//!
//! assert!(result.is_err());
//! ```

use crate::core::params::{DuplicatePolicy, FilterConfig, DEFAULT_MAX_KICKS, DEFAULT_SEED};
use crate::error::{CuckooCraftError, Result};
use crate::filters::CuckooFilter;
use crate::hash::{DefaultHasher, ElementHasher};
use crate::sync::SharedCuckooFilter;
use std::marker::PhantomData;

/// Initial state: nothing set.
pub struct Initial;

/// Table size set.
pub struct WithTableSize;

/// Table size and bucket capacity set.
pub struct WithBucketCapacity;

/// Ready to build.
pub struct Complete;

/// How the table shape is determined.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Explicit {
        table_size: usize,
        bucket_capacity: usize,
        fingerprint_bits: u32,
    },
    SizedFor {
        expected_items: usize,
        fpr: f64,
    },
}

/// Type-state builder for [`CuckooFilter`] and [`SharedCuckooFilter`].
pub struct CuckooFilterBuilder<State, H = DefaultHasher> {
    table_size: usize,
    bucket_capacity: usize,
    shape: Option<Shape>,
    max_kicks: u32,
    seed: u64,
    duplicate_policy: DuplicatePolicy,
    hasher: H,
    _state: PhantomData<State>,
}

impl CuckooFilterBuilder<Initial, DefaultHasher> {
    /// Start a builder with the default hasher and tuning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table_size: 0,
            bucket_capacity: 0,
            shape: None,
            max_kicks: DEFAULT_MAX_KICKS,
            seed: DEFAULT_SEED,
            duplicate_policy: DuplicatePolicy::Allow,
            hasher: DefaultHasher::new(),
            _state: PhantomData,
        }
    }
}

impl Default for CuckooFilterBuilder<Initial, DefaultHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State, H> CuckooFilterBuilder<State, H> {
    fn transition<Next>(self) -> CuckooFilterBuilder<Next, H> {
        CuckooFilterBuilder {
            table_size: self.table_size,
            bucket_capacity: self.bucket_capacity,
            shape: self.shape,
            max_kicks: self.max_kicks,
            seed: self.seed,
            duplicate_policy: self.duplicate_policy,
            hasher: self.hasher,
            _state: PhantomData,
        }
    }

    /// Bound on evictions per insert. `0` disables kicking.
    #[must_use]
    pub fn max_kicks(mut self, max_kicks: u32) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    /// Seed of the eviction RNG.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Handling of repeated inserts.
    #[must_use]
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Replace the element hasher.
    #[must_use]
    pub fn hasher<H2: ElementHasher>(self, hasher: H2) -> CuckooFilterBuilder<State, H2> {
        CuckooFilterBuilder {
            table_size: self.table_size,
            bucket_capacity: self.bucket_capacity,
            shape: self.shape,
            max_kicks: self.max_kicks,
            seed: self.seed,
            duplicate_policy: self.duplicate_policy,
            hasher,
            _state: PhantomData,
        }
    }
}

impl<H> CuckooFilterBuilder<Initial, H> {
    /// Number of buckets. Must be a power of two.
    #[must_use]
    pub fn table_size(mut self, table_size: usize) -> CuckooFilterBuilder<WithTableSize, H> {
        self.table_size = table_size;
        self.transition()
    }

    /// Derive the shape from a workload: `expected_items` at false positive
    /// rate `fpr`, with four slots per bucket.
    #[must_use]
    pub fn sized_for(mut self, expected_items: usize, fpr: f64) -> CuckooFilterBuilder<Complete, H> {
        self.shape = Some(Shape::SizedFor { expected_items, fpr });
        self.transition()
    }
}

impl<H> CuckooFilterBuilder<WithTableSize, H> {
    /// Slots per bucket. Must be at least 1.
    #[must_use]
    pub fn bucket_capacity(mut self, bucket_capacity: usize) -> CuckooFilterBuilder<WithBucketCapacity, H> {
        self.bucket_capacity = bucket_capacity;
        self.transition()
    }
}

impl<H> CuckooFilterBuilder<WithBucketCapacity, H> {
    /// Fingerprint width in bits, `1..=32`.
    #[must_use]
    pub fn fingerprint_bits(mut self, fingerprint_bits: u32) -> CuckooFilterBuilder<Complete, H> {
        self.shape = Some(Shape::Explicit {
            table_size: self.table_size,
            bucket_capacity: self.bucket_capacity,
            fingerprint_bits,
        });
        self.transition()
    }
}

impl<H: ElementHasher> CuckooFilterBuilder<Complete, H> {
    /// The configuration `build()` would use.
    ///
    /// # Errors
    ///
    /// Any error of [`FilterConfig::validate`] or [`FilterConfig::for_capacity`].
    pub fn config(&self) -> Result<FilterConfig> {
        let base = match self.shape {
            Some(Shape::Explicit {
                table_size,
                bucket_capacity,
                fingerprint_bits,
            }) => FilterConfig::new(table_size, bucket_capacity, fingerprint_bits),
            Some(Shape::SizedFor { expected_items, fpr }) => {
                FilterConfig::for_capacity(expected_items, fpr)?
            }
            None => return Err(CuckooCraftError::invalid_parameters("table shape not set")),
        };

        let config = base
            .with_max_kicks(self.max_kicks)
            .with_seed(self.seed)
            .with_duplicate_policy(self.duplicate_policy);
        config.validate()?;
        Ok(config)
    }

    /// Build a single-owner filter.
    ///
    /// # Errors
    ///
    /// See [`config`](Self::config).
    pub fn build(self) -> Result<CuckooFilter<H>> {
        let config = self.config()?;
        CuckooFilter::with_config_and_hasher(config, self.hasher)
    }

    /// Build a thread-safe filter.
    ///
    /// # Errors
    ///
    /// See [`config`](Self::config).
    pub fn build_shared(self) -> Result<SharedCuckooFilter<H>>
    where
        H: Clone,
    {
        self.build().map(SharedCuckooFilter::from_filter)
    }
}
