//! XXH3 hasher (requires the `xxhash` feature).
//!
//! Wraps the `xxhash-rust` crate. XXH3 is faster than the default FNV-based
//! [`StdHasher`](super::StdHasher) on long elements and already has well-mixed
//! low bits, so no finalizer is applied.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "xxhash")]
//! # {
//! use cuckoocraft::hash::{ElementHasher, XxHasher};
//!
//! let h1 = XxHasher::with_seed(0).hash_bytes(b"test");
//! let h2 = XxHasher::with_seed(1).hash_bytes(b"test");
//! assert_ne!(h1, h2);
//! # }
//! ```

use super::hasher::{ElementHasher, PAIR_SEED};
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// XXH3 hasher implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    /// Create a new XXH3 hasher with seed `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// Create a new XXH3 hasher with an explicit seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl ElementHasher for XxHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        if self.seed == 0 {
            xxh3_64(bytes)
        } else {
            xxh3_64_with_seed(bytes, self.seed)
        }
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(bytes, self.seed.wrapping_add(seed))
    }

    #[inline]
    fn hash_bytes_pair(&self, bytes: &[u8]) -> (u64, u64) {
        let h1 = xxh3_64_with_seed(bytes, self.seed);
        let h2 = xxh3_64_with_seed(bytes, self.seed.wrapping_add(PAIR_SEED));
        (h1, h2)
    }

    #[inline]
    fn name(&self) -> &'static str {
        "XXHash3"
    }
}
