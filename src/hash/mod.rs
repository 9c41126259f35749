//! Element hashing and fingerprint derivation.
//!
//! # Module Structure
//!
//! ```text
//! hash/
//! ├── hasher.rs       - ElementHasher trait and StdHasher (FNV-1a + fmix64)
//! ├── xxhash.rs       - XXH3 implementation (optional, feature = "xxhash")
//! ├── fingerprint.rs  - Fingerprinter: (fp, i1, i2) and alt_index
//! └── mod.rs          - This file (public API)
//! ```
//!
//! # Choosing a Hash Function
//!
//! | Hash Function | Speed     | Use Case                                  |
//! |---------------|-----------|-------------------------------------------|
//! | [`StdHasher`] | Medium    | Default, no extra dependency              |
//! | `XxHasher`    | Very Fast | Long elements (>100 bytes)                |
//!
//! Whatever the hasher, its output must be stable across processes: a
//! serialized table is only queryable by a filter that hashes identically.
//!
//! # Feature Flags
//!
//! | Feature   | Enables       |
//! |-----------|---------------|
//! | (default) | [`StdHasher`] |
//! | `xxhash`  | `XxHasher`    |
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::core::params::FilterConfig;
//! use cuckoocraft::hash::{Fingerprinter, StdHasher};
//!
//! let fingerprinter = Fingerprinter::new(StdHasher::with_seed(7), &FilterConfig::new(16, 4, 8)).unwrap();
//! let c = fingerprinter.candidates(b"hello");
//! assert!(c.primary < 16 && c.alternate < 16);
//! ```

pub mod fingerprint;
pub mod hasher;

#[cfg(feature = "xxhash")]
pub mod xxhash;

pub use fingerprint::{Candidates, Fingerprinter};
pub use hasher::{ElementHasher, StdHasher};

#[cfg(feature = "xxhash")]
pub use xxhash::XxHasher;

/// Default hasher type used by filters.
pub type DefaultHasher = StdHasher;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hasher_alias() {
        let hasher: DefaultHasher = DefaultHasher::default();
        assert_eq!(hasher.name(), "StdHasher");
    }

    #[cfg(feature = "xxhash")]
    #[test]
    fn test_fingerprinter_with_xxhash() {
        use crate::core::params::FilterConfig;

        let f = Fingerprinter::new(XxHasher::new(), &FilterConfig::new(32, 4, 16)).unwrap();
        let c = f.candidates(b"element");
        assert_eq!(f.alt_index(c.alternate, c.fingerprint), c.primary);
    }
}
