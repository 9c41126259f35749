//! Hash function trait and the default deterministic hasher.
//!
//! Hash functions operate on byte slices: a cuckoo filter's elements are
//! arbitrary byte strings, and the same bytes must map to the same hashes
//! across processes so that serialized tables stay queryable.
//!
//! # Separation of Concerns
//!
//! - **`ElementHasher`**: generates base hash values from bytes
//! - **`Fingerprinter`** (see [`fingerprint`](super::fingerprint)): derives
//!   the fingerprint and the two candidate buckets from those hashes
//! - **Filters**: compose fingerprinter + bucket table + kick policy
//!
//! # Examples
//!
//! ```
//! use cuckoocraft::hash::hasher::{ElementHasher, StdHasher};
//!
//! let hasher = StdHasher::new();
//! let (h1, h2) = hasher.hash_bytes_pair(b"hello world");
//! assert_ne!(h1, h2);
//! ```

#![allow(clippy::module_name_repetitions)]

use crate::util::bitops::fmix64;

/// Seed mixed into the second hash of [`ElementHasher::hash_bytes_pair`].
pub(crate) const PAIR_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Base hasher trait for cuckoo filter hash functions.
///
/// Implementations must be deterministic (same input, same output, within one
/// crate version) and `Send + Sync` so the shared filter can hash elements on
/// any thread before taking its lock.
pub trait ElementHasher: Send + Sync {
    /// Hash arbitrary bytes to a 64-bit value.
    fn hash_bytes(&self, bytes: &[u8]) -> u64;

    /// Hash bytes with an explicit seed.
    ///
    /// Different seeds MUST produce statistically independent outputs. The
    /// default XORs the seed into the base hash and re-mixes it; implementations
    /// with native seeding should override.
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        fmix64(self.hash_bytes(bytes) ^ seed)
    }

    /// Two independent hashes of one input.
    ///
    /// The fingerprint function takes the bucket index from the first value and
    /// the fingerprint from the second, so the two must not be correlated.
    fn hash_bytes_pair(&self, bytes: &[u8]) -> (u64, u64) {
        let h1 = self.hash_bytes(bytes);
        let h2 = self.hash_bytes_with_seed(bytes, PAIR_SEED);
        (h1, h2)
    }

    /// Human-readable name for debugging and image validation.
    fn name(&self) -> &'static str;
}

/// FNV-1a state used by [`StdHasher`].
///
/// Unlike `std::collections::hash_map::DefaultHasher`, the output is stable
/// across processes and Rust releases.
#[derive(Debug, Clone)]
pub struct DeterministicHasher {
    state: u64,
}

impl DeterministicHasher {
    /// Create a new deterministic hasher with the FNV-1a offset basis.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: 0xcbf2_9ce4_8422_2325,
        }
    }
}

impl Default for DeterministicHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::hash::Hasher for DeterministicHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(0x0100_0000_01b3);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Default hasher: seeded FNV-1a followed by an `fmix64` finalizer.
///
/// FNV-1a alone leaves weak low bits for short keys; the finalizer fixes that,
/// which matters because bucket indices are taken from the low bits.
///
/// # Examples
///
/// ```
/// use cuckoocraft::hash::hasher::{ElementHasher, StdHasher};
///
/// let a = StdHasher::with_seed(1).hash_bytes(b"x");
/// let b = StdHasher::with_seed(2).hash_bytes(b"x");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct StdHasher {
    seed: u64,
}

impl StdHasher {
    /// Create a hasher with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: 0x517c_c1b7_2722_0a95,
        }
    }

    /// Create a hasher with an explicit seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// The seed this hasher mixes into every hash.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for StdHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHasher for StdHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        use std::hash::Hasher;

        let mut hasher = DeterministicHasher::new();
        hasher.write_u64(self.seed);
        hasher.write(bytes);
        fmix64(hasher.finish())
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        use std::hash::Hasher;

        let mut hasher = DeterministicHasher::new();
        hasher.write_u64(self.seed ^ seed);
        hasher.write(bytes);
        fmix64(hasher.finish())
    }

    #[inline]
    fn name(&self) -> &'static str {
        "StdHasher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_hasher_determinism() {
        let hasher = StdHasher::new();
        assert_eq!(hasher.hash_bytes(b"element"), hasher.hash_bytes(b"element"));
        assert_eq!(
            StdHasher::new().hash_bytes(b"element"),
            StdHasher::new().hash_bytes(b"element")
        );
    }

    #[test]
    fn test_std_hasher_different_inputs() {
        let hasher = StdHasher::new();
        assert_ne!(hasher.hash_bytes(b"a"), hasher.hash_bytes(b"b"));
    }

    #[test]
    fn test_std_hasher_empty_input() {
        let hasher = StdHasher::new();
        let h = hasher.hash_bytes(b"");
        assert_eq!(h, hasher.hash_bytes(&[]));
        assert_ne!(h, hasher.hash_bytes(&[0]));
    }

    #[test]
    fn test_hash_bytes_pair_independent() {
        let hasher = StdHasher::new();
        let (h1, h2) = hasher.hash_bytes_pair(b"data");
        assert_ne!(h1, h2);
        assert_eq!(hasher.hash_bytes_pair(b"data"), (h1, h2));
    }

    #[test]
    fn test_low_bits_are_spread() {
        // Sequential short keys must cover all 16 low-nibble buckets.
        let hasher = StdHasher::new();
        let mut seen = [false; 16];
        for i in 0..256u32 {
            let h = hasher.hash_bytes(i.to_string().as_bytes());
            seen[(h & 0xF) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_default_hash_bytes_with_seed() {
        struct Plain;
        impl ElementHasher for Plain {
            fn hash_bytes(&self, bytes: &[u8]) -> u64 {
                bytes.len() as u64
            }
            fn name(&self) -> &'static str {
                "Plain"
            }
        }

        let plain = Plain;
        assert_ne!(
            plain.hash_bytes_with_seed(b"ab", 1),
            plain.hash_bytes_with_seed(b"ab", 2)
        );
        assert_eq!(plain.name(), "Plain");
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StdHasher>();
    }

    #[test]
    fn test_std_hasher_name() {
        assert_eq!(StdHasher::default().name(), "StdHasher");
    }
}
