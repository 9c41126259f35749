//! Fingerprint and candidate-bucket derivation.
//!
//! For an element `e` with hashes `(h1, h2)` and a table of `m` buckets:
//!
//! ```text
//! fp = 1 + h2 mod (2^f - 1)          never 0, the empty-slot marker
//! i1 = h1 & (m - 1)
//! i2 = (i1 ^ hash(fp)) & (m - 1)
//! ```
//!
//! Because `m` is a power of two and `hash(fp)` depends only on the
//! fingerprint, `alt_index` is an involution: applying it twice returns the
//! original bucket. That is what lets the kick chain move a stored fingerprint
//! to its other bucket without knowing the element it came from.

use super::hasher::{ElementHasher, StdHasher};
use crate::core::params::FilterConfig;
use crate::core::table::Fingerprint;
use crate::error::Result;
use crate::util::bitops::fingerprint_mask;

/// Seed of the fingerprint hash used by [`Fingerprinter::alt_index`].
const ALT_INDEX_SEED: u64 = 0x5bd1_e995_c2b2_ae35;

/// An element's fingerprint and its two legal buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidates {
    /// Non-zero fingerprint.
    pub fingerprint: Fingerprint,
    /// `i1`, derived from the element's primary hash.
    pub primary: usize,
    /// `i2`, derived from `i1` and the fingerprint.
    pub alternate: usize,
}

impl Candidates {
    /// The other candidate of `index`, which must be one of the two.
    #[inline]
    #[must_use]
    pub fn other(&self, index: usize) -> usize {
        if index == self.primary {
            self.alternate
        } else {
            self.primary
        }
    }
}

/// Derives [`Candidates`] for one filter configuration.
///
/// Pure: identical elements always produce identical candidates for the same
/// hasher, table size and fingerprint width.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::params::FilterConfig;
/// use cuckoocraft::hash::{Fingerprinter, StdHasher};
///
/// let fingerprinter = Fingerprinter::new(StdHasher::new(), &FilterConfig::new(64, 4, 12)).unwrap();
/// let c = fingerprinter.candidates(b"apple");
///
/// assert!(c.fingerprint != 0 && c.fingerprint < (1 << 12));
/// assert_eq!(fingerprinter.alt_index(c.primary, c.fingerprint), c.alternate);
/// assert_eq!(fingerprinter.alt_index(c.alternate, c.fingerprint), c.primary);
/// ```
#[derive(Debug, Clone)]
pub struct Fingerprinter<H = StdHasher> {
    hasher: H,
    index_mask: u64,
    fingerprint_bits: u32,
}

impl<H: ElementHasher> Fingerprinter<H> {
    /// Build a fingerprinter for `config`.
    ///
    /// # Errors
    ///
    /// Any error of [`FilterConfig::validate`].
    pub fn new(hasher: H, config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hasher,
            index_mask: config.table_size as u64 - 1,
            fingerprint_bits: config.fingerprint_bits,
        })
    }

    /// Fingerprint and both candidate buckets of `element`.
    #[inline]
    #[must_use]
    pub fn candidates(&self, element: &[u8]) -> Candidates {
        let (h1, h2) = self.hasher.hash_bytes_pair(element);
        let fingerprint = self.fingerprint_from_hash(h2);
        #[allow(clippy::cast_possible_truncation)]
        let primary = (h1 & self.index_mask) as usize;
        Candidates {
            fingerprint,
            primary,
            alternate: self.alt_index(primary, fingerprint),
        }
    }

    /// The other legal bucket of a fingerprint stored in bucket `index`.
    #[inline]
    #[must_use]
    pub fn alt_index(&self, index: usize, fp: Fingerprint) -> usize {
        let h = self.hasher.hash_bytes_with_seed(&fp.to_le_bytes(), ALT_INDEX_SEED);
        #[allow(clippy::cast_possible_truncation)]
        let alt = ((index as u64 ^ h) & self.index_mask) as usize;
        alt
    }

    /// Map a hash onto `[1, 2^bits - 1]`.
    #[inline]
    fn fingerprint_from_hash(&self, h2: u64) -> Fingerprint {
        let max = u64::from(fingerprint_mask(self.fingerprint_bits));
        #[allow(clippy::cast_possible_truncation)]
        let fp = (1 + h2 % max) as Fingerprint;
        fp
    }

    /// Fingerprint width in bits.
    #[must_use]
    pub fn fingerprint_bits(&self) -> u32 {
        self.fingerprint_bits
    }

    /// Number of buckets addressed.
    #[must_use]
    pub fn table_size(&self) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let size = (self.index_mask + 1) as usize;
        size
    }

    /// The underlying hasher.
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprinter(m: usize, bits: u32) -> Fingerprinter {
        Fingerprinter::new(StdHasher::new(), &FilterConfig::new(m, 4, bits)).unwrap()
    }

    #[test]
    fn test_candidates_deterministic() {
        let f = fingerprinter(1024, 16);
        assert_eq!(f.candidates(b"key"), f.candidates(b"key"));
        assert_eq!(f.candidates(b"key"), fingerprinter(1024, 16).candidates(b"key"));
    }

    #[test]
    fn test_fingerprint_range() {
        for bits in [1, 2, 7, 8, 16, 31, 32] {
            let f = fingerprinter(64, bits);
            for i in 0..500u32 {
                let fp = f.candidates(&i.to_le_bytes()).fingerprint;
                assert_ne!(fp, 0);
                assert!(fp <= fingerprint_mask(bits));
            }
        }
    }

    #[test]
    fn test_one_bit_fingerprint_is_one() {
        let f = fingerprinter(8, 1);
        assert!((0..100u32).all(|i| f.candidates(&i.to_le_bytes()).fingerprint == 1));
    }

    #[test]
    fn test_alt_index_involution() {
        let f = fingerprinter(256, 12);
        for index in 0..256 {
            for fp in [1, 2, 100, 4095] {
                let alt = f.alt_index(index, fp);
                assert!(alt < 256);
                assert_eq!(f.alt_index(alt, fp), index);
            }
        }
    }

    #[test]
    fn test_single_bucket_table() {
        let f = fingerprinter(1, 8);
        let c = f.candidates(b"anything");
        assert_eq!(c.primary, 0);
        assert_eq!(c.alternate, 0);
        assert_eq!(c.other(0), 0);
    }

    #[test]
    fn test_empty_element() {
        let f = fingerprinter(16, 8);
        let c = f.candidates(b"");
        assert!(c.primary < 16 && c.alternate < 16);
        assert_ne!(c.fingerprint, 0);
    }

    #[test]
    fn test_candidates_other() {
        let c = Candidates {
            fingerprint: 3,
            primary: 5,
            alternate: 9,
        };
        assert_eq!(c.other(5), 9);
        assert_eq!(c.other(9), 5);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Fingerprinter::new(StdHasher::new(), &FilterConfig::new(10, 4, 8)).is_err());
    }

    #[test]
    fn test_accessors() {
        let f = fingerprinter(128, 9);
        assert_eq!(f.table_size(), 128);
        assert_eq!(f.fingerprint_bits(), 9);
        assert_eq!(f.hasher().name(), "StdHasher");
    }
}
