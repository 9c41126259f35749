//! Bit manipulation helpers.
//!
//! Every function here is `const` and branch-light; they compile to a handful
//! of instructions and are used on the hot path of every filter operation.

#![allow(clippy::cast_possible_truncation)]

/// Check if a number is a power of two.
///
/// Zero is not a power of two.
///
/// # Examples
///
/// ```
/// use cuckoocraft::util::bitops::is_power_of_two;
///
/// assert!(is_power_of_two(1));
/// assert!(is_power_of_two(1024));
/// assert!(!is_power_of_two(0));
/// assert!(!is_power_of_two(12));
/// ```
#[inline(always)]
#[must_use]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Mask selecting the low `bits` bits of a fingerprint.
///
/// `bits` must be in `1..=32`; callers validate this at construction.
///
/// # Examples
///
/// ```
/// use cuckoocraft::util::bitops::fingerprint_mask;
///
/// assert_eq!(fingerprint_mask(1), 0b1);
/// assert_eq!(fingerprint_mask(8), 0xFF);
/// assert_eq!(fingerprint_mask(32), u32::MAX);
/// ```
#[inline(always)]
#[must_use]
pub const fn fingerprint_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Number of whole bytes needed to hold `bits` bits.
///
/// # Examples
///
/// ```
/// use cuckoocraft::util::bitops::bytes_for_bits;
///
/// assert_eq!(bytes_for_bits(1), 1);
/// assert_eq!(bytes_for_bits(8), 1);
/// assert_eq!(bytes_for_bits(12), 2);
/// assert_eq!(bytes_for_bits(32), 4);
/// ```
#[inline(always)]
#[must_use]
pub const fn bytes_for_bits(bits: u32) -> usize {
    ((bits as usize) + 7) / 8
}

/// Final avalanche step of MurmurHash3 (`fmix64`).
///
/// Spreads entropy from every input bit into the low bits, which the bucket
/// index mask relies on.
#[inline(always)]
#[must_use]
pub const fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}
