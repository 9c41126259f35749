//! Internal utility functions and helpers.
//!
//! Low-level bit arithmetic shared by the fingerprint function, the bucket
//! table and the binary image codec. These are implementation details and not
//! part of the stable API.

pub mod bitops;

pub use bitops::{bytes_for_bits, fingerprint_mask, is_power_of_two};
