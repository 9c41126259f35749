//! Shared data generators and constants for the benchmarks.
#![allow(dead_code)]

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Bucket counts exercised by size sweeps.
pub const TABLE_SIZES: &[usize] = &[1 << 10, 1 << 14, 1 << 18];

/// Thread counts for contention benchmarks.
pub const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

/// Load factors for pre-filled tables.
pub const LOAD_FACTORS: &[f64] = &[0.25, 0.5, 0.75, 0.9];

/// Batch sizes for the shared filter.
pub const BATCH_SIZES: &[usize] = &[1, 16, 256, 4096];

/// Random alphanumeric string of `len` bytes.
#[inline]
pub fn random_string(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `count` independent random strings.
pub fn generate_strings(count: usize, len: usize) -> Vec<String> {
    (0..count).map(|_| random_string(len)).collect()
}

/// Predictable strings: "item_00000000", "item_00000001", ...
pub fn generate_sequential_strings(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("item_{:08}", i)).collect()
}
