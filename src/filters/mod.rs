//! Filter engines.
//!
//! [`CuckooFilter`] is the single-owner engine: every mutation takes
//! `&mut self`. Wrap it in [`SharedCuckooFilter`](crate::sync::SharedCuckooFilter)
//! for concurrent batch access.
//!
//! # Choosing Parameters
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | `table_size` (m) | Buckets; a power of two. Capacity is `m * b` |
//! | `bucket_capacity` (b) | Slots per bucket. Larger b raises reachable load, and the false positive bound |
//! | `fingerprint_bits` | False positive bound is about `2b / 2^bits` |
//! | `max_kicks` | Eviction budget per insert before `CapacityExceeded` |

pub mod cuckoo;

pub use cuckoo::{CuckooFilter, EngineStats};
