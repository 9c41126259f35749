//! Concurrent access to cuckoo filters.
//!
//! [`SharedCuckooFilter`] serializes batches against one engine with a
//! reader/writer lock held for the whole batch. Batches are the unit of
//! atomicity: a concurrent caller never observes a batch half applied.

mod shared;

pub use shared::{ExclusiveFilter, SharedCuckooFilter};

/// Prelude for convenient concurrent filter imports.
pub mod prelude {
    pub use super::SharedCuckooFilter;
    pub use crate::core::SharedMembershipFilter;
}
