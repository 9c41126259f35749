//! Core types and traits shared by every part of CuckooCraft.
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── filter.rs    - MembershipFilter / SharedMembershipFilter traits
//! ├── table.rs     - Fixed-size bucket table
//! ├── params.rs    - FilterConfig, DuplicatePolicy, sizing math
//! └── mod.rs       - Status and Operation (this file)
//! ```
//!
//! # Status Codes
//!
//! Every per-element outcome is a [`Status`]. Statuses are values, not errors:
//! a full table or a missing element is a normal answer, and a batch carries
//! on past it.
//!
//! | Operation | Possible statuses |
//! |---|---|
//! | insert | `Success`, `AlreadyPresentIgnored`, `CapacityExceeded` |
//! | lookup | `Present`, `Absent` |
//! | delete | `Success`, `NotFound` |

pub mod filter;
pub mod params;
pub mod table;

pub use filter::{MembershipFilter, SharedMembershipFilter};
pub use params::{DuplicatePolicy, FilterConfig};
pub use table::{BucketTable, Fingerprint, EMPTY_SLOT};

use std::fmt;

/// Outcome of one element of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Insert placed the element, or delete removed it.
    Success,
    /// Lookup found the element's fingerprint.
    Present,
    /// Lookup did not find the element's fingerprint.
    Absent,
    /// Insert skipped an element already present under
    /// [`DuplicatePolicy::Ignore`].
    AlreadyPresentIgnored,
    /// Delete found nothing to remove.
    NotFound,
    /// Insert ran out of kicks; the table is unchanged.
    CapacityExceeded,
}

impl Status {
    /// Integer reply code.
    ///
    /// `1` for success/present, `0` for absent/not found, `2` for an ignored
    /// duplicate and `-1` for capacity exceeded.
    ///
    /// ```
    /// use cuckoocraft::Status;
    ///
    /// assert_eq!(Status::Present.code(), 1);
    /// assert_eq!(Status::NotFound.code(), 0);
    /// assert_eq!(Status::CapacityExceeded.code(), -1);
    /// ```
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Success | Self::Present => 1,
            Self::Absent | Self::NotFound => 0,
            Self::AlreadyPresentIgnored => 2,
            Self::CapacityExceeded => -1,
        }
    }

    /// Whether the element is represented (insert, lookup) or was removed (delete).
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::Success | Self::Present | Self::AlreadyPresentIgnored
        )
    }

    /// Whether this is the one failure status, [`Status::CapacityExceeded`].
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::CapacityExceeded)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Present => "present",
            Self::Absent => "absent",
            Self::AlreadyPresentIgnored => "already present (ignored)",
            Self::NotFound => "not found",
            Self::CapacityExceeded => "capacity exceeded",
        };
        f.write_str(s)
    }
}

/// Operation kind of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Add elements.
    Insert,
    /// Test elements.
    Lookup,
    /// Remove elements.
    Delete,
}

impl Operation {
    /// Whether the operation needs exclusive access.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Lookup)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Insert => "insert",
            Self::Lookup => "lookup",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Success.code(), 1);
        assert_eq!(Status::Present.code(), 1);
        assert_eq!(Status::Absent.code(), 0);
        assert_eq!(Status::NotFound.code(), 0);
        assert_eq!(Status::AlreadyPresentIgnored.code(), 2);
        assert_eq!(Status::CapacityExceeded.code(), -1);
    }

    #[test]
    fn test_status_classification() {
        assert!(Status::Success.is_success());
        assert!(Status::AlreadyPresentIgnored.is_success());
        assert!(!Status::Absent.is_success());
        assert!(!Status::NotFound.is_success());
        assert!(Status::CapacityExceeded.is_failure());
        assert!(!Status::NotFound.is_failure());
    }

    #[test]
    fn test_operation_mutating() {
        assert!(Operation::Insert.is_mutating());
        assert!(Operation::Delete.is_mutating());
        assert!(!Operation::Lookup.is_mutating());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::CapacityExceeded.to_string(), "capacity exceeded");
        assert_eq!(Operation::Lookup.to_string(), "lookup");
    }
}
