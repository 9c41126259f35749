//! Core membership filter traits.
//!
//! Two access models are supported:
//!
//! - [`MembershipFilter`]: single owner, mutation through `&mut self`. The
//!   engine ([`CuckooFilter`](crate::filters::CuckooFilter)) implements this.
//! - [`SharedMembershipFilter`]: interior mutability, every method takes
//!   `&self`, so the filter can sit behind an `Arc` with no outer lock.
//!   [`SharedCuckooFilter`](crate::sync::SharedCuckooFilter) implements this.
//!
//! Both traits work on byte slices. Elements are opaque byte strings; callers
//! with structured keys encode them first.

use super::{Operation, Status};

/// Approximate-membership set owned by a single thread at a time.
///
/// # Contract
///
/// - **No false negatives**: after `insert(e)` returns [`Status::Success`],
///   `lookup(e)` returns [`Status::Present`] until `e` is deleted.
/// - **Bounded false positives**: `lookup(e)` of a never-inserted `e` returns
///   `Present` with probability at most [`false_positive_rate`](Self::false_positive_rate).
/// - **Counter consistency**: [`len`](Self::len) equals the number of occupied
///   slots and only changes on successful insert and delete.
///
/// # Examples
///
/// ```
/// use cuckoocraft::core::{MembershipFilter, Status};
/// use cuckoocraft::CuckooFilter;
///
/// fn load<F: MembershipFilter>(filter: &mut F, words: &[&str]) -> usize {
///     words
///         .iter()
///         .filter(|w| filter.insert(w.as_bytes()) == Status::Success)
///         .count()
/// }
///
/// let mut filter = CuckooFilter::new(64, 4, 16).unwrap();
/// assert_eq!(load(&mut filter, &["a", "b", "c"]), 3);
/// assert!(filter.contains(b"b"));
/// ```
pub trait MembershipFilter: Send + Sync {
    /// Add an element.
    ///
    /// Returns [`Status::Success`], [`Status::AlreadyPresentIgnored`] (only
    /// under [`DuplicatePolicy::Ignore`](crate::core::params::DuplicatePolicy::Ignore)),
    /// or [`Status::CapacityExceeded`], in which case the filter is unchanged.
    fn insert(&mut self, element: &[u8]) -> Status;

    /// Test membership: [`Status::Present`] or [`Status::Absent`].
    fn lookup(&self, element: &[u8]) -> Status;

    /// Boolean form of [`lookup`](Self::lookup).
    fn contains(&self, element: &[u8]) -> bool {
        self.lookup(element) == Status::Present
    }

    /// Remove one occurrence: [`Status::Success`] or [`Status::NotFound`].
    fn delete(&mut self, element: &[u8]) -> Status;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    /// Whether no slot is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alias of [`len`](Self::len).
    fn count(&self) -> usize {
        self.len()
    }

    /// Remove every element.
    fn clear(&mut self);

    /// Total slots.
    fn capacity(&self) -> usize;

    /// `len / capacity`.
    #[allow(clippy::cast_precision_loss)]
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Upper bound on the per-lookup false positive probability.
    fn false_positive_rate(&self) -> f64;

    /// Apply `op` to each element in order, one status per element.
    ///
    /// A failed element does not stop the batch.
    fn apply_batch<E>(&mut self, op: Operation, elements: &[E]) -> Vec<Status>
    where
        Self: Sized,
        E: AsRef<[u8]>,
    {
        elements
            .iter()
            .map(|e| match op {
                Operation::Insert => self.insert(e.as_ref()),
                Operation::Lookup => self.lookup(e.as_ref()),
                Operation::Delete => self.delete(e.as_ref()),
            })
            .collect()
    }
}

/// Approximate-membership set with interior mutability.
///
/// Implementations guarantee batch atomicity: every call to
/// [`apply_batch`](Self::apply_batch) is observed by concurrent callers as a
/// single indivisible step. The single-element methods are one-element batches.
pub trait SharedMembershipFilter: Send + Sync {
    /// Apply `op` to each element in order as one atomic batch.
    fn apply_batch<E>(&self, op: Operation, elements: &[E]) -> Vec<Status>
    where
        Self: Sized,
        E: AsRef<[u8]> + Sync;

    /// Add an element.
    fn insert(&self, element: &[u8]) -> Status;

    /// Test membership.
    fn lookup(&self, element: &[u8]) -> Status;

    /// Boolean form of [`lookup`](Self::lookup).
    fn contains(&self, element: &[u8]) -> bool {
        self.lookup(element) == Status::Present
    }

    /// Remove one occurrence.
    fn delete(&self, element: &[u8]) -> Status;

    /// Number of occupied slots.
    fn len(&self) -> usize;

    /// Whether no slot is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alias of [`len`](Self::len).
    fn count(&self) -> usize {
        self.len()
    }

    /// Remove every element.
    fn clear(&self);

    /// Total slots.
    fn capacity(&self) -> usize;

    /// Upper bound on the per-lookup false positive probability.
    fn false_positive_rate(&self) -> f64;
}
