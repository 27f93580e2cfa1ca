use thiserror::Error;

/// Errors reported by range views, bulk loading, and cursors.
///
/// Plain absence (a missing key, an exhausted iterator, an out-of-bounds
/// rank) is always `Option::None`, never an `Error`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A view was requested whose lower bound lies above its upper bound.
    #[error("view lower bound exceeds its upper bound")]
    InvalidRange,

    /// A key passed to a view operation falls outside the view's bounds.
    /// The underlying collection is left untouched.
    #[error("key is outside the view bounds")]
    OutOfRange,

    /// Bulk-load input was not in strictly ascending key order.
    #[error("input keys are not strictly ascending")]
    Unsorted,

    /// The backing collection changed structurally after the cursor was
    /// created. The cursor stays unusable once this is reported.
    #[error("collection was structurally modified during iteration")]
    ConcurrentModification,
}
