//! Error types for tree construction and cached-count reads.

use thiserror::Error;

use crate::DocId;

/// Errors reported by [`GeneralizedSuffixTree`](crate::GeneralizedSuffixTree).
///
/// Structural inconsistencies inside the tree are not represented here; they
/// are bugs and panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Document ids must be inserted in non-decreasing order: node id lists
    /// are append-only and searched with a binary search.
    #[error("Document id {id} is lower than the previously inserted id {last}")]
    OutOfOrderId {
        /// The rejected id.
        id: DocId,
        /// The id of the previous insertion.
        last: DocId,
    },

    /// A cached distinct-id count was read before `compute_count()` ran, or
    /// after an insertion made the cached values stale.
    #[error("Result count read without calling compute_count() after the last insertion")]
    CountNotComputed,

    /// Label offsets are 32 bits wide.
    #[error("Document of {0} code points is too long to index")]
    DocumentTooLong(usize),
}

/// A specialized `Result` type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
