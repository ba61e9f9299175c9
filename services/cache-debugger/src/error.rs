//! Error types for cache comparison.

use std::time::Duration;

use thiserror::Error;

/// Result type for comparer operations.
pub type CompareResult<T> = Result<T, CompareError>;

/// Failure reading from an authoritative lister.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    /// The backing source could not be reached.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The read did not complete in time.
    #[error("read timed out after {0:?}")]
    Timeout(Duration),

    /// Any other read failure.
    #[error("read failed: {0}")]
    Other(String),
}

impl ReadError {
    /// Returns true if the next pass is likely to succeed without intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Errors that abort a comparison pass.
///
/// Discrepancies between cache and authoritative state are never errors.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to list nodes: {0}")]
    ListNodes(#[source] ReadError),

    #[error("failed to list pods: {0}")]
    ListPods(#[source] ReadError),
}

impl CompareError {
    /// The underlying read failure.
    pub fn read_error(&self) -> &ReadError {
        match self {
            Self::ListNodes(e) | Self::ListPods(e) => e,
        }
    }
}
