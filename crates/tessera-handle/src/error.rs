//! Error types for handle operations.

use thiserror::Error;

/// Result alias for handle operations.
pub type Result<T> = std::result::Result<T, HandleError>;

/// Errors from creating or accessing a [`crate::Handle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The handle is empty: moved-from, released, or never initialized
    #[error("invalid handle: object is absent (moved-from or released)")]
    InvalidHandle,

    /// Backing storage for the object could not be obtained
    #[error("allocation failure: could not obtain {bytes} bytes")]
    AllocationFailure {
        /// Number of bytes requested from the allocator
        bytes: usize,
    },
}

impl HandleError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Touching an empty handle is a caller bug. Allocation failure may
    /// succeed later, so whether to retry is left to the caller.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidHandle => true,
            Self::AllocationFailure { .. } => false,
        }
    }
}
