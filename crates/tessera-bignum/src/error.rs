//! Error types for big integer operations.

use tessera_handle::HandleError;
use thiserror::Error;

/// Result alias for big integer operations.
pub type Result<T> = std::result::Result<T, BigIntError>;

/// Errors from constructing, converting or computing with big integers.
///
/// Every operation either succeeds completely or returns one of these and
/// leaves its receiver at the value it had before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BigIntError {
    /// An operand's handle is empty (moved-from or released)
    #[error("invalid handle: big integer is absent (moved-from or released)")]
    InvalidHandle,

    /// A limb buffer could not be allocated
    #[error("allocation failure: could not obtain storage for {limbs} limbs")]
    AllocationFailure {
        /// Number of limbs requested
        limbs: usize,
    },

    /// Malformed input to a constructor or codec
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input
        reason: String,
    },

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// An arithmetic kernel violated its own invariant
    #[error("arithmetic backend failure in {operation}")]
    ArithmeticBackend {
        /// Operation that failed
        operation: &'static str,
    },
}

impl BigIntError {
    /// Build an [`BigIntError::InvalidArgument`] from any message.
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }

    /// Build an [`BigIntError::ArithmeticBackend`] and record it.
    pub(crate) fn backend(operation: &'static str) -> Self {
        tracing::debug!(operation, "arithmetic kernel invariant violated");
        Self::ArithmeticBackend { operation }
    }

    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Fatal errors indicate a caller bug (touching an empty handle) or an
    /// internal defect. The rest describe bad input or resource pressure
    /// and leave every operand usable.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidHandle => true,
            Self::ArithmeticBackend { .. } => true,

            Self::AllocationFailure { .. } => false,
            Self::InvalidArgument { .. } => false,
            Self::DivisionByZero => false,
        }
    }
}

impl From<HandleError> for BigIntError {
    fn from(err: HandleError) -> Self {
        match err {
            HandleError::InvalidHandle => Self::InvalidHandle,
            HandleError::AllocationFailure { bytes } => {
                Self::AllocationFailure { limbs: bytes.div_ceil(size_of::<u64>()) }
            },
        }
    }
}
