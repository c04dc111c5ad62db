//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = TriangleMatrixError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug, PartialEq, Eq)]
pub enum TriangleMatrixError {
    /// The number of pairs for `num_items` items does not fit in `usize`.
    Overflow {
        /// Requested number of items.
        num_items: usize,
    },
    /// A value buffer does not match the number of pairs.
    LengthMismatch {
        /// Number of pairs implied by the number of items.
        expected: usize,
        /// Length of the given buffer.
        actual: usize,
    },
}

impl fmt::Display for TriangleMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Overflow { num_items } => write!(
                f,
                "OverflowError: the pairs of {num_items} items overflow the address space"
            ),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "LengthMismatchError: expected {expected} pairwise values, but got {actual}"
            ),
        }
    }
}

impl Error for TriangleMatrixError {}
