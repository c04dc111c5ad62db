//! Error definitions.
use std::error::Error;
use std::{fmt, io, result};

use triangle_matrix::errors::TriangleMatrixError;

/// A specialized Result type for this library.
pub type Result<T, E = FindPlagiarismError> = result::Result<T, E>;

/// Errors in find-plagiarism.
#[derive(Debug)]
pub enum FindPlagiarismError {
    /// Contains [`InputError`].
    Input(InputError),
    /// Error while reading the corpus or the ground truth.
    Io(io::Error),
    /// Error while drawing random hash functions.
    HashGeneration(anyhow::Error),
}

impl fmt::Display for FindPlagiarismError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
            Self::Io(e) => write!(f, "IoError: {e}"),
            Self::HashGeneration(e) => write!(f, "HashGenerationError: {e}"),
        }
    }
}

impl Error for FindPlagiarismError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(_) => None,
            Self::Io(e) => Some(e),
            Self::HashGeneration(e) => {
                let e: &(dyn Error + 'static) = e.as_ref();
                Some(e)
            }
        }
    }
}

impl From<io::Error> for FindPlagiarismError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TriangleMatrixError> for FindPlagiarismError {
    fn from(e: TriangleMatrixError) -> Self {
        Self::input(e.to_string())
    }
}

impl FindPlagiarismError {
    pub(crate) fn input<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Input(InputError { msg: msg.into() })
    }
}

/// Error used when the input argument or data is invalid.
#[derive(Debug)]
pub struct InputError {
    msg: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputError: {}", self.msg)
    }
}
