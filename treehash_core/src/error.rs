//! Error types for the treehash core library
//!
//! Errors are grouped by the scope they abort. Per-entry and per-task
//! failures never surface here: they are reported through
//! [`crate::diagnostics`] and skipped. What remains are structural walk
//! errors (fatal for one root) and validation errors (fatal at startup).

use thiserror::Error;

pub mod io;
pub mod validation;
pub mod walk;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use self::walk::WalkError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the treehash core library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Configuration and input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unrecoverable traversal errors for a single root
    #[error(transparent)]
    Walk(#[from] WalkError),
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}
