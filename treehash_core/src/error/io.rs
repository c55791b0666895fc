//! I/O related error types

use std::path::PathBuf;
use thiserror::Error;

/// I/O error with additional context
#[derive(Error, Debug)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path associated with the error (if any)
    pub path: Option<PathBuf>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<std::io::Error>,
}

/// Kind of I/O error
///
/// The walker treats the first two kinds as skippable, everything
/// else as fatal for the root being walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// File not found (including entries removed mid-walk)
    FileNotFound,
    /// Permission denied
    PermissionDenied,
    /// Generic I/O error
    Other,
}

impl IoErrorKind {
    /// Classify a standard I/O error kind
    pub fn classify(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => Self::FileNotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }

    /// Whether the walker may skip an entry failing with this kind
    pub fn is_skippable(self) -> bool {
        matches!(self, Self::FileNotFound | Self::PermissionDenied)
    }
}

impl IoError {
    /// Create an I/O error from a standard I/O error
    pub fn from_std(source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::classify(source.kind()),
            path: None,
            source: Some(source),
        }
    }
}

fn format_io_error(error: &IoError) -> String {
    let detail = error
        .source
        .as_ref()
        .map(|e| format!(": {e}"))
        .unwrap_or_default();

    match (&error.kind, &error.path) {
        (IoErrorKind::FileNotFound, Some(path)) => {
            format!("File not found: {}", path.display())
        }
        (IoErrorKind::FileNotFound, None) => "File not found".to_string(),
        (IoErrorKind::PermissionDenied, Some(path)) => {
            format!("Permission denied: {}", path.display())
        }
        (IoErrorKind::PermissionDenied, None) => "Permission denied".to_string(),
        (IoErrorKind::Other, Some(path)) => format!("I/O error on {}{detail}", path.display()),
        (IoErrorKind::Other, None) => format!("I/O error{detail}"),
    }
}
