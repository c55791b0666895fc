//! Diagnostic reporting for skipped work
//!
//! Every error the pipeline swallows (vanished entries, unreadable
//! files, empty files, a failed root, a broken output stream) is routed
//! through [`Diagnostics`] so that skips stay observable. The record
//! stream never carries diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Why a worker dropped a task without emitting a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// `stat` failed
    Stat,
    /// The path resolved to something other than a regular file
    NotRegularFile,
    /// Zero-length file
    Empty,
    /// The file could not be opened
    Open,
    /// Reading failed part way through
    Read,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::Stat => "stat failed",
            DropReason::NotRegularFile => "not a regular file",
            DropReason::Empty => "empty file",
            DropReason::Open => "open failed",
            DropReason::Read => "read failed",
        };
        f.write_str(s)
    }
}

/// A non-fatal condition observed while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An entry disappeared between listing and inspection
    EntryVanished { path: PathBuf },

    /// An entry could not be read due to permissions
    PermissionDenied { path: PathBuf },

    /// The walk of one root was aborted
    RootFailed { root: PathBuf, message: String },

    /// A worker skipped a file
    TaskDropped {
        path: PathBuf,
        reason: DropReason,
        message: Option<String>,
    },

    /// Writing to the destination stream failed; later records are discarded
    SinkFailed { message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EntryVanished { path } => {
                write!(f, "file no longer exists: {}", path.display())
            }
            Diagnostic::PermissionDenied { path } => {
                write!(f, "access denied: {}", path.display())
            }
            Diagnostic::RootFailed { root, message } => {
                write!(f, "error walking {}: {message}", root.display())
            }
            Diagnostic::TaskDropped {
                path,
                reason,
                message,
            } => match message {
                Some(msg) => write!(f, "skipped {} ({reason}: {msg})", path.display()),
                None => write!(f, "skipped {} ({reason})", path.display()),
            },
            Diagnostic::SinkFailed { message } => {
                write!(f, "output stream failed: {message}")
            }
        }
    }
}

/// Receiver for diagnostics
///
/// Called concurrently from the walker, every worker and the sink.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Routes diagnostics to the `log` facade
///
/// Walk problems are warnings, a failed root or sink is an error, and
/// dropped tasks are debug-level since empty files alone can be
/// numerous.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::EntryVanished { .. } | Diagnostic::PermissionDenied { .. } => {
                log::warn!("{diagnostic}")
            }
            Diagnostic::RootFailed { .. } | Diagnostic::SinkFailed { .. } => {
                log::error!("{diagnostic}")
            }
            Diagnostic::TaskDropped { .. } => log::debug!("{diagnostic}"),
        }
    }
}

/// Discards all diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_task_dropped() {
        let d = Diagnostic::TaskDropped {
            path: PathBuf::from("/tmp/empty"),
            reason: DropReason::Empty,
            message: None,
        };
        assert_eq!(d.to_string(), "skipped /tmp/empty (empty file)");

        let d = Diagnostic::TaskDropped {
            path: PathBuf::from("/tmp/locked"),
            reason: DropReason::Open,
            message: Some("Permission denied".into()),
        };
        assert_eq!(
            d.to_string(),
            "skipped /tmp/locked (open failed: Permission denied)"
        );
    }

    #[test]
    fn test_display_root_failed() {
        let d = Diagnostic::RootFailed {
            root: PathBuf::from("/mnt/a"),
            message: "I/O error".into(),
        };
        assert_eq!(d.to_string(), "error walking /mnt/a: I/O error");
    }
}
