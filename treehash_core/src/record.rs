//! Work items and results flowing through the pipeline

use std::fmt;
use std::path::{Path, PathBuf};

/// Text rendered in place of a digest for files that were not hashed
pub const SKIPPED_DIGEST: &str = "-";

/// One regular file discovered by the walker
///
/// Consumed exactly once by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Content fingerprint of a file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Digest {
    /// Lowercase hexadecimal hash of the full content
    Hex(String),
    /// Size recorded, content not hashed
    Skipped,
}

impl Digest {
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Digest::Hex(hex) => Some(hex),
            Digest::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Digest::Skipped)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Digest::Hex(hex) => f.write_str(hex),
            Digest::Skipped => f.write_str(SKIPPED_DIGEST),
        }
    }
}

/// Result of processing one [`FileTask`]
///
/// `Display` renders the canonical `digest:size:path` form without a
/// line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub digest: Digest,
    pub size: u64,
    pub path: PathBuf,
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.digest, self.size, self.path.display())
    }
}
