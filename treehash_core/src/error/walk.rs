//! Traversal errors that abort the walk of one root

use std::path::{Path, PathBuf};
use thiserror::Error;

/// An entry error the walker could not skip
#[derive(Error, Debug)]
#[error("Walk of {} aborted{}: {source}", root.display(), at_path(.path))]
pub struct WalkError {
    /// Root whose walk was aborted
    pub root: PathBuf,
    /// Entry being visited when the error occurred
    pub path: Option<PathBuf>,
    #[source]
    pub source: std::io::Error,
}

impl WalkError {
    pub fn new(root: &Path, path: Option<&Path>, source: std::io::Error) -> Self {
        Self {
            root: root.to_path_buf(),
            path: path.map(Path::to_path_buf),
            source,
        }
    }
}

fn at_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}
