//! On-disk directory tree fixtures

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a temporary directory tree
///
/// Paths are relative to the tree root; parent directories are created
/// as needed.
#[derive(Debug, Default)]
pub struct TestTreeBuilder {
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl TestTreeBuilder {
    /// Create a new, empty tree builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), content.as_ref().to_vec()));
        self
    }

    /// Add a file of `size` bytes filled with a repeating pattern
    pub fn with_sized_file(self, path: impl AsRef<Path>, size: usize) -> Self {
        let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        self.with_file(path, content)
    }

    /// Add `count` small files named `file-N.dat` under `dir`
    pub fn with_many_files(mut self, dir: impl AsRef<Path>, count: usize) -> Self {
        for i in 0..count {
            let path = dir.as_ref().join(format!("file-{i}.dat"));
            self = self.with_file(path, format!("content of file {i}"));
        }
        self
    }

    /// Materialize the tree in a fresh temporary directory
    pub fn build(self) -> io::Result<TestTree> {
        let dir = TempDir::new()?;

        for (rel, content) in &self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }

        Ok(TestTree { dir })
    }
}

/// A temporary directory tree, removed on drop
#[derive(Debug)]
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Start building a tree
    pub fn builder() -> TestTreeBuilder {
        TestTreeBuilder::new()
    }

    /// Root of the tree
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the tree
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }
}
