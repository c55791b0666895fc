//! Directory tree walker
//!
//! Streams file paths out of one or more roots using walkdir. Entries
//! that vanish or are unreadable are reported and skipped; any other
//! traversal error ends the walk of that root only.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{IoErrorKind, WalkError};
use crate::filter::PathFilter;
use crate::record::FileTask;

/// Lazy, exhaustive iterator over the non-directory entries under a root
///
/// Symlinks are not followed; a link is yielded like any other
/// non-directory entry and workers decide what it resolves to. After
/// yielding an `Err` the iterator is exhausted.
pub struct TreeWalker<'a> {
    root: PathBuf,
    walker: walkdir::IntoIter,
    filter: &'a PathFilter,
    diagnostics: &'a dyn Diagnostics,
    finished: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(root: &Path, filter: &'a PathFilter, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            root: root.to_path_buf(),
            walker: WalkDir::new(root).follow_links(false).into_iter(),
            filter,
            diagnostics,
            finished: false,
        }
    }

    /// Report a skippable error, or turn it into the fatal error for this root
    fn handle_error(&mut self, err: walkdir::Error) -> Option<WalkError> {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        let kind = err
            .io_error()
            .map(|e| IoErrorKind::classify(e.kind()))
            .unwrap_or(IoErrorKind::Other);

        if !kind.is_skippable() {
            let message = err.to_string();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other(message));
            return Some(WalkError::new(&self.root, Some(&path), source));
        }

        let diagnostic = match kind {
            IoErrorKind::PermissionDenied => Diagnostic::PermissionDenied { path },
            _ => Diagnostic::EntryVanished { path },
        };
        self.diagnostics.report(diagnostic);
        None
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = Result<FileTask, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    // Directories are always descended into and never filtered
                    if entry.file_type().is_dir() {
                        continue;
                    }
                    if self.filter.matches(entry.path()) {
                        continue;
                    }
                    return Some(Ok(FileTask::new(entry.into_path())));
                }
                Err(err) => {
                    if let Some(fatal) = self.handle_error(err) {
                        self.finished = true;
                        return Some(Err(fatal));
                    }
                }
            }
        }
    }
}

/// Walk each root in turn, handing every task to `push`
///
/// `push` returns `false` when nobody is left to receive tasks, which
/// stops the whole walk. A fatal error ends only its own root: it is
/// reported as [`Diagnostic::RootFailed`], collected, and the next root
/// is walked.
pub fn walk_roots<F>(
    roots: &[PathBuf],
    filter: &PathFilter,
    diagnostics: &dyn Diagnostics,
    mut push: F,
) -> Vec<WalkError>
where
    F: FnMut(FileTask) -> bool,
{
    let mut failures = Vec::new();

    'roots: for root in roots {
        log::debug!("Walking {}", root.display());
        for item in TreeWalker::new(root, filter, diagnostics) {
            match item {
                Ok(task) => {
                    if !push(task) {
                        log::warn!("Task queue closed early; stopping walk");
                        break 'roots;
                    }
                }
                Err(err) => {
                    diagnostics.report(Diagnostic::RootFailed {
                        root: root.clone(),
                        message: err.to_string(),
                    });
                    failures.push(err);
                }
            }
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Diagnostic>>);

    impl Diagnostics for Recorder {
        fn report(&self, diagnostic: Diagnostic) {
            self.0.lock().unwrap().push(diagnostic);
        }
    }

    fn create_test_directory() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::write(base.join("a.txt"), b"abcd").unwrap();
        fs::write(base.join("b.txt"), b"").unwrap();

        let git = base.join(".git");
        fs::create_dir(&git).unwrap();
        fs::write(git.join("config"), b"[core]").unwrap();

        let subdir = base.join("sub");
        fs::create_dir(&subdir).unwrap();
        fs::write(subdir.join("nested.bin"), b"nested").unwrap();

        dir
    }

    fn names(tasks: &[FileTask]) -> Vec<String> {
        let mut names: Vec<_> = tasks
            .iter()
            .map(|t| t.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_walk_yields_files_not_directories() {
        let dir = create_test_directory();
        let filter = PathFilter::none();
        let tasks: Vec<_> = TreeWalker::new(dir.path(), &filter, &NullDiagnostics)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        // Empty files are still yielded; workers drop them
        assert_eq!(names(&tasks), vec!["a.txt", "b.txt", "config", "nested.bin"]);
    }

    #[test]
    fn test_walk_applies_default_filter() {
        let dir = create_test_directory();
        let filter = PathFilter::default();
        let tasks: Vec<_> = TreeWalker::new(dir.path(), &filter, &NullDiagnostics)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(names(&tasks), vec!["a.txt", "b.txt", "nested.bin"]);
    }

    #[test]
    fn test_excluding_directory_name_does_not_prune_subtree() {
        let dir = create_test_directory();
        // Matches the directory path itself but none of its children
        let filter = PathFilter::new("sub$").unwrap();
        let tasks: Vec<_> = TreeWalker::new(dir.path(), &filter, &NullDiagnostics)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(names(&tasks).contains(&"nested.bin".to_string()));
    }

    #[test]
    fn test_missing_root_is_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let recorder = Recorder::default();
        let filter = PathFilter::none();

        let items: Vec<_> = TreeWalker::new(&missing, &filter, &recorder).collect();
        assert!(items.is_empty());

        let reported = recorder.0.lock().unwrap();
        assert_eq!(
            *reported,
            vec![Diagnostic::EntryVanished {
                path: missing.clone()
            }]
        );
    }

    #[test]
    fn test_walk_roots_continues_after_missing_root() {
        let dir = create_test_directory();
        let missing = dir.path().join("gone");
        let roots = vec![missing, dir.path().join("sub")];
        let filter = PathFilter::none();

        let mut seen = Vec::new();
        let failures = walk_roots(&roots, &filter, &NullDiagnostics, |task| {
            seen.push(task);
            true
        });

        assert!(failures.is_empty());
        assert_eq!(names(&seen), vec!["nested.bin"]);
    }

    #[test]
    fn test_walk_roots_stops_when_push_refuses() {
        let dir = create_test_directory();
        let roots = vec![dir.path().to_path_buf(), dir.path().to_path_buf()];
        let filter = PathFilter::none();

        let mut pushed = 0;
        walk_roots(&roots, &filter, &NullDiagnostics, |_| {
            pushed += 1;
            false
        });
        assert_eq!(pushed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = create_test_directory();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses permission bits; nothing to observe in that case
        let readable = fs::read_dir(&locked).is_ok();

        let recorder = Recorder::default();
        let filter = PathFilter::none();
        let result: Result<Vec<_>, _> = TreeWalker::new(dir.path(), &filter, &recorder).collect();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let tasks = result.unwrap();
        assert!(names(&tasks).contains(&"a.txt".to_string()));
        if !readable {
            assert!(!names(&tasks).contains(&"secret".to_string()));
            let reported = recorder.0.lock().unwrap();
            assert!(
                reported
                    .iter()
                    .any(|d| matches!(d, Diagnostic::PermissionDenied { .. }))
            );
        }
    }
}
