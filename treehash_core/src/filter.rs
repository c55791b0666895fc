//! Path exclusion filter
//!
//! A single compiled regular expression tested against the full path
//! of each file the walker finds. Directories are never tested, so a
//! pattern that matches a directory name does not prune that
//! directory: its children are excluded only if their own paths match.
//! Patterns written against a path component followed by a separator
//! (like [`DEFAULT_EXCLUDE_PATTERN`]) therefore exclude whole subtrees
//! in practice.

use regex::Regex;
use std::path::Path;

use crate::error::ValidationError;

/// Default exclusion: version-control metadata directories
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"(^|[/\\])\.(git|hg|svn)[/\\]";

/// Compiled exclusion pattern
#[derive(Debug, Clone)]
pub struct PathFilter {
    regex: Option<Regex>,
}

impl PathFilter {
    /// Compile an exclusion pattern
    pub fn new(pattern: &str) -> Result<Self, ValidationError> {
        let regex =
            Regex::new(pattern).map_err(|e| ValidationError::invalid_pattern(pattern, e))?;
        Ok(Self { regex: Some(regex) })
    }

    /// A filter that excludes nothing
    pub fn none() -> Self {
        Self { regex: None }
    }

    /// Whether `path` is excluded
    pub fn matches(&self, path: &Path) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&path.to_string_lossy()),
            None => false,
        }
    }

    /// Source of the compiled pattern, if any
    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        // The default pattern is a compile-time constant known to be valid
        Self {
            regex: Regex::new(DEFAULT_EXCLUDE_PATTERN).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_excludes_vcs_metadata() {
        let filter = PathFilter::default();
        assert!(filter.matches(Path::new("/repo/.git/config")));
        assert!(filter.matches(Path::new("repo/.hg/store/data")));
        assert!(filter.matches(Path::new(r"C:\repo\.svn\entries")));
        assert!(filter.matches(Path::new(".git/HEAD")));
    }

    #[test]
    fn test_default_keeps_lookalikes() {
        let filter = PathFilter::default();
        assert!(!filter.matches(Path::new("/repo/.gitignore")));
        assert!(!filter.matches(Path::new("/repo/src/git/mod.rs")));
        assert!(!filter.matches(Path::new("/repo/my.git/file")));
    }

    #[test]
    fn test_matches_full_path_not_basename() {
        let filter = PathFilter::new("^/srv/cache/").unwrap();
        assert!(filter.matches(Path::new("/srv/cache/blob")));
        assert!(!filter.matches(Path::new("/other/srv/cache/blob")));
    }

    #[test]
    fn test_directory_name_does_not_match_children_by_itself() {
        // Anchored to the end: only a path ending in "build" matches,
        // so files below a "build" directory are not excluded.
        let filter = PathFilter::new("/build$").unwrap();
        assert!(filter.matches(Path::new("/proj/build")));
        assert!(!filter.matches(Path::new("/proj/build/out.o")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = PathFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_none_matches_nothing() {
        let filter = PathFilter::none();
        assert!(!filter.matches(Path::new("/repo/.git/config")));
        assert_eq!(filter.pattern(), None);
    }

    proptest! {
        #[test]
        fn prop_none_never_matches(s in "\\PC*") {
            prop_assert!(!PathFilter::none().matches(Path::new(&s)));
        }

        #[test]
        fn prop_literal_pattern_matches_containing_paths(
            prefix in "[a-z/]{0,12}",
            needle in "[a-z]{1,8}",
            suffix in "[a-z/]{0,12}",
        ) {
            let filter = PathFilter::new(&regex::escape(&needle)).unwrap();
            let path = format!("{prefix}{needle}{suffix}");
            prop_assert!(filter.matches(Path::new(&path)));
        }
    }
}
