//! Root list handling

use std::path::PathBuf;

use crate::error::ValidationError;

/// Split a comma-separated root argument, ignoring blank segments
pub fn split_roots(arg: &str) -> Vec<PathBuf> {
    arg.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Startup check on the root list
///
/// Fails when the list is empty or when none of the roots exist. A
/// missing root among existing ones is let through: the walker reports
/// it and moves on to the next root.
pub fn check_roots(roots: &[PathBuf]) -> Result<(), ValidationError> {
    if roots.is_empty() {
        return Err(ValidationError::NoRoots);
    }

    let missing: Vec<PathBuf> = roots.iter().filter(|r| !r.exists()).cloned().collect();
    if missing.len() == roots.len() {
        return Err(ValidationError::RootsNotFound { paths: missing });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_roots() {
        assert_eq!(
            split_roots("/a,/b , ,/c,"),
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/b"),
                PathBuf::from("/c")
            ]
        );
        assert!(split_roots("").is_empty());
        assert!(split_roots(" , ").is_empty());
    }

    #[test]
    fn test_check_roots_empty() {
        assert!(matches!(check_roots(&[]), Err(ValidationError::NoRoots)));
    }

    #[test]
    fn test_check_roots_all_missing() {
        let dir = TempDir::new().unwrap();
        let roots = vec![dir.path().join("x"), dir.path().join("y")];
        match check_roots(&roots) {
            Err(ValidationError::RootsNotFound { paths }) => assert_eq!(paths, roots),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_check_roots_some_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let roots = vec![dir.path().join("x"), dir.path().to_path_buf()];
        assert!(check_roots(&roots).is_ok());
    }
}
