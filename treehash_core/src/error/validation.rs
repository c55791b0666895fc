//! Validation related error types

use std::path::PathBuf;
use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid input parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// Exclusion pattern failed to compile
    #[error("Invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No root directory given
    #[error("No root directory specified")]
    NoRoots,

    /// None of the given roots exist
    #[error("Root directory does not exist: {}", display_paths(.paths))]
    RootsNotFound { paths: Vec<PathBuf> },
}

impl ValidationError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = ValidationError::invalid_parameter("queue_capacity", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'queue_capacity': must be at least 1"
        );
    }

    #[test]
    fn test_roots_not_found_lists_every_path() {
        let err = ValidationError::RootsNotFound {
            paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        };
        assert_eq!(err.to_string(), "Root directory does not exist: /a, /b");
    }
}
