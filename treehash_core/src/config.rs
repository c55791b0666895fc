//! Scan configuration

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::DEFAULT_EXCLUDE_PATTERN;
use crate::hashing::{DEFAULT_BUFFER_SIZE, HashAlgorithm};

/// Threshold applied when size-only mode is enabled without a size
pub const DEFAULT_MAX_HASH_SIZE: u64 = 50 * 1024 * 1024;

/// Workers started per available CPU
pub const WORKERS_PER_CPU: usize = 4;

/// Queue slots allotted per worker when no capacity is configured
pub const QUEUE_SLOTS_PER_WORKER: usize = 64;

/// Settings for one scan
///
/// `queue_capacity` of `None` means `workers * QUEUE_SLOTS_PER_WORKER`,
/// applied to both the work queue and the output queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    /// Files at or above this size are recorded without hashing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hash_size: Option<u64>,
    pub algorithm: HashAlgorithm,
    pub exclude: String,
    pub buffer_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: None,
            max_hash_size: None,
            algorithm: HashAlgorithm::default(),
            exclude: DEFAULT_EXCLUDE_PATTERN.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ScanConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            workers: 4,
            queue_capacity: Some(8),
            buffer_size: 1024,
            ..Self::default()
        }
    }

    /// Effective capacity of each bounded queue
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or_else(|| self.workers.saturating_mul(QUEUE_SLOTS_PER_WORKER))
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.workers == 0 {
            return Err(ValidationError::invalid_parameter(
                "workers",
                "must be at least 1",
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(ValidationError::invalid_parameter(
                "queue_capacity",
                "must be at least 1",
            ));
        }
        if self.buffer_size == 0 {
            return Err(ValidationError::invalid_parameter(
                "buffer_size",
                "must be greater than 0",
            ));
        }
        if self.max_hash_size == Some(0) {
            return Err(ValidationError::invalid_parameter(
                "max_hash_size",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// A small multiple of the available parallelism
pub fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
    cpus * WORKERS_PER_CPU
}
