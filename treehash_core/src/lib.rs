//! treehash core library
//!
//! Walks one or more directory trees and emits one
//! `digest:size:path` record per non-empty regular file. The walk,
//! the hashing and the output run on separate OS threads connected by
//! bounded queues, see [`pipeline`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod hashing;
pub mod pipeline;
pub mod record;
pub mod roots;
pub mod walker;

// Re-export main types
pub use config::{DEFAULT_MAX_HASH_SIZE, ScanConfig};
pub use diagnostics::{Diagnostic, Diagnostics, DropReason, LogDiagnostics, NullDiagnostics};
pub use error::{Error, Result, ValidationError, WalkError};
pub use filter::{DEFAULT_EXCLUDE_PATTERN, PathFilter};
pub use hashing::{HashAlgorithm, HashEngine, StreamingHasher};
pub use pipeline::{
    CollectingWriter, LineWriter, Pipeline, RecordWriter, ScanSummary, StatsSnapshot,
};
pub use record::{Digest, FileRecord, FileTask, SKIPPED_DIGEST};
pub use roots::{check_roots, split_roots};
pub use walker::{TreeWalker, walk_roots};
