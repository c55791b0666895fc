//! Test utilities for treehash
//!
//! Fixture builders for on-disk trees and recording doubles for the
//! pipeline's injected collaborators.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{TestTree, TestTreeBuilder};
pub use mocks::{CountingEngine, RecordingDiagnostics};
