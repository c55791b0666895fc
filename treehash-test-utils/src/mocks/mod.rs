//! Test doubles for injected collaborators

mod diagnostics;
mod engine;

pub use diagnostics::RecordingDiagnostics;
pub use engine::CountingEngine;
