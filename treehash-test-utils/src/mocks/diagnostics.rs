//! Diagnostics receiver that remembers everything it was told

use std::sync::Mutex;
use treehash_core::{Diagnostic, Diagnostics, DropReason};

/// Records every reported diagnostic, in report order
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reported: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn all(&self) -> Vec<Diagnostic> {
        self.reported
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of reported diagnostics matching `pred`
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.all().iter().filter(|d| pred(d)).count()
    }

    /// Number of tasks dropped for `reason`
    pub fn dropped(&self, reason: DropReason) -> usize {
        self.count(|d| matches!(d, Diagnostic::TaskDropped { reason: r, .. } if *r == reason))
    }

    /// Number of failed roots
    pub fn failed_roots(&self) -> usize {
        self.count(|d| matches!(d, Diagnostic::RootFailed { .. }))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut reported) = self.reported.lock() {
            reported.push(diagnostic);
        }
    }
}
