//! Counters shared by every pipeline stage

use std::sync::atomic::{AtomicU64, Ordering};

/// Live scan counters
///
/// Incremented from the walker, the workers and the sink; read once the
/// pipeline has drained.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Tasks pushed onto the work queue
    pub tasks_queued: AtomicU64,

    /// Records produced by workers
    pub records_emitted: AtomicU64,

    /// Records produced without hashing
    pub size_only: AtomicU64,

    /// Tasks dropped without a record
    pub tasks_dropped: AtomicU64,

    /// Bytes streamed through the hash engine
    pub bytes_hashed: AtomicU64,

    /// Records accepted by the destination writer
    pub records_written: AtomicU64,
}

impl ScanStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Plain copy of the current values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tasks_queued: self.tasks_queued.load(Ordering::Relaxed),
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            size_only: self.size_only.load(Ordering::Relaxed),
            tasks_dropped: self.tasks_dropped.load(Ordering::Relaxed),
            bytes_hashed: self.bytes_hashed.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ScanStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatsSnapshot {
    pub tasks_queued: u64,
    pub records_emitted: u64,
    pub size_only: u64,
    pub tasks_dropped: u64,
    pub bytes_hashed: u64,
    pub records_written: u64,
}

impl StatsSnapshot {
    /// Every queued task ended as a record or a drop
    pub fn is_balanced(&self) -> bool {
        self.tasks_queued == self.records_emitted + self.tasks_dropped
    }
}
