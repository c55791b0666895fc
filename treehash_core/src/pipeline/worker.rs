//! Hashing worker pool
//!
//! A fixed set of OS threads pulling [`FileTask`]s off the work queue
//! and pushing [`FileRecord`]s onto the output queue. Workers hold no
//! state besides a reusable read buffer; every file gets a fresh hash
//! session from the shared engine.

use crossbeam_channel::{Receiver, Sender};
use std::fs::{self, File};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::stats::ScanStats;
use crate::diagnostics::{Diagnostic, Diagnostics, DropReason};
use crate::hashing::{HashEngine, hash_reader};
use crate::record::{Digest, FileRecord, FileTask};

/// Per-file processing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
    /// Files at or above this size get [`Digest::Skipped`]
    pub max_hash_size: Option<u64>,
    /// Read buffer size per worker
    pub buffer_size: usize,
}

/// A task that ended without a record
#[derive(Debug)]
pub struct Dropped {
    pub reason: DropReason,
    pub source: Option<io::Error>,
}

impl Dropped {
    fn new(reason: DropReason, source: Option<io::Error>) -> Self {
        Self { reason, source }
    }

    fn into_diagnostic(self, task: FileTask) -> Diagnostic {
        Diagnostic::TaskDropped {
            path: task.into_path(),
            reason: self.reason,
            message: self.source.map(|e| e.to_string()),
        }
    }
}

/// Turn one task into a record
///
/// Size is checked before any content is read. Empty files, anything
/// that is not a regular file once symlinks are resolved, and any
/// stat/open/read failure end as [`Dropped`]; no partial record is ever
/// produced.
pub fn process_task(
    task: &FileTask,
    engine: &dyn HashEngine,
    max_hash_size: Option<u64>,
    buf: &mut [u8],
) -> Result<FileRecord, Dropped> {
    let path = task.path();

    let metadata =
        fs::metadata(path).map_err(|e| Dropped::new(DropReason::Stat, Some(e)))?;
    if !metadata.is_file() {
        return Err(Dropped::new(DropReason::NotRegularFile, None));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(Dropped::new(DropReason::Empty, None));
    }

    let digest = match max_hash_size {
        Some(limit) if size >= limit => Digest::Skipped,
        _ => {
            let file = File::open(path).map_err(|e| Dropped::new(DropReason::Open, Some(e)))?;
            let hex = hash_reader(engine, file, buf)
                .map_err(|e| Dropped::new(DropReason::Read, Some(e)))?;
            Digest::Hex(hex)
        }
    };

    Ok(FileRecord {
        digest,
        size,
        path: path.to_path_buf(),
    })
}

/// Handle to the running workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `size` workers
    ///
    /// Each worker exits once `tasks` is closed and empty, or when the
    /// output queue has lost its receiver.
    pub fn spawn(
        size: usize,
        tasks: Receiver<FileTask>,
        records: Sender<FileRecord>,
        engine: Arc<dyn HashEngine>,
        options: WorkerOptions,
        diagnostics: Arc<dyn Diagnostics>,
        stats: Arc<ScanStats>,
    ) -> io::Result<Self> {
        let mut handles = Vec::with_capacity(size);

        for id in 0..size {
            let tasks = tasks.clone();
            let records = records.clone();
            let engine = Arc::clone(&engine);
            let diagnostics = Arc::clone(&diagnostics);
            let stats = Arc::clone(&stats);

            let handle = thread::Builder::new()
                .name(format!("hash-worker-{id}"))
                .spawn(move || {
                    worker_loop(
                        tasks,
                        records,
                        engine.as_ref(),
                        options,
                        diagnostics.as_ref(),
                        &stats,
                    )
                })?;
            handles.push(handle);
        }

        log::debug!("Started {size} hash workers");
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit
    pub fn join(self) {
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("hash-worker").to_string();
            if handle.join().is_err() {
                log::error!("{name} panicked");
            }
        }
    }
}

fn worker_loop(
    tasks: Receiver<FileTask>,
    records: Sender<FileRecord>,
    engine: &dyn HashEngine,
    options: WorkerOptions,
    diagnostics: &dyn Diagnostics,
    stats: &ScanStats,
) {
    let mut buf = vec![0u8; options.buffer_size.max(1)];

    for task in tasks.iter() {
        match process_task(&task, engine, options.max_hash_size, &mut buf) {
            Ok(record) => {
                if record.digest.is_skipped() {
                    ScanStats::incr(&stats.size_only);
                } else {
                    ScanStats::add(&stats.bytes_hashed, record.size);
                }
                if records.send(record).is_err() {
                    log::warn!("Output queue closed; worker exiting");
                    break;
                }
                ScanStats::incr(&stats.records_emitted);
            }
            Err(dropped) => {
                ScanStats::incr(&stats.tasks_dropped);
                diagnostics.report(dropped.into_diagnostic(task));
            }
        }
    }
}
