//! Scan pipeline coordinator
//!
//! Wires the walker, the worker pool and the output sink together
//! through two bounded queues:
//!
//! ```text
//! roots ─▶ walker ─▶ [work queue] ─▶ worker 0..N ─▶ [output queue] ─▶ sink ─▶ writer
//! ```
//!
//! Shutdown happens in three phases. When the walk is over the work
//! queue sender is dropped (stop intake); the pool is joined once the
//! queue is drained (drain workers); only then is the last output
//! sender dropped and the sink joined (drain sink). A record can never
//! be sent on a closed output queue, and `run` never returns while
//! records are still in flight.

mod sink;
mod stats;
mod worker;

pub use sink::{CollectingWriter, LineWriter, OutputSink, RecordWriter, SinkReport};
pub use stats::{ScanStats, StatsSnapshot};
pub use worker::{Dropped, WorkerOptions, WorkerPool, process_task};

use crossbeam_channel::bounded;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ScanConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, WalkError};
use crate::filter::PathFilter;
use crate::hashing::HashEngine;
use crate::record::{FileRecord, FileTask};
use crate::walker::walk_roots;

/// Result of one complete run
#[derive(Debug)]
pub struct ScanSummary {
    pub stats: StatsSnapshot,
    /// Roots whose walk was aborted; their files found before the error
    /// were still processed
    pub failed_roots: Vec<WalkError>,
    /// Set when the destination stream failed
    pub sink_error: Option<io::Error>,
    pub elapsed: Duration,
}

impl ScanSummary {
    /// No root failed and every record reached the writer
    pub fn is_complete(&self) -> bool {
        self.failed_roots.is_empty() && self.sink_error.is_none()
    }
}

/// The scan-and-hash pipeline
///
/// Owns the hash engine, the exclusion filter and the diagnostics
/// receiver; each call to [`Pipeline::run`] creates fresh queues and
/// threads.
pub struct Pipeline {
    workers: usize,
    queue_capacity: usize,
    options: WorkerOptions,
    engine: Arc<dyn HashEngine>,
    filter: PathFilter,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Pipeline {
    pub fn new(
        config: &ScanConfig,
        engine: Arc<dyn HashEngine>,
        filter: PathFilter,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            workers: config.workers,
            queue_capacity: config.effective_queue_capacity(),
            options: WorkerOptions {
                max_hash_size: config.max_hash_size,
                buffer_size: config.buffer_size,
            },
            engine,
            filter,
            diagnostics,
        })
    }

    /// Build engine and filter from the configuration itself
    ///
    /// An empty `exclude` disables exclusion.
    pub fn from_config(config: &ScanConfig, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        let filter = if config.exclude.is_empty() {
            PathFilter::none()
        } else {
            PathFilter::new(&config.exclude)?
        };
        Self::new(config, config.algorithm.engine(), filter, diagnostics)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Scan `roots` and hand every record to `writer`
    ///
    /// Roots are walked one after another. Only failures to start
    /// threads are returned as errors; per-root and per-file problems
    /// end up in the summary and the diagnostics.
    pub fn run(&self, roots: &[PathBuf], writer: Box<dyn RecordWriter>) -> Result<ScanSummary> {
        let start = Instant::now();
        let stats = Arc::new(ScanStats::default());

        let (task_tx, task_rx) = bounded::<FileTask>(self.queue_capacity);
        let (record_tx, record_rx) = bounded::<FileRecord>(self.queue_capacity);

        // Consumers first, so tasks are being pulled as soon as they exist
        let sink = OutputSink::spawn(
            record_rx,
            writer,
            Arc::clone(&self.diagnostics),
            Arc::clone(&stats),
        )?;
        let pool = WorkerPool::spawn(
            self.workers,
            task_rx,
            record_tx.clone(),
            Arc::clone(&self.engine),
            self.options,
            Arc::clone(&self.diagnostics),
            Arc::clone(&stats),
        )?;

        log::info!(
            "Scanning {} root(s) with {} workers, queue capacity {}",
            roots.len(),
            pool.len(),
            self.queue_capacity
        );

        let failed_roots = walk_roots(roots, &self.filter, self.diagnostics.as_ref(), |task| {
            // Blocks while the queue is full
            if task_tx.send(task).is_ok() {
                ScanStats::incr(&stats.tasks_queued);
                true
            } else {
                false
            }
        });

        // Stop intake
        drop(task_tx);
        // Drain workers
        pool.join();
        // Drain sink
        drop(record_tx);
        let sink_report = sink.join();

        let summary = ScanSummary {
            stats: stats.snapshot(),
            failed_roots,
            sink_error: sink_report.error,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Scan finished in {:.2}s: {} records, {} dropped",
            summary.elapsed.as_secs_f64(),
            summary.stats.records_emitted,
            summary.stats.tasks_dropped
        );

        Ok(summary)
    }
}
