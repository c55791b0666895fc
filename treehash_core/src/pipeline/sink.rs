//! Output sink
//!
//! The single consumer of the output queue and the only writer to the
//! destination stream. Records are written in the order they arrive.

use crossbeam_channel::Receiver;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::stats::ScanStats;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::record::FileRecord;

/// Destination for finished records
pub trait RecordWriter: Send {
    fn write_record(&mut self, record: &FileRecord) -> io::Result<()>;

    /// Called once after the last record
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes the canonical `digest:size:path` line per record
pub struct LineWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }
}

impl<W: Write + Send> RecordWriter for LineWriter<W> {
    fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        writeln!(self.out, "{record}")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Keeps records in memory, in arrival order
///
/// Clones share the same storage, so a clone can be handed to the
/// pipeline while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingWriter {
    records: Arc<Mutex<Vec<FileRecord>>>,
}

impl CollectingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl RecordWriter for CollectingWriter {
    fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        self.records
            .lock()
            .map_err(|_| io::Error::other("record store poisoned"))?
            .push(record.clone());
        Ok(())
    }
}

/// Outcome of draining the output queue
#[derive(Debug, Default)]
pub struct SinkReport {
    /// Records the writer accepted
    pub written: u64,
    /// First write failure; records after it were discarded
    pub error: Option<io::Error>,
}

/// Handle to the running sink thread
pub struct OutputSink {
    handle: JoinHandle<SinkReport>,
}

impl OutputSink {
    pub fn spawn(
        records: Receiver<FileRecord>,
        writer: Box<dyn RecordWriter>,
        diagnostics: Arc<dyn Diagnostics>,
        stats: Arc<ScanStats>,
    ) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("output-sink".to_string())
            .spawn(move || drain(records, writer, diagnostics.as_ref(), &stats))?;
        Ok(Self { handle })
    }

    /// Wait for the sink to drain a closed queue
    pub fn join(self) -> SinkReport {
        self.handle.join().unwrap_or_else(|_| {
            log::error!("output-sink panicked");
            SinkReport {
                written: 0,
                error: Some(io::Error::other("output sink panicked")),
            }
        })
    }
}

/// Drain until the queue is closed and empty
///
/// After a write failure the remaining records are still received and
/// discarded, so workers blocked on a full queue can finish.
fn drain(
    records: Receiver<FileRecord>,
    mut writer: Box<dyn RecordWriter>,
    diagnostics: &dyn Diagnostics,
    stats: &ScanStats,
) -> SinkReport {
    let mut report = SinkReport::default();

    for record in records.iter() {
        if report.error.is_some() {
            continue;
        }
        match writer.write_record(&record) {
            Ok(()) => {
                report.written += 1;
                ScanStats::incr(&stats.records_written);
            }
            Err(e) => {
                diagnostics.report(Diagnostic::SinkFailed {
                    message: e.to_string(),
                });
                report.error = Some(e);
            }
        }
    }

    if report.error.is_none()
        && let Err(e) = writer.finish()
    {
        diagnostics.report(Diagnostic::SinkFailed {
            message: e.to_string(),
        });
        report.error = Some(e);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;
    use crate::record::Digest;
    use crossbeam_channel::bounded;
    use std::path::PathBuf;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            digest: Digest::Hex(format!("{size:032x}")),
            size,
            path: PathBuf::from(name),
        }
    }

    /// Shared byte buffer so the test can read what the sink wrote
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl RecordWriter for FailingWriter {
        fn write_record(&mut self, _record: &FileRecord) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_line_writer_format() {
        let buf = SharedBuf::default();
        let mut writer = LineWriter::new(buf.clone());
        writer
            .write_record(&FileRecord {
                digest: Digest::Skipped,
                size: 7,
                path: PathBuf::from("/x/y"),
            })
            .unwrap();
        writer.write_record(&record("b", 2)).unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            text,
            format!("-:7:/x/y\n{:032x}:2:b\n", 2)
        );
    }

    #[test]
    fn test_sink_preserves_receive_order() {
        let (tx, rx) = bounded(4);
        let writer = CollectingWriter::new();
        let stats = Arc::new(ScanStats::default());
        let sink = OutputSink::spawn(
            rx,
            Box::new(writer.clone()),
            Arc::new(NullDiagnostics),
            Arc::clone(&stats),
        )
        .unwrap();

        for i in 1..=10 {
            tx.send(record(&format!("f{i}"), i)).unwrap();
        }
        drop(tx);

        let report = sink.join();
        assert_eq!(report.written, 10);
        assert!(report.error.is_none());

        let sizes: Vec<_> = writer.records().iter().map(|r| r.size).collect();
        assert_eq!(sizes, (1..=10).collect::<Vec<_>>());
        assert_eq!(stats.snapshot().records_written, 10);
    }

    #[test]
    fn test_sink_keeps_draining_after_write_error() {
        // Capacity 1 would deadlock the sender if the sink stopped reading
        let (tx, rx) = bounded(1);
        let sink = OutputSink::spawn(
            rx,
            Box::new(FailingWriter),
            Arc::new(NullDiagnostics),
            Arc::new(ScanStats::default()),
        )
        .unwrap();

        for i in 0..50 {
            tx.send(record("f", i)).unwrap();
        }
        drop(tx);

        let report = sink.join();
        assert_eq!(report.written, 0);
        assert_eq!(
            report.error.map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
    }
}
