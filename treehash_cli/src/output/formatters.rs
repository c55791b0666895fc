use serde_json::json;
use std::io::{self, BufWriter, Write};
use treehash_core::{FileRecord, RecordWriter};

/// JSON Lines writer for machine-readable output
///
/// Skipped digests are written as `null`.
pub struct JsonLinesWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }
}

impl<W: Write + Send> RecordWriter for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        let value = json!({
            "digest": record.digest.as_hex(),
            "size": record.size,
            "path": record.path.to_string_lossy(),
        });
        serde_json::to_writer(&mut self.out, &value)?;
        self.out.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// CSV writer
///
/// The header is written even when there are no records. Skipped
/// digests are left empty.
pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(out),
            header_written: false,
        }
    }

    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.writer.write_record(["digest", "size", "path"])?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write + Send> RecordWriter for CsvWriter<W> {
    fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        self.ensure_header()?;
        let digest = record.digest.as_hex().unwrap_or_default();
        let size = record.size.to_string();
        let path = record.path.to_string_lossy();
        self.writer
            .write_record([digest, size.as_str(), path.as_ref()])?;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.ensure_header()?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use treehash_core::Digest;

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

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn records() -> Vec<FileRecord> {
        vec![
            FileRecord {
                digest: Digest::Hex("e2fc714c4727ee9395f324cd2e7f331f".into()),
                size: 4,
                path: PathBuf::from("/d/a.txt"),
            },
            FileRecord {
                digest: Digest::Skipped,
                size: 99,
                path: PathBuf::from("/d/with,comma"),
            },
        ]
    }

    #[test]
    fn test_json_lines() {
        let buf = SharedBuf::default();
        let mut writer = JsonLinesWriter::new(buf.clone());
        for r in records() {
            writer.write_record(&r).unwrap();
        }
        writer.finish().unwrap();

        let lines: Vec<serde_json::Value> = buf
            .text()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["digest"], "e2fc714c4727ee9395f324cd2e7f331f");
        assert_eq!(lines[0]["size"], 4);
        assert_eq!(lines[0]["path"], "/d/a.txt");
        assert!(lines[1]["digest"].is_null());
    }

    #[test]
    fn test_csv_quotes_and_header() {
        let buf = SharedBuf::default();
        let mut writer = CsvWriter::new(buf.clone());
        for r in records() {
            writer.write_record(&r).unwrap();
        }
        writer.finish().unwrap();

        assert_eq!(
            buf.text(),
            "digest,size,path\ne2fc714c4727ee9395f324cd2e7f331f,4,/d/a.txt\n,99,\"/d/with,comma\"\n"
        );
    }

    #[test]
    fn test_csv_header_without_records() {
        let buf = SharedBuf::default();
        let mut writer = CsvWriter::new(buf.clone());
        writer.finish().unwrap();
        assert_eq!(buf.text(), "digest,size,path\n");
    }
}
