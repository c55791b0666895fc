mod formatters;

pub use formatters::{CsvWriter, JsonLinesWriter};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use treehash_core::{LineWriter, RecordWriter};

/// Output format enumeration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `digest:size:path`, one per line
    #[default]
    Text,
    /// JSON Lines
    Json,
    /// CSV with a `digest,size,path` header
    Csv,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" | "jsonl" | "json-lines" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// Create the record writer for a format
pub fn create_writer(format: OutputFormat, out: Box<dyn Write + Send>) -> Box<dyn RecordWriter> {
    match format {
        OutputFormat::Text => Box::new(LineWriter::new(out)),
        OutputFormat::Json => Box::new(JsonLinesWriter::new(out)),
        OutputFormat::Csv => Box::new(CsvWriter::new(out)),
    }
}
