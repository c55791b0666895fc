//! The `scan` command

use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use treehash_core::{
    HashAlgorithm, LogDiagnostics, Pipeline, ScanConfig, ScanSummary, check_roots, split_roots,
};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult, ErrorContext};
use crate::output::{OutputFormat, create_writer};
use crate::size::{format_bytes, parse_size};

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Root directories, comma-separated or repeated
    #[arg(short = 'd', long = "dir", value_name = "DIRS", required = true)]
    pub dirs: Vec<String>,

    /// Exclude files whose full path matches this regular expression
    #[arg(short = 'e', long = "exclude", value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Do not exclude anything
    #[arg(long, conflicts_with = "exclude")]
    pub no_exclude: bool,

    /// Record files of at least SIZE bytes without hashing them [default SIZE: 50MiB]
    #[arg(
        long,
        value_name = "SIZE",
        num_args = 0..=1,
        default_missing_value = "50MiB",
        value_parser = parse_size
    )]
    pub max_hash_size: Option<u64>,

    /// Number of hashing workers
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Capacity of each bounded queue
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Hash algorithm
    #[arg(short = 'a', long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write records to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a summary to stderr when done
    #[arg(long)]
    pub stats: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum AlgorithmArg {
    Md5,
    Sha1,
    Sha256,
    Crc32,
    Blake3,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha1 => HashAlgorithm::Sha1,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            AlgorithmArg::Crc32 => HashAlgorithm::Crc32,
            AlgorithmArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

impl ScanArgs {
    /// All roots, in the order given
    pub fn roots(&self) -> Vec<PathBuf> {
        self.dirs.iter().flat_map(|d| split_roots(d)).collect()
    }

    /// Apply command line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        let scan = &mut config.scan;
        if let Some(workers) = self.workers {
            scan.workers = workers;
        }
        if self.queue_capacity.is_some() {
            scan.queue_capacity = self.queue_capacity;
        }
        if self.max_hash_size.is_some() {
            scan.max_hash_size = self.max_hash_size;
        }
        if let Some(algorithm) = self.algorithm {
            scan.algorithm = algorithm.into();
        }
        if let Some(exclude) = &self.exclude {
            scan.exclude = exclude.clone();
        }
        if self.no_exclude {
            scan.exclude.clear();
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.stats {
            config.output.stats = true;
        }
    }
}

/// Run a scan and write every record to stdout or `--output`
pub fn run_scan(args: &ScanArgs, mut config: AppConfig) -> CliResult<()> {
    args.apply_to(&mut config);

    let roots = args.roots();
    check_roots(&roots)?;

    let pipeline = Pipeline::from_config(&config.scan, Arc::new(LogDiagnostics))?;
    log_plan(&config.scan, &roots);

    let out: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .map_err(|e| CliError::from_io_error(e, &path.display().to_string()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let writer = create_writer(config.output.format, out);

    let summary = pipeline.run(&roots, writer)?;

    if config.output.stats {
        eprint!("{}", render_summary(&summary));
    }

    if let Some(error) = summary.sink_error {
        let target = args
            .output
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
        return Err(
            CliError::general(&format!("Failed to write records to {target}"))
                .with_context("records written", &summary.stats.records_written.to_string())
                .with_source(Box::new(error)),
        );
    }

    if !summary.failed_roots.is_empty() {
        return Err(CliError::failed_roots(summary.failed_roots));
    }

    Ok(())
}

fn log_plan(config: &ScanConfig, roots: &[PathBuf]) {
    log::debug!("Roots: {roots:?}");
    log::debug!("Algorithm: {}", config.algorithm);
    log::debug!("Exclude: {:?}", config.exclude);
    match config.max_hash_size {
        Some(limit) => log::debug!("Size-only at or above {}", format_bytes(limit)),
        None => log::debug!("Hashing files of any size"),
    }
}

/// Human-readable summary printed by `--stats`
pub fn render_summary(summary: &ScanSummary) -> String {
    let stats = &summary.stats;
    let mut out = String::new();
    out.push_str(&format!(
        "Scanned {} files in {:.2}s\n",
        stats.tasks_queued,
        summary.elapsed.as_secs_f64()
    ));
    out.push_str(&format!(
        "  records:   {} ({} size-only)\n",
        stats.records_written, stats.size_only
    ));
    out.push_str(&format!("  dropped:   {}\n", stats.tasks_dropped));
    out.push_str(&format!("  hashed:    {}\n", format_bytes(stats.bytes_hashed)));
    if !summary.failed_roots.is_empty() {
        out.push_str(&format!(
            "  failed roots: {}\n",
            summary.failed_roots.len()
        ));
    }
    out
}
