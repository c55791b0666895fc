//! treehash command line library
//!
//! Everything the `treehash` binary does lives here so that the
//! integration tests can drive it without spawning processes.

pub mod config;
pub mod error;
pub mod output;
pub mod scan;
pub mod size;

pub use config::{AppConfig, ConfigManager, OutputConfig};
pub use error::{CliError, CliResult, ExitCode};
pub use output::OutputFormat;
pub use scan::{ScanArgs, run_scan};
