use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate firewall session-teardown logs into per-connection statistics
#[derive(Parser, Debug, Clone)]
#[command(
    name = "connstats",
    about = "Aggregate firewall session-teardown logs into per-connection statistics",
    version
)]
pub struct Settings {
    /// Input directory, where source log files to be processed are stored
    pub input_directory: PathBuf,

    /// Output directory, where the generated connection table will be stored
    pub output_directory: PathBuf,

    /// Text encoding of the input files
    #[arg(short, long, default_value = "latin-1", value_parser = ["latin-1", "utf-8"])]
    pub encoding: String,

    /// Number of files to process in parallel (1-10)
    #[arg(short, long, default_value = "2", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=10))]
    pub workers: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
