use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the connstats crates.
#[derive(Error, Debug)]
pub enum ConnstatsError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file name carries no resolvable `YYYY-MM-DD` date, so its
    /// records cannot be anchored into first/last-seen tracking.
    #[error("Could not determine logfile date from filename: {0}")]
    FileDate(PathBuf),

    /// The connection table could not be written out.
    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the connstats crates.
pub type Result<T> = std::result::Result<T, ConnstatsError>;
