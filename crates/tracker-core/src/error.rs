use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the loot tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A section marker or line timestamp did not match the expected format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// The static item/creature database could not be parsed.
    #[error("Failed to parse database: {0}")]
    DatabaseParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
