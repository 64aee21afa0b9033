use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the incident dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The incident file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (bad quoting, bad UTF-8, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column the pipeline depends on is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// An `occur_date` value did not match any accepted date format.
    #[error("Invalid date {value:?} on row {row}")]
    DateParse { row: usize, value: String },

    /// An `occur_time` value was not a strict `HH:MM:SS` time.
    #[error("Invalid time {value:?} on row {row}")]
    TimeParse { row: usize, value: String },

    /// A snapshot could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
