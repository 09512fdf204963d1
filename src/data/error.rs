use std::path::PathBuf;
use thiserror::Error;

/// Errors crossing the data-access boundary.
///
/// A missing source file is NOT an error: the loaders return `Ok(None)` for
/// that case so the shell can show a "no data" state. These variants cover
/// genuinely malformed input.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing '{column}' column in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("invalid timestamp '{value}' at row {row} of {path}")]
    InvalidTimestamp {
        value: String,
        row: usize,
        path: PathBuf,
    },

    #[error("unrecognised missing-report header in {path}: {headers:?}")]
    UnknownReportSchema {
        path: PathBuf,
        headers: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
