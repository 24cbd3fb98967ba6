use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a [`LaunchDataset`](super::model::LaunchDataset).
///
/// Always fatal at startup; a partially loaded dataset is never returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': {message}")]
    InvalidField {
        row: usize,
        column: &'static str,
        message: String,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_field(row: usize, column: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            row,
            column,
            message: message.into(),
        }
    }
}

/// Typed failure of a single query. Recoverable: the caller renders an empty
/// state and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("dataset has no records")]
    EmptyDataset,

    #[error("no data for launch site '{0}'")]
    UnknownSite(String),

    #[error("invalid payload range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
}
