//! Error types for the taxi dashboard.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur while loading or preparing the dataset.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported file format.
    #[error("Unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    /// A column the charts depend on is absent.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn { column: String },

    /// A row could not be interpreted.
    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// The file parsed but holds no trips.
    #[error("Dataset contains no rows")]
    EmptyDataset,

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl DashboardError {
    /// Create a FileOpen error.
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a MissingColumn error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create an InvalidRow error.
    pub fn invalid_row(row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            row,
            reason: reason.into(),
        }
    }
}
