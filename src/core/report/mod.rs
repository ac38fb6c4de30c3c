//! Turning an uploaded report file into keyword rows

mod columns;
mod csv_reader;
mod excel_reader;
mod format;

pub use columns::ColumnContract;
pub use format::ReportFormat;

use crate::core::models::cell::CellValue;
use thiserror::Error;

/// Header row plus inferred cells, before any column is interpreted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Failures of the upload and report layer. Unlike bid errors these abort
/// the whole upload and are reported back to the caller.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No file part")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("Invalid file type")]
    UnsupportedFormat(String),
    #[error("Invalid target ACOS: {0:?}")]
    InvalidTargetAcos(String),
    #[error("Upload exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Malformed upload: {0}")]
    Multipart(String),
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Unable to read report: {0}")]
    Unreadable(String),
}
