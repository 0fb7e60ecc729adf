use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to read directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to render plot: {0}")]
    Plot(String),

    #[error("Unsupported export format '{0}' (expected 'csv' or 'xlsx')")]
    UnsupportedFormat(String),

    #[error("Score for '{compound}' is not a finite number")]
    NonFiniteScore { compound: String },

    #[error("The results table is empty")]
    EmptyTable,
}
