// src/utils/error.rs
use thiserror::Error;

// Errors raised while opening a document and building its node tree
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid file format: '{0}'. Please provide a .docx file")]
    InvalidFileType(String), // Rejected by suffix, nothing was read

    #[error("Failed to open document '{path}': {reason}. Please ensure the document is not corrupted and try saving it again in Microsoft Word or LibreOffice.")]
    Load { path: String, reason: String },
}

impl DocumentError {
    pub fn load(path: impl Into<String>, reason: impl ToString) -> Self {
        DocumentError::Load { path: path.into(), reason: reason.to_string() }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No valid tables found in the document. The file opened but contains no table with a header row and at least one data row")]
    NoTables,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("Between 1 and {max} colors are allowed, got {got}")]
    ColorCount { got: usize, max: usize },

    #[error("Unknown palette {0}")]
    UnknownPalette(usize),

    #[error("Unknown chart type '{0}'")]
    UnknownChartType(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Invalid chart options: {0}")]
    Chart(#[from] ChartError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
