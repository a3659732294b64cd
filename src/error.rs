//! Error kinds raised by pipeline stages

use thiserror::Error;

/// Failure of a single pipeline stage.
///
/// Callers at the request boundary collapse every variant into one generic
/// failure; the variants exist for logging and tests.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to fetch {container}/{object}: {message}")]
    Fetch {
        container: String,
        object: String,
        message: String,
    },

    #[error("object {0} is not valid UTF-8")]
    Decode(String),

    #[error("table {0} has no columns")]
    EmptyTable(String),

    #[error("row {line} has {found} cells but the header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("duplicate pivot entry for index {index} and column {column}")]
    DuplicatePivotEntry { index: String, column: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize table: {0}")]
    Serialize(#[from] csv::Error),

    #[error("failed to store {container}/{object}: {message}")]
    Store {
        container: String,
        object: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
