use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unrecognized table structure: no header matched a canonical field")]
    UnrecognizedStructure,

    #[error("No monthly history available for projection: {0}")]
    EmptyHistory(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
