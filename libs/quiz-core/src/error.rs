//! Error types for quiz-core.

use thiserror::Error;

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while parsing an uploaded question file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing questions array")]
    MissingQuestionsArray,

    #[error("missing question text at row {row}")]
    MissingQuestionText { row: usize },

    #[error("unterminated quoted field at row {row}")]
    UnterminatedQuote { row: usize },

    #[error("invalid mapping at row {row}: {value}")]
    InvalidMapping { row: usize, value: String },

    #[error("empty file")]
    EmptyFile,
}
