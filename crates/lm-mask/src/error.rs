//! Error types for the masking engine.

use thiserror::Error;

/// Result type for masking operations.
pub type Result<T> = std::result::Result<T, MaskError>;

/// Errors that can occur while configuring or running the masking engine.
///
/// None of these ever escape [`MaskingEngine::process`](crate::MaskingEngine::process);
/// they are only visible through the fallible construction and inspection APIs.
#[derive(Error, Debug)]
pub enum MaskError {
    /// The configuration document is structurally invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The label automaton could not be compiled.
    #[error("matcher error: {0}")]
    Matcher(String),

    /// I/O error while reading or writing a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A scan produced an offset that does not address the line.
    /// The line content is deliberately not included.
    #[error("internal error at byte offset {offset}")]
    Internal { offset: usize },
}

impl MaskError {
    /// Create an internal error for the given byte offset.
    pub fn internal(offset: usize) -> Self {
        MaskError::Internal { offset }
    }
}

impl From<aho_corasick::BuildError> for MaskError {
    fn from(err: aho_corasick::BuildError) -> Self {
        MaskError::Matcher(err.to_string())
    }
}
