//! Error types for MusicXML to MSR translation
//!
//! Only structural failures are errors here: an internal error means the
//! score model would be corrupted by continuing, so translation aborts.
//! Questionable input is reported through `Diagnostics` instead.

use thiserror::Error;

/// Top-level translation error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Fatal XML parsing error
    #[error("XML parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// Structural invariant violated (unregistered part, unknown part group
    /// on close, staff collision, ...)
    #[error("{source_name}:{line}: internal error: {message}")]
    Internal {
        source_name: String,
        line: usize,
        message: String,
    },
}

impl TranslationError {
    pub fn internal(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        TranslationError::Internal {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Input line the error refers to, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            TranslationError::Internal { line, .. } => Some(*line),
            TranslationError::Parse(_) => None,
        }
    }
}

/// Fatal XML parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// XML is malformed (not well-formed)
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// MusicXML format not supported (e.g., timewise instead of partwise)
    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),
}

/// Failure loading `TranslationSettings`
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}
