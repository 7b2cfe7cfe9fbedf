//! Error types for the transcript analysis domain

use thiserror::Error;

use crate::ports::AIError;

/// Errors that can occur while sanitizing raw model output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizeError {
    /// The text left after stripping artifacts is not a JSON value.
    #[error("model output is not valid JSON: {reason}")]
    InvalidJson {
        /// Parser message for the sanitized text.
        reason: String,
        /// The raw model output, before sanitization.
        raw: String,
    },
}

impl SanitizeError {
    /// Returns the raw model output that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            SanitizeError::InvalidJson { raw, .. } => raw,
        }
    }
}

/// Errors surfaced by the analysis service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required input was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The model output did not sanitize into valid JSON.
    #[error("{message}")]
    Parse {
        /// User-facing message.
        message: String,
        /// The raw model output, for diagnostics.
        raw: String,
    },

    /// The provider call itself failed.
    #[error(transparent)]
    Transport(#[from] AIError),
}

impl AnalysisError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a parse error carrying the offending raw text.
    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Returns the raw model output if this is a parse failure.
    pub fn raw_content(&self) -> Option<&str> {
        match self {
            AnalysisError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
