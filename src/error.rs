//! Error types for manifest-resolver
//!
//! Defines one error enum covering every way a resolution attempt can fail.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Error type for resolver operations
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Malformed manifest syntax
    #[error("Parse error at line {line}: {reason} (`{text}`)")]
    Parse {
        line: usize,
        text: String,
        reason: String,
    },

    /// A dependency coordinate violates a field rule
    #[error("Invalid coordinate {coordinate} at line {line}: {reason}")]
    InvalidCoordinate {
        coordinate: String,
        line: usize,
        reason: String,
    },

    /// The same artifact declared with two different versions
    #[error(
        "Conflicting versions for {key}: {first_version} (line {first_line}) vs {second_version} (line {second_line})"
    )]
    Conflict {
        key: String,
        first_version: String,
        first_line: usize,
        second_version: String,
        second_line: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ResolverError {
    /// Build a parse error for a source line
    pub fn parse(line: usize, text: impl AsRef<str>, reason: impl Into<String>) -> Self {
        ResolverError::Parse {
            line,
            text: text.as_ref().trim().to_string(),
            reason: reason.into(),
        }
    }

    /// The 1-based manifest line this error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ResolverError::Parse { line, .. } => Some(*line),
            ResolverError::InvalidCoordinate { line, .. } => Some(*line),
            ResolverError::Conflict { second_line, .. } => Some(*second_line),
            _ => None,
        }
    }
}
