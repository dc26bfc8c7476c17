//! Error types for the style compiler and manager.

use std::path::PathBuf;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or injecting styles.
///
/// Compilation and registration never surface these to callers: injection
/// failures are logged and swallowed by the manager. Only constructing a
/// style description from external JSON and writing extracted CSS return
/// them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A live target rejected a rule.
    #[error("Failed to inject style '{id}': {message}")]
    Injection { id: String, message: String },

    /// A stylesheet handle refused a single rule.
    #[error("Rule rejected: {message} (rule: '{rule}')")]
    RuleRejected { rule: String, message: String },

    /// A style description had an unusable shape.
    #[error("Invalid style description at '{key}': {message}")]
    InvalidStyle { key: String, message: String },

    /// Failed to write extracted CSS.
    #[error("Failed to write extracted CSS to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error.
    #[error("Invalid JSON style description: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an injection error.
    pub fn injection(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Injection {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a rejected-rule error.
    pub fn rule_rejected(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleRejected {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create a style shape error.
    pub fn invalid_style(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStyle {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
