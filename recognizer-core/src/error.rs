//! Core error types.
//!
//! The evaluator itself never produces these: failures of a caller-supplied
//! transition are returned unchanged. `CoreError` covers the table-driven
//! [`Dfa`](crate::Dfa) only.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or evaluating a table-driven DFA.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid DFA definition: {reason}")]
    InvalidDefinition { reason: String },

    #[error("invalid transition: no move from state '{state}' on symbol '{symbol}'")]
    InvalidTransition { state: String, symbol: String },

    #[error("unknown state id: {id}")]
    UnknownState { id: u32 },

    #[error("failed to read DFA definition {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Returns a stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::InvalidDefinition { .. } => "BAD_DEFINITION",
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CoreError::UnknownState { .. } => "UNKNOWN_STATE",
            CoreError::Io { .. } => "IO_ERROR",
            CoreError::Json(_) => "BAD_DEFINITION",
            CoreError::Yaml(_) => "BAD_DEFINITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CoreError::InvalidDefinition {
            reason: "no states".to_string(),
        };
        assert_eq!(err.error_code(), "BAD_DEFINITION");
        assert_eq!(err.to_string(), "invalid DFA definition: no states");

        let err = CoreError::InvalidTransition {
            state: "odd".to_string(),
            symbol: "x".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "invalid transition: no move from state 'odd' on symbol 'x'"
        );
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = CoreError::Io {
            path: PathBuf::from("/nonexistent/dfa.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("/nonexistent/dfa.json"));
    }
}
