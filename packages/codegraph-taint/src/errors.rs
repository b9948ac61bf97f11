//! Error types for codegraph-taint
//!
//! Propagation itself never fails; these cover summary (de)serialization
//! and access-path parsing.

use thiserror::Error;

/// Main error type for codegraph-taint operations
#[derive(Debug, Error)]
pub enum TaintError {
    /// A JSON summary is structurally valid JSON but not a valid frame/taint
    #[error("Invalid JSON for field '{field}': {message}")]
    InvalidJson { field: String, message: String },

    /// An access path string could not be parsed
    #[error("Invalid access path '{0}'")]
    InvalidAccessPath(String),

    /// Underlying serde_json failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaintError {
    /// Create an invalid-JSON error for a field
    pub fn invalid_json(field: impl Into<String>, message: impl Into<String>) -> Self {
        TaintError::InvalidJson {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid access path error
    pub fn invalid_access_path(path: impl Into<String>) -> Self {
        TaintError::InvalidAccessPath(path.into())
    }
}

/// Result type alias for taint domain operations
pub type Result<T> = std::result::Result<T, TaintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_display() {
        let err = TaintError::invalid_json("kind", "expected a string");
        assert_eq!(
            err.to_string(),
            "Invalid JSON for field 'kind': expected a string"
        );
    }

    #[test]
    fn test_invalid_access_path_display() {
        let err = TaintError::invalid_access_path("Argument(x)");
        assert!(err.to_string().contains("Argument(x)"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json")
            .err()
            .unwrap();
        let err: TaintError = json_err.into();
        assert!(matches!(err, TaintError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(TaintError::invalid_access_path(""))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(TaintError::InvalidAccessPath(_))));
    }
}
