//! Error types for schema loading and processing

use thiserror::Error;

/// Main error type for schema operations
#[derive(Error, Debug)]
pub enum ModelGenError {
    /// Schema parsing errors
    #[error("Failed to parse schema: {message}")]
    ParseError {
        /// Error message
        message: String,
        /// Location in schema if available
        location: Option<String>,
    },

    /// Include resolution errors
    #[error("Failed to resolve include '{import}': {reason}")]
    ImportError {
        /// Include that failed
        import: String,
        /// Reason for failure
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for schema operations
pub type Result<T> = std::result::Result<T, ModelGenError>;

impl ModelGenError {
    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a new include error
    #[must_use]
    pub fn import(import: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImportError {
            import: import.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a generic error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ModelGenError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ModelGenError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ModelGenError::parse("Unexpected end of document");
        assert!(matches!(err, ModelGenError::ParseError { .. }));

        let err = ModelGenError::parse_at("Invalid attribute", "line 10");
        match err {
            ModelGenError::ParseError { location, .. } => {
                assert_eq!(location.as_deref(), Some("line 10"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ModelGenError::import("common.xml", "File not found");
        let display = err.to_string();
        assert!(display.contains("common.xml"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ModelGenError = json_err.into();
        assert!(matches!(err, ModelGenError::SerializationError(_)));

        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let err: ModelGenError = yaml_err.into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
