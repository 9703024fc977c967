//! YAML parser for schema documents

use modelgen_core::{Document, ModelGenError, Result};

use super::SchemaParser;

/// `YAML` parser implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl YamlParser {
    /// Create a new `YAML` parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaParser for YamlParser {
    fn parse_str(&self, content: &str) -> Result<Document> {
        serde_yaml::from_str(content).map_err(|e| {
            ModelGenError::parse_at(
                format!("YAML parsing error: {e}"),
                e.location().map_or_else(
                    || "unknown location".to_string(),
                    |l| format!("line {}, column {}", l.line(), l.column()),
                ),
            )
        })
    }
}
