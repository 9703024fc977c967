//! JSON parser for schema documents

use modelgen_core::{Document, ModelGenError, Result};

use super::SchemaParser;

/// `JSON` parser implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl JsonParser {
    /// Create a new `JSON` parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaParser for JsonParser {
    fn parse_str(&self, content: &str) -> Result<Document> {
        serde_json::from_str(content).map_err(|e| {
            ModelGenError::parse_at(
                format!("JSON parsing error: {e}"),
                format!("line {}, column {}", e.line(), e.column()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_with_mappings() -> std::result::Result<(), anyhow::Error> {
        let json = r#"{
            "namespace": "billing",
            "db_type_mappings": [{"from": "string", "to": "varchar(%d)", "fieldsize": 64}],
            "dbcontrol": {"user": "billing", "dbname": "accounts"}
        }"#;

        let doc = JsonParser::new().parse_str(json)?;
        assert_eq!(doc.namespace, "billing");
        assert_eq!(doc.db_type_mappings[0].field_size, Some(64));
        assert_eq!(doc.db_control.user, "billing");
        assert_eq!(doc.db_control.dbname, "accounts");
        Ok(())
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = JsonParser::new().parse_str(r#"{"namespace": oops"#);
        assert!(result.is_err());
        if let Err(ModelGenError::ParseError { message, .. }) = result {
            assert!(message.contains("JSON parsing error"));
        } else {
            panic!("Expected ParseError");
        }
    }
}
