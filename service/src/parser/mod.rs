//! Schema parsing module
//!
//! Schema documents arrive as XML (the native format), YAML or JSON. Each format has its own
//! [`SchemaParser`]; [`Parser`] picks one by file extension. Include resolution and merging
//! live in [`IncludeResolver`], driven by [`SchemaLoader`].

use modelgen_core::{Document, ModelGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod include_resolver;
pub mod json_parser;
pub mod schema_loader;
pub mod xml_parser;
pub mod yaml_parser;

pub use include_resolver::IncludeResolver;
pub use json_parser::JsonParser;
pub use schema_loader::SchemaLoader;
pub use xml_parser::XmlParser;
pub use yaml_parser::YamlParser;

/// Trait for schema parsers
pub trait SchemaParser: Send + Sync {
    /// Parse a schema document from string content
    ///
    /// # Errors
    ///
    /// Returns a `ModelGenError::ParseError` if the content is malformed
    fn parse_str(&self, content: &str) -> Result<Document>;
}

/// Encoding of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// XML document
    Xml,
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

impl SchemaFormat {
    /// Detect the format from a file extension, `None` when unrecognised
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else if extension.eq_ignore_ascii_case("yaml") || extension.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

impl FromStr for SchemaFormat {
    type Err = ModelGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ModelGenError::parse(format!(
                "Unsupported schema format: {other}"
            ))),
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Json => "json",
        })
    }
}

/// Main parser that delegates to format-specific parsers
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    xml: XmlParser,
    yaml: YamlParser,
    json: JsonParser,
    default_format: SchemaFormat,
}

impl Parser {
    /// Create a new parser treating unknown extensions as XML
    #[must_use]
    pub const fn new() -> Self {
        Self::with_default_format(SchemaFormat::Xml)
    }

    /// Create a parser with a different fallback format
    #[must_use]
    pub const fn with_default_format(default_format: SchemaFormat) -> Self {
        Self {
            xml: XmlParser::new(),
            yaml: YamlParser::new(),
            json: JsonParser::new(),
            default_format,
        }
    }

    /// Format used for `path`
    #[must_use]
    pub fn format_for(&self, path: &Path) -> SchemaFormat {
        SchemaFormat::from_extension(path).unwrap_or(self.default_format)
    }

    /// Parse content in the given format
    ///
    /// # Errors
    ///
    /// Returns a `ModelGenError::ParseError` if parsing fails
    pub fn parse_str(&self, content: &str, format: SchemaFormat) -> Result<Document> {
        match format {
            SchemaFormat::Xml => self.xml.parse_str(content),
            SchemaFormat::Yaml => self.yaml.parse_str(content),
            SchemaFormat::Json => self.json.parse_str(content),
        }
    }

    /// Parse content read from `path`, attaching the file name to parse errors
    ///
    /// # Errors
    ///
    /// Returns a `ModelGenError::ParseError` if parsing fails
    pub fn parse_named(&self, content: &str, path: &Path) -> Result<Document> {
        self.parse_str(content, self.format_for(path))
            .map_err(|e| match e {
                ModelGenError::ParseError { message, location } => ModelGenError::ParseError {
                    message: format!("{message} in file {}", path.display()),
                    location,
                },
                other => other,
            })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
