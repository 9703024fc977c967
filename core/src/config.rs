//! Generation and loader configuration
//!
//! Every value has a serde default so partial config files deserialize cleanly; command line
//! flags are layered on top by the binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelGenError, Result};

/// Table prefix used when none is configured
pub const DEFAULT_TABLE_PREFIX: &str = "nagini_se_";

/// Token selecting every persistable class
pub const ALL_CLASSES: &str = "-";

/// Options consumed by every generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Emit one file per entity (unsupported)
    pub split_in_files: bool,

    /// Prefix applied to every table name
    pub table_prefix: String,

    /// Emit JSON/XML converters on model classes
    pub converters: bool,

    /// Verbosity level
    pub verbose: u8,

    /// Which classes receive persistence code and tables
    pub persistence: PersistenceFilter,

    /// Run the persistence generators at all
    pub generate_persistence: bool,

    /// Emit `DROP TABLE IF EXISTS` before each `CREATE TABLE`
    pub generate_drop: bool,

    /// Upgrade threshold; zero selects fresh table creation
    pub from_version: u32,

    /// Emit getters and setters on model classes
    pub accessors: bool,

    /// Target language identifier
    pub language: String,

    /// Schema source name quoted in generated banners
    pub source_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            split_in_files: false,
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            converters: false,
            verbose: 0,
            persistence: PersistenceFilter::All,
            generate_persistence: false,
            generate_drop: false,
            from_version: 0,
            accessors: true,
            language: "go".to_string(),
            source_name: String::new(),
        }
    }
}

impl GeneratorConfig {
    /// Reject configurations that cannot be generated
    ///
    /// # Errors
    ///
    /// Returns a configuration error when per-file splitting is requested or no language is set.
    pub fn validate(&self) -> Result<()> {
        if self.split_in_files {
            return Err(ModelGenError::config(
                "splitting output into one file per entity is not supported",
            ));
        }

        if self.language.trim().is_empty() {
            return Err(ModelGenError::config("target language cannot be empty"));
        }

        Ok(())
    }

    /// Whether DDL should be emitted as incremental upgrade statements
    #[must_use]
    pub fn is_upgrade(&self) -> bool {
        self.from_version > 0
    }
}

/// Class selection for persistence generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PersistenceFilter {
    /// Every eligible class
    #[default]
    All,
    /// Only the named classes, matched case sensitively
    Classes(Vec<String>),
}

impl PersistenceFilter {
    /// Whether `name` passes the filter
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Classes(names) => names.iter().any(|candidate| candidate == name),
        }
    }

    /// Named classes for which `exists` is false
    #[must_use]
    pub fn unmatched(&self, exists: impl Fn(&str) -> bool) -> Vec<&str> {
        match self {
            Self::All => Vec::new(),
            Self::Classes(names) => names
                .iter()
                .map(String::as_str)
                .filter(|name| !exists(name))
                .collect(),
        }
    }
}

impl FromStr for PersistenceFilter {
    type Err = ModelGenError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed == ALL_CLASSES {
            return Ok(Self::All);
        }

        let names: Vec<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return Err(ModelGenError::config(
                "persistence filter needs a class name or '-'",
            ));
        }

        Ok(Self::Classes(names))
    }
}

impl TryFrom<String> for PersistenceFilter {
    type Error = ModelGenError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PersistenceFilter> for String {
    fn from(filter: PersistenceFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for PersistenceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CLASSES),
            Self::Classes(names) => f.write_str(&names.join(",")),
        }
    }
}

/// Schema loading options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderSettings {
    /// Maximum nesting of includes below the root document
    pub max_include_depth: usize,

    /// Format assumed for files without a recognised extension
    pub default_format: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            max_include_depth: 16,
            default_format: "xml".to_string(),
        }
    }
}
