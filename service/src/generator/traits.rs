//! Core generator traits and types
//!
//! Every generator turns a merged [`Document`] plus a [`GeneratorConfig`] into one text blob.
//! Generators never perform I/O; run-scoped state lives on the [`GenerationSession`].

use modelgen_core::{Document, GeneratorConfig, ModelGenError};
use std::fmt;
use thiserror::Error;

use super::session::GenerationSession;

/// Result type for generator operations
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during code generation
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting into the output buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] fmt::Error),

    /// Schema model error
    #[error("Schema error: {0}")]
    ModelGen(#[from] ModelGenError),
}

impl From<GeneratorError> for ModelGenError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::ModelGen(inner) => inner,
            GeneratorError::Configuration(message) => ModelGenError::ConfigError(message),
            GeneratorError::Io(io) => ModelGenError::IoError(io),
            other => ModelGenError::other(other.to_string()),
        }
    }
}

/// What a generator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorRole {
    /// Domain model types and accessors
    Model,
    /// CRUD persistence code
    Crud,
    /// Table creation or upgrade statements
    DbCreate,
}

impl fmt::Display for GeneratorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Model => "model",
            Self::Crud => "crud",
            Self::DbCreate => "db-create",
        })
    }
}

/// Core trait for code generators
pub trait Generator: Send + Sync {
    /// Get generator name
    fn name(&self) -> &str;

    /// What the generator produces
    fn role(&self) -> GeneratorRole;

    /// Generate text for the whole document
    ///
    /// Entity level problems are recorded on `session` and do not stop other entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be honoured or output formatting fails
    fn generate(
        &self,
        doc: &Document,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<String>;
}

/// Fail fast on configurations no generator supports
///
/// # Errors
///
/// Returns `GeneratorError::Configuration` for split-in-files mode and other invalid settings
pub fn check_config(config: &GeneratorConfig) -> GeneratorResult<()> {
    config.validate().map_err(|e| match e {
        ModelGenError::ConfigError(message) => GeneratorError::Configuration(message),
        other => GeneratorError::ModelGen(other),
    })
}
