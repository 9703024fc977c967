//! Code generation service
//!
//! Ties the schema loader and the generator registry together: one call loads a schema tree,
//! runs the model generator of the configured language and, when persistence is requested,
//! its CRUD and table generators. All generators of a run share one [`GenerationSession`].

use modelgen_core::{Document, EntityKind, GeneratorConfig, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::generator::{
    Diagnostic, GenerationSession, GeneratorError, GeneratorRegistry, GeneratorResult, Severity,
    check_config,
};
use crate::parser::SchemaLoader;

/// Text produced by one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    /// Model code
    pub model: String,
    /// CRUD persistence code, when requested and supported
    pub persistence: Option<String>,
    /// Table creation or upgrade statements, when requested and supported
    pub ddl: Option<String>,
    /// Entity scoped diagnostics of the run
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Whether any error diagnostic was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Main code generation service
pub struct CodeGenerationService {
    loader: SchemaLoader,
    registry: GeneratorRegistry,
}

impl CodeGenerationService {
    /// Service over the local file system with every built-in language
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(SchemaLoader::new(), GeneratorRegistry::with_defaults())
    }

    /// Service from an explicit loader and registry
    #[must_use]
    pub fn with_parts(loader: SchemaLoader, registry: GeneratorRegistry) -> Self {
        Self { loader, registry }
    }

    /// Load a schema tree
    ///
    /// # Errors
    ///
    /// Returns an error if any document of the tree fails to load or parse
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Document> {
        self.loader.load(path).await
    }

    /// Load a schema tree and generate code for it
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the configuration is rejected
    pub async fn generate_file(
        &self,
        path: impl AsRef<Path>,
        config: &GeneratorConfig,
    ) -> Result<GenerationOutput> {
        check_config(config)?;
        let doc = self.load(path).await?;
        Ok(self.generate(&doc, config)?)
    }

    /// Generate code for an already merged document
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Configuration` for split-in-files mode or an unknown language,
    /// or any error a generator returns
    pub fn generate(
        &self,
        doc: &Document,
        config: &GeneratorConfig,
    ) -> GeneratorResult<GenerationOutput> {
        check_config(config)?;
        let generators = self.registry.get(&config.language)?;

        let mut session = GenerationSession::new();
        for issue in doc.validate() {
            session.warn(&issue.entity, issue.message);
        }

        info!(language = %config.language, generator = generators.model.name(), "generating model");
        let model = generators.model.generate(doc, config, &mut session)?;

        let mut persistence = None;
        let mut ddl = None;
        if config.generate_persistence {
            if !generators.supports_persistence() {
                return Err(GeneratorError::Configuration(format!(
                    "language '{}' has no persistence generators",
                    config.language
                )));
            }
            for name in config.persistence.unmatched(|name| {
                doc.entities
                    .iter()
                    .any(|entity| entity.kind == EntityKind::Class && entity.name == name)
            }) {
                session.warn(name, "persistence filter names no class of the schema");
            }
            if let Some(crud) = &generators.crud {
                info!(generator = crud.name(), "generating persistence");
                persistence = Some(crud.generate(doc, config, &mut session)?);
            }
            if let Some(db_create) = &generators.db_create {
                info!(generator = db_create.name(), upgrade = config.is_upgrade(), "generating table statements");
                ddl = Some(db_create.generate(doc, config, &mut session)?);
            }
        }

        if session.has_errors() {
            warn!("generation finished with errors");
        }

        Ok(GenerationOutput {
            model,
            persistence,
            ddl,
            diagnostics: session.into_diagnostics(),
        })
    }
}

impl Default for CodeGenerationService {
    fn default() -> Self {
        Self::new()
    }
}
