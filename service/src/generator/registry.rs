//! Generator registry keyed by target language

use indexmap::IndexMap;
use std::sync::Arc;

use super::cpp::{self, CppGenerator};
use super::golang::{self, GoCrudGenerator, GoModelGenerator};
use super::mysql::MySqlDdlGenerator;
use super::traits::{Generator, GeneratorError, GeneratorResult};
use super::typescript::{self, TypeScriptGenerator};

/// Generators available for one target language
#[derive(Clone)]
pub struct LanguageGenerators {
    /// Model generator
    pub model: Arc<dyn Generator>,
    /// CRUD persistence generator, if the language has one
    pub crud: Option<Arc<dyn Generator>>,
    /// Table creation generator, if the language has one
    pub db_create: Option<Arc<dyn Generator>>,
}

impl LanguageGenerators {
    /// Model-only language
    #[must_use]
    pub fn model_only(model: impl Generator + 'static) -> Self {
        Self {
            model: Arc::new(model),
            crud: None,
            db_create: None,
        }
    }

    /// Whether persistence code can be produced
    #[must_use]
    pub fn supports_persistence(&self) -> bool {
        self.crud.is_some() || self.db_create.is_some()
    }
}

impl std::fmt::Debug for LanguageGenerators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageGenerators")
            .field("model", &self.model.name())
            .field("crud", &self.crud.as_ref().map(|g| g.name().to_string()))
            .field("db_create", &self.db_create.as_ref().map(|g| g.name().to_string()))
            .finish()
    }
}

/// Registry mapping language identifiers to their generators
#[derive(Debug, Default, Clone)]
pub struct GeneratorRegistry {
    languages: IndexMap<String, LanguageGenerators>,
}

impl GeneratorRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in language
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            golang::LANGUAGE_ID,
            LanguageGenerators {
                model: Arc::new(GoModelGenerator::new()),
                crud: Some(Arc::new(GoCrudGenerator::new())),
                db_create: Some(Arc::new(MySqlDdlGenerator::new())),
            },
        );
        registry.register(
            typescript::LANGUAGE_ID,
            LanguageGenerators::model_only(TypeScriptGenerator::new()),
        );
        registry.register(cpp::LANGUAGE_ID, LanguageGenerators::model_only(CppGenerator::new()));
        registry
    }

    /// Register (or replace) the generators of a language
    pub fn register(&mut self, language: impl Into<String>, generators: LanguageGenerators) {
        self.languages.insert(language.into(), generators);
    }

    /// Generators of `language`
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Configuration` for an unknown language
    pub fn get(&self, language: &str) -> GeneratorResult<&LanguageGenerators> {
        self.languages.get(language).ok_or_else(|| {
            GeneratorError::Configuration(format!(
                "unknown language '{language}', available: {}",
                self.list().join(", ")
            ))
        })
    }

    /// Registered language identifiers in registration order
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::traits::GeneratorRole;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_languages() {
        let registry = GeneratorRegistry::with_defaults();
        assert_eq!(registry.list(), vec!["go", "ts", "cpp"]);

        let go = registry.get("go").unwrap();
        assert_eq!(go.model.role(), GeneratorRole::Model);
        assert_eq!(go.crud.as_ref().map(|g| g.role()), Some(GeneratorRole::Crud));
        assert_eq!(go.db_create.as_ref().map(|g| g.role()), Some(GeneratorRole::DbCreate));

        assert!(!registry.get("ts").unwrap().supports_persistence());
        assert!(registry.get("cpp").unwrap().crud.is_none());
    }

    #[test]
    fn test_unknown_language() {
        let registry = GeneratorRegistry::with_defaults();
        let err = registry.get("cobol").unwrap_err();
        assert!(matches!(err, GeneratorError::Configuration(_)));
        assert!(err.to_string().contains("cobol"));
    }
}
