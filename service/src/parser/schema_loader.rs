//! Schema loader for loading merged schema documents from files

use modelgen_core::{Document, LoaderSettings, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::IncludeResolver;
use crate::file_system_adapter::{FileSystemOperations, TokioFileSystemAdapter};

/// Loader for schema documents and their includes
pub struct SchemaLoader {
    resolver: IncludeResolver,
}

impl SchemaLoader {
    /// Create a loader reading from the local file system
    #[must_use]
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(TokioFileSystemAdapter::new()))
    }

    /// Create a loader over a custom file system
    #[must_use]
    pub fn with_file_system(fs: Arc<dyn FileSystemOperations>) -> Self {
        Self::with_settings(fs, &LoaderSettings::default())
    }

    /// Create a loader with custom settings
    #[must_use]
    pub fn with_settings(fs: Arc<dyn FileSystemOperations>, settings: &LoaderSettings) -> Self {
        Self {
            resolver: IncludeResolver::with_settings(fs, settings),
        }
    }

    /// Load a schema file and merge all of its includes
    ///
    /// # Errors
    ///
    /// Returns an error if the root document or any include fails to load or parse. No partial
    /// document is returned.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading schema");

        let doc = self.resolver.resolve(path).await?;

        debug!(
            entities = doc.entities.len(),
            db_mappings = doc.db_type_mappings.len(),
            lang_mappings = doc.lang_type_mappings.len(),
            "schema loaded"
        );
        debug!("{}", doc.summary());

        Ok(doc)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}
