//! File system adapter for schema loading and artifact output
//!
//! The loader and the command line only touch files through [`FileSystemOperations`], so
//! include trees can be served from memory in tests.

use async_trait::async_trait;
use modelgen_core::{ModelGenError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::fs;

/// File system operations trait
#[async_trait]
pub trait FileSystemOperations: Send + Sync {
    /// Read a file to string
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string to file, creating parent directories
    async fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Check if path exists
    async fn exists(&self, path: &Path) -> Result<bool>;
}

/// Default file system adapter using `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystemAdapter;

impl TokioFileSystemAdapter {
    /// Create new adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemOperations for TokioFileSystemAdapter {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await.map_err(|e| {
            ModelGenError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                ModelGenError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create parent directory: {e}"),
                ))
            })?;
        }

        fs::write(path, contents).await.map_err(|e| {
            ModelGenError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", path.display(), e),
            ))
        })
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ModelGenError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to check existence: {e}"),
            ))),
        }
    }
}

/// In-memory file tree keyed by path
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl InMemoryFileSystem {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), contents.into());
        }
        self
    }

    /// Contents of a stored file
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.read().ok()?.get(path).cloned()
    }

    fn poisoned() -> ModelGenError {
        ModelGenError::other("in-memory file system lock poisoned")
    }
}

#[async_trait]
impl FileSystemOperations for InMemoryFileSystem {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files.get(path).cloned().ok_or_else(|| {
            ModelGenError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Failed to read {}: not found", path.display()),
            ))
        })
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        Ok(files.contains_key(path))
    }
}
