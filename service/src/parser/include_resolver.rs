//! Include resolution for schema documents
//!
//! Includes are resolved against the directory of the root document, loaded depth first and
//! merged into their parent in declaration order. Any include that cannot be read or parsed
//! aborts the whole load. Re-entering a file that is still being loaded is reported as a
//! cycle, and nesting is bounded by `max_depth`.

use modelgen_core::{Document, LoaderSettings, ModelGenError, Result};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

use super::{Parser, SchemaFormat};
use crate::file_system_adapter::FileSystemOperations;

type LoadFuture<'a> = Pin<Box<dyn Future<Output = Result<Document>> + Send + 'a>>;

/// Include resolver for loading and merging schema trees
pub struct IncludeResolver {
    fs: Arc<dyn FileSystemOperations>,
    parser: Parser,
    /// Maximum include nesting to prevent unbounded recursion
    max_depth: usize,
}

impl IncludeResolver {
    /// Create a resolver with default settings
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystemOperations>) -> Self {
        Self::with_settings(fs, &LoaderSettings::default())
    }

    /// Create a resolver from loader settings
    #[must_use]
    pub fn with_settings(fs: Arc<dyn FileSystemOperations>, settings: &LoaderSettings) -> Self {
        let default_format = settings
            .default_format
            .parse()
            .unwrap_or(SchemaFormat::Xml);
        Self {
            fs,
            parser: Parser::with_default_format(default_format),
            max_depth: settings.max_include_depth,
        }
    }

    /// Load `root` and every document it includes, merged into one
    ///
    /// # Errors
    ///
    /// Returns a `ModelGenError` if:
    /// - Any document cannot be read or parsed
    /// - An include cycle is detected
    /// - Maximum include depth is exceeded
    pub async fn resolve(&self, root: &Path) -> Result<Document> {
        let root_dir = root.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut loading = Vec::new();
        self.load_recursive(root.to_path_buf(), &root_dir, &mut loading, 0)
            .await
    }

    fn load_recursive<'a>(
        &'a self,
        path: PathBuf,
        root_dir: &'a Path,
        loading: &'a mut Vec<PathBuf>,
        depth: usize,
    ) -> LoadFuture<'a> {
        Box::pin(async move {
            if depth > self.max_depth {
                return Err(ModelGenError::import(
                    path.display().to_string(),
                    format!("Maximum include depth ({}) exceeded", self.max_depth),
                ));
            }

            let key = normalize(&path);
            if loading.contains(&key) {
                let chain = loading
                    .iter()
                    .chain(std::iter::once(&key))
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(ModelGenError::import(
                    path.display().to_string(),
                    format!("include cycle detected: {chain}"),
                ));
            }

            let content = self.fs.read_to_string(&path).await?;
            let mut doc = self.parser.parse_named(&content, &path)?;

            loading.push(key);
            let includes = doc.includes.clone();
            for include in includes {
                let child_path = root_dir.join(&include.filename);
                debug!(include = %include.filename, path = %child_path.display(), "including document");

                let child = self
                    .load_recursive(child_path, root_dir, loading, depth + 1)
                    .await
                    .map_err(|e| match e {
                        ModelGenError::ImportError { .. } => e,
                        other => ModelGenError::import(include.filename.clone(), other.to_string()),
                    })?;
                doc.merge_include(child);
            }
            loading.pop();

            Ok(doc)
        })
    }
}

/// Lexically normalise a path so `a/./b` and `a/c/../b` compare equal
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system_adapter::InMemoryFileSystem;
    use pretty_assertions::assert_eq;

    fn resolver(fs: InMemoryFileSystem) -> IncludeResolver {
        IncludeResolver::new(Arc::new(fs))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c.xml")), PathBuf::from("/a/c.xml"));
    }

    #[tokio::test]
    async fn test_includes_resolve_against_root_directory() -> modelgen_core::Result<()> {
        let fs = InMemoryFileSystem::new()
            .with_file(
                "/schemas/main.xml",
                r#"<doc namespace="main"><include>sub/a.xml</include><define name="Root"><field name="ID" type="guid"/></define></doc>"#,
            )
            .with_file(
                "/schemas/sub/a.xml",
                r#"<doc><include>b.xml</include><define name="A"><field name="ID" type="guid"/></define></doc>"#,
            )
            .with_file(
                "/schemas/b.xml",
                r#"<doc><define name="B"><field name="ID" type="guid"/></define></doc>"#,
            );

        let doc = resolver(fs).resolve(Path::new("/schemas/main.xml")).await?;
        let names: Vec<_> = doc.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "A", "B"]);
        assert_eq!(doc.namespace, "main");
        Ok(())
    }

    #[tokio::test]
    async fn test_self_include_is_a_cycle() {
        let fs = InMemoryFileSystem::new().with_file(
            "/s/loop.xml",
            r#"<doc><include>loop.xml</include></doc>"#,
        );
        let err = resolver(fs)
            .resolve(Path::new("/s/loop.xml"))
            .await
            .unwrap_err();
        match err {
            ModelGenError::ImportError { reason, .. } => assert!(reason.contains("cycle")),
            other => panic!("expected ImportError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let fs = InMemoryFileSystem::new()
            .with_file("/d/0.xml", "<doc><include>1.xml</include></doc>")
            .with_file("/d/1.xml", "<doc><include>2.xml</include></doc>")
            .with_file("/d/2.xml", "<doc/>");
        let settings = LoaderSettings {
            max_include_depth: 1,
            ..LoaderSettings::default()
        };
        let resolver = IncludeResolver::with_settings(Arc::new(fs), &settings);
        let err = resolver.resolve(Path::new("/d/0.xml")).await.unwrap_err();
        assert!(err.to_string().contains("Maximum include depth"));
    }

    #[tokio::test]
    async fn test_missing_include_is_fatal() {
        let fs = InMemoryFileSystem::new()
            .with_file("/m/main.xml", "<doc><include>gone.xml</include></doc>");
        let err = resolver(fs)
            .resolve(Path::new("/m/main.xml"))
            .await
            .unwrap_err();
        match err {
            ModelGenError::ImportError { import, .. } => assert_eq!(import, "gone.xml"),
            other => panic!("expected ImportError, got {other:?}"),
        }
    }
}
