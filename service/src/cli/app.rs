//! `modelgen` CLI application

use clap::Parser;
use modelgen_core::{ModelGenError, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use super::types::{ModelGenCli, ProjectConfig, Settings};
use crate::file_system_adapter::{FileSystemOperations, TokioFileSystemAdapter};
use crate::generator::GeneratorRegistry;
use crate::parser::SchemaLoader;
use crate::service::{CodeGenerationService, GenerationOutput};

/// Main `modelgen` CLI application
pub struct ModelGenApp {
    cli: ModelGenCli,
}

impl ModelGenApp {
    /// Create the application from process arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self::new(ModelGenCli::parse())
    }

    /// Create the application from parsed arguments
    #[must_use]
    pub fn new(cli: ModelGenCli) -> Self {
        Self { cli }
    }

    /// Run the application
    ///
    /// # Errors
    ///
    /// Returns an error if loading, generation or writing output fails
    pub async fn run(self) -> Result<()> {
        self.init_logging();
        info!("Starting modelgen");

        match self.execute().await {
            Ok(output) => {
                info!(diagnostics = output.diagnostics.len(), "Generation completed");
                Ok(())
            }
            Err(err) => {
                error!("Generation failed: {}", err);
                Err(err)
            }
        }
    }

    /// Configure the tracing subscriber from the verbosity flags
    ///
    /// `RUST_LOG` overrides the level derived from the flags.
    fn init_logging(&self) {
        let level = if self.cli.quiet {
            "error"
        } else {
            match self.cli.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        // a subscriber may already be installed when embedded
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Resolve settings from the optional config file and the flags
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn settings(&self) -> Result<Settings> {
        let project = match &self.cli.config {
            Some(path) => {
                info!(path = %path.display(), "reading project config");
                let content = tokio::fs::read_to_string(path).await?;
                ProjectConfig::parse(&content, path)?
            }
            None => ProjectConfig::default(),
        };
        Ok(self.cli.settings(project))
    }

    /// Load, generate and write every requested output
    ///
    /// # Errors
    ///
    /// Returns an error if loading, generation or writing fails, or if table statements were
    /// requested while error diagnostics exist
    pub async fn execute(&self) -> Result<GenerationOutput> {
        let settings = self.settings().await?;
        let fs: Arc<dyn FileSystemOperations> = Arc::new(TokioFileSystemAdapter::new());
        if !fs.exists(&self.cli.input).await? {
            return Err(ModelGenError::config(format!(
                "input schema {} does not exist",
                self.cli.input.display()
            )));
        }

        let loader = SchemaLoader::with_settings(Arc::clone(&fs), &settings.loader);
        let service = CodeGenerationService::with_parts(loader, GeneratorRegistry::with_defaults());

        let output = service
            .generate_file(&self.cli.input, &settings.generator)
            .await?;

        for diagnostic in &output.diagnostics {
            if !self.cli.quiet {
                eprintln!("{diagnostic}");
            }
        }

        write_output(fs.as_ref(), settings.output.as_deref(), &output.model).await?;

        if let Some(persistence) = &output.persistence {
            write_output(fs.as_ref(), Some(&settings.output_db), persistence).await?;
        }

        if let Some(ddl) = &output.ddl {
            if output.has_errors() {
                warn!("table statements withheld because of errors");
                return Err(ModelGenError::other(
                    "table statements not written: generation reported errors",
                ));
            }
            write_output(fs.as_ref(), settings.output_ddl.as_deref(), ddl).await?;
        }

        Ok(output)
    }
}

/// Write `content` to `path`, or to stdout when `path` is `None`
async fn write_output(
    fs: &dyn FileSystemOperations,
    path: Option<&Path>,
    content: &str,
) -> Result<()> {
    match path {
        Some(path) => {
            fs.write(path, content).await?;
            info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
