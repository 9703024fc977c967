//! Command line front end

mod app;
mod types;

pub use app::ModelGenApp;
pub use types::{DEFAULT_OUTPUT_DB, InputFormat, ModelGenCli, ProjectConfig, Settings};

/// Main entry point for the CLI
///
/// # Errors
///
/// Returns error if loading, generation or writing output fails
pub async fn run() -> modelgen_core::Result<()> {
    ModelGenApp::from_args().run().await
}
