//! `modelgen` command-line interface
//!
//! Generates model code, persistence code and table statements from schema documents.

use modelgen::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await?;
    Ok(())
}
