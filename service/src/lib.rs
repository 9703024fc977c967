//! # modelgen
//!
//! Schema driven code generator. A root schema document (XML, YAML or JSON) and the documents
//! it includes are merged into one [`Document`](modelgen_core::Document), from which modelgen
//! produces:
//!
//! - **Model code**: structs or classes with accessors and enums for Go, TypeScript and C++
//! - **Persistence code**: create, retrieve, update and delete functions for MySQL (Go)
//! - **Table statements**: `CREATE TABLE` scripts or `ALTER TABLE` upgrades from a schema version
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelgen::prelude::*;
//!
//! # async fn example() -> modelgen_core::Result<()> {
//! let service = CodeGenerationService::new();
//! let config = GeneratorConfig {
//!     generate_persistence: true,
//!     ..GeneratorConfig::default()
//! };
//! let output = service.generate_file("shop.xml", &config).await?;
//! println!("{}", output.model);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)] // generators emit long linear templates

/// File system access used by the loader
pub mod file_system_adapter;

/// Schema parsing and include resolution
pub mod parser;

/// Code generators
pub mod generator;

/// Load-and-generate service
pub mod service;

/// Command line front end
pub mod cli;

pub use generator::{
    Diagnostic, GenerationSession, Generator, GeneratorError, GeneratorRegistry, GeneratorResult,
    GeneratorRole, Severity,
};
pub use parser::{Parser, SchemaFormat, SchemaLoader};
pub use service::{CodeGenerationService, GenerationOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use modelgen_core::prelude::*;

    pub use crate::file_system_adapter::{
        FileSystemOperations, InMemoryFileSystem, TokioFileSystemAdapter,
    };
    pub use crate::generator::{
        Diagnostic, GenerationSession, Generator, GeneratorRegistry, GeneratorRole, Severity,
    };
    pub use crate::parser::{Parser, SchemaFormat, SchemaLoader, SchemaParser};
    pub use crate::service::{CodeGenerationService, GenerationOutput};
}
