//! Code generation
//!
//! Generators are synchronous and perform no I/O: each turns a merged
//! [`Document`](modelgen_core::Document) into one text blob. Target languages are looked up in
//! the [`GeneratorRegistry`].

pub mod base;
pub mod cpp;
pub mod golang;
pub mod mysql;
pub mod persistence;
pub mod registry;
pub mod session;
pub mod traits;
pub mod typescript;

pub use cpp::CppGenerator;
pub use golang::{GoCrudGenerator, GoModelGenerator};
pub use mysql::MySqlDdlGenerator;
pub use registry::{GeneratorRegistry, LanguageGenerators};
pub use session::{Diagnostic, GenerationSession, Severity};
pub use traits::{Generator, GeneratorError, GeneratorResult, GeneratorRole, check_config};
pub use typescript::TypeScriptGenerator;
