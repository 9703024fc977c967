//! # modelgen core
//!
//! Schema document model, type mapping resolution and generator configuration shared by the
//! `modelgen` loader, generators and command line.
//!
//! ## Design Principles
//!
//! - **Immutable after load**: a merged [`Document`] is only ever borrowed by generators
//! - **First match wins**: type mapping scans rules in declaration order
//! - **Explicit keys**: a field can be marked primary, defaulting to the first field

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Core error types
pub mod error;

/// Schema document model
pub mod types;

/// Logical type resolution against mapping tables
pub mod type_mapping;

/// Generator and loader configuration
pub mod config;

pub use config::{GeneratorConfig, LoaderSettings, PersistenceFilter};
pub use error::{ModelGenError, Result};
pub use type_mapping::{MappingTable, TypeResolver};
pub use types::{
    AccessMethod, DbControl, Document, Entity, EntityKind, Field, FieldCategory, Import, Include,
    SchemaIssue, TypeMapping,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{GeneratorConfig, LoaderSettings, PersistenceFilter};
    pub use crate::error::{ModelGenError, Result};
    pub use crate::type_mapping::{MappingTable, TypeResolver};
    pub use crate::types::{
        AccessMethod, DbControl, Document, Entity, EntityKind, Field, FieldCategory, Import,
        Include, TypeMapping,
    };
}
