//! Go target: model structs, CRUD persistence layer and MySQL table creation

mod crud;
mod model;

pub use crud::GoCrudGenerator;
pub use model::GoModelGenerator;

/// Language identifier of the Go target
pub const LANGUAGE_ID: &str = "go";

/// Base name of the per-entity row fetch helper
pub const FETCH_HELPER: &str = "fetchFromQueryString";
