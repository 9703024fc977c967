//! Logical type resolution
//!
//! Three mapping tables live on a [`Document`]: the database table, the primary language table
//! and the generic language tagged table. A [`TypeResolver`] borrows one of them and turns a
//! field's logical type into a destination type name. The first matching rule wins; unmatched
//! types pass through unchanged.

use tracing::trace;

use crate::types::{Document, Field, TypeMapping};

/// Size placeholder inside a mapping destination
pub const SIZE_PLACEHOLDER: &str = "%d";

/// Which table of a document to resolve against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingTable {
    /// Database column types; a field's `db_size` takes precedence over `field_size`
    Database,
    /// Primary language types
    Language,
    /// Language tagged generic table
    Generic,
}

/// Resolves field types against one mapping table
#[derive(Debug, Clone)]
pub struct TypeResolver<'a> {
    mappings: &'a [TypeMapping],
    table: MappingTable,
    lang: Option<&'a str>,
}

impl<'a> TypeResolver<'a> {
    /// Resolver over an arbitrary rule list
    #[must_use]
    pub fn new(mappings: &'a [TypeMapping], table: MappingTable) -> Self {
        Self {
            mappings,
            table,
            lang: None,
        }
    }

    /// Resolver over the database table of `doc`
    #[must_use]
    pub fn database(doc: &'a Document) -> Self {
        Self::new(&doc.db_type_mappings, MappingTable::Database)
    }

    /// Resolver over the primary language table of `doc`
    #[must_use]
    pub fn language(doc: &'a Document) -> Self {
        Self::new(&doc.lang_type_mappings, MappingTable::Language)
    }

    /// Resolver over the generic table of `doc`, restricted to rules tagged `lang`
    #[must_use]
    pub fn for_language(doc: &'a Document, lang: &'a str) -> Self {
        Self {
            mappings: &doc.any_type_mappings,
            table: MappingTable::Generic,
            lang: Some(lang),
        }
    }

    /// Destination type for `field`
    #[must_use]
    pub fn resolve(&self, field: &Field) -> String {
        let Some(mapping) = self.find(&field.field_type) else {
            trace!(field = %field.name, ty = %field.field_type, "no type mapping, passing through");
            return field.field_type.clone();
        };

        let Some(rule_size) = mapping.field_size.filter(|size| *size > 0) else {
            return mapping.to.clone();
        };

        let size = self.declared_size(field).unwrap_or(rule_size);
        mapping.to.replacen(SIZE_PLACEHOLDER, &size.to_string(), 1)
    }

    /// Destination type for a bare logical type name with no field attributes
    #[must_use]
    pub fn resolve_type(&self, logical: &str) -> String {
        self.resolve(&Field::new("", logical))
    }

    fn find(&self, logical: &str) -> Option<&'a TypeMapping> {
        self.mappings.iter().find(|mapping| {
            mapping.from == logical
                && match self.lang {
                    Some(lang) => mapping.lang.as_deref() == Some(lang),
                    None => true,
                }
        })
    }

    fn declared_size(&self, field: &Field) -> Option<u32> {
        let field_size = field.field_size.filter(|size| *size > 0);
        match self.table {
            MappingTable::Database => field.db_size.filter(|size| *size > 0).or(field_size),
            MappingTable::Language | MappingTable::Generic => field_size,
        }
    }
}
