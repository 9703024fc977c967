//! Column planning shared by the CRUD and table generators
//!
//! Statement text and bind values must list columns in the same order. Both are derived from
//! one [`ColumnPlan`] so they cannot drift apart.

use modelgen_core::{Document, Entity, Field, GeneratorConfig};

/// Ordered column lists for one persisted entity
#[derive(Debug, Clone)]
pub struct ColumnPlan<'a> {
    /// Key field
    pub primary: &'a Field,
    /// Persisted fields other than the key, in declaration order
    pub settable: Vec<&'a Field>,
    /// Columns written on insert; the key is left out when the database assigns it
    pub create: Vec<&'a Field>,
    /// Columns read back from a row, in declaration order
    pub scan: Vec<&'a Field>,
}

impl<'a> ColumnPlan<'a> {
    /// Plan the columns of `entity`
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the entity has no fields or its key is not
    /// persisted.
    pub fn for_entity(entity: &'a Entity) -> Result<Self, String> {
        let primary = entity
            .primary_field()
            .ok_or_else(|| "class has no fields, persistence needs at least a key".to_string())?;

        if !primary.is_persisted() {
            return Err(format!(
                "key field '{}' is marked nopersist",
                primary.name
            ));
        }

        let settable: Vec<&Field> = entity.settable_fields().collect();
        let create = if primary.auto_id {
            settable.clone()
        } else {
            std::iter::once(primary).chain(settable.iter().copied()).collect()
        };

        Ok(Self {
            primary,
            settable,
            create,
            scan: entity.persisted_fields().collect(),
        })
    }

    /// Bind order for updates: settable columns, then the key for the `WHERE` clause
    #[must_use]
    pub fn update_binds(&self) -> Vec<&'a Field> {
        self.settable
            .iter()
            .copied()
            .chain(std::iter::once(self.primary))
            .collect()
    }
}

/// `col=?,col=?` assignment list for `fields`
#[must_use]
pub fn assignment_clause(fields: &[&Field]) -> String {
    fields
        .iter()
        .map(|field| format!("{}=?", field.column_name()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Table name: prefix plus the entity override, or prefix plus the lowercased entity name
#[must_use]
pub fn table_name(entity: &Entity, prefix: &str) -> String {
    match entity.db_schema.as_deref().filter(|s| !s.is_empty()) {
        Some(table) => format!("{prefix}{table}"),
        None => format!("{prefix}{}", entity.name.to_lowercase()),
    }
}

/// Entities considered for persistence, in document order
///
/// Skip-persistence entities and entities rejected by the class filter are dropped. The kind
/// is not checked here so callers can report unknown kinds.
pub fn persistence_candidates<'a>(
    doc: &'a Document,
    config: &'a GeneratorConfig,
) -> impl Iterator<Item = &'a Entity> + 'a {
    doc.entities
        .iter()
        .filter(|entity| !entity.skip_persistence)
        .filter(|entity| config.persistence.includes(&entity.name))
}
