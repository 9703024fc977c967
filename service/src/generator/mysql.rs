//! MySQL table creation and upgrade statements
//!
//! Fresh mode creates one table per persisted class. Upgrade mode (`from_version > 0`) only
//! adds the columns introduced at or after the requested schema version.

use modelgen_core::{Document, Entity, EntityKind, GeneratorConfig, TypeResolver};
use std::fmt::Write;
use tracing::debug;

use super::base::BaseCodeFormatter;
use super::persistence::{ColumnPlan, persistence_candidates, table_name};
use super::session::GenerationSession;
use super::traits::{Generator, GeneratorResult, GeneratorRole};

/// Database selected when the schema configures none
pub const DEFAULT_DATABASE: &str = "nagini";

/// MySQL DDL generator
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDdlGenerator;

impl MySqlDdlGenerator {
    /// Create a new DDL generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn create_table(
        entity: &Entity,
        table: &str,
        resolver: &TypeResolver<'_>,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<Option<String>> {
        let plan = match ColumnPlan::for_entity(entity) {
            Ok(plan) => plan,
            Err(reason) => {
                session.error(&entity.name, reason);
                return Ok(None);
            }
        };

        let mut out = String::new();
        writeln!(out)?;
        if config.generate_drop {
            writeln!(out, "DROP TABLE IF EXISTS `{table}`;")?;
        }
        writeln!(out, "CREATE TABLE `{table}` (")?;
        for field in &plan.scan {
            // MySQL only accepts AUTO_INCREMENT on the key column
            let increment = if field.auto_id && std::ptr::eq(*field, plan.primary) {
                " AUTO_INCREMENT"
            } else {
                ""
            };
            writeln!(
                out,
                "  `{}` {} NOT NULL{increment},",
                field.column_name(),
                resolver.resolve(field)
            )?;
        }
        writeln!(out, "  PRIMARY KEY(`{}`)", plan.primary.column_name())?;
        writeln!(out, ") ENGINE=InnoDB DEFAULT CHARSET=utf8;")?;
        Ok(Some(out))
    }

    fn upgrade_table(
        entity: &Entity,
        table: &str,
        resolver: &TypeResolver<'_>,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<Option<String>> {
        let mut out = String::new();
        let mut complete = true;

        for field in entity
            .persisted_fields()
            .filter(|field| field.from_version >= config.from_version)
        {
            let Some(default) = &field.default else {
                session.error(
                    &entity.name,
                    format!(
                        "field '{}' added in version {} needs a default value to upgrade existing rows",
                        field.name, field.from_version
                    ),
                );
                complete = false;
                continue;
            };
            writeln!(
                out,
                "ALTER TABLE `{table}` ADD COLUMN `{}` {} NOT NULL DEFAULT '{}';",
                field.column_name(),
                resolver.resolve(field),
                BaseCodeFormatter::escape_sql_string(default)
            )?;
        }

        Ok(complete.then_some(out))
    }
}

impl Generator for MySqlDdlGenerator {
    fn name(&self) -> &str {
        "mysql-ddl"
    }

    fn role(&self) -> GeneratorRole {
        GeneratorRole::DbCreate
    }

    fn generate(
        &self,
        doc: &Document,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<String> {
        let resolver = TypeResolver::database(doc);
        let dbname = if doc.db_control.dbname.is_empty() {
            DEFAULT_DATABASE
        } else {
            doc.db_control.dbname.as_str()
        };

        let mut out = String::new();
        writeln!(out, "USE `{dbname}`;")?;

        for entity in persistence_candidates(doc, config) {
            match &entity.kind {
                EntityKind::Class => {}
                EntityKind::Enum => continue,
                EntityKind::Unknown(kind) => {
                    session.warn(&entity.name, format!("can't create a table for type '{kind}'"));
                    continue;
                }
            }

            let table = table_name(entity, &config.table_prefix);
            debug!(entity = %entity.name, table = %table, upgrade = config.is_upgrade(), "generating table statements");
            let statements = if config.is_upgrade() {
                Self::upgrade_table(entity, &table, &resolver, config, session)?
            } else {
                Self::create_table(entity, &table, &resolver, config, session)?
            };
            if let Some(statements) = statements {
                out.push_str(&statements);
            }
        }

        Ok(out)
    }
}
