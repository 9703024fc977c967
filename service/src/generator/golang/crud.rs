//! Go CRUD persistence generation for MySQL
//!
//! Every persisted class gets create, retrieve-by-key, update and delete functions on top of
//! `database/sql`. Column lists and bind lists come from one [`ColumnPlan`] so placeholders
//! and arguments cannot drift apart.

use modelgen_core::{Document, Entity, EntityKind, Field, GeneratorConfig, TypeResolver};
use std::fmt::Write;
use tracing::debug;

use super::FETCH_HELPER;
use crate::generator::base::{ImportManager, generated_banner};
use crate::generator::persistence::{
    ColumnPlan, assignment_clause, persistence_candidates, table_name,
};
use crate::generator::session::GenerationSession;
use crate::generator::traits::{Generator, GeneratorResult, GeneratorRole};

/// Go CRUD generator
#[derive(Debug, Default, Clone, Copy)]
pub struct GoCrudGenerator;

impl GoCrudGenerator {
    /// Create a new Go CRUD generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn header(doc: &Document, config: &GeneratorConfig) -> GeneratorResult<String> {
        let mut out = String::new();
        writeln!(out, "package {}", doc.namespace)?;
        writeln!(out)?;

        let mut imports = ImportManager::new();
        imports.add("database/sql");
        imports.add("fmt");
        imports.add("log");
        imports.add("errors");
        imports.add_aliased("_", "github.com/go-sql-driver/mysql");
        for import in doc.imports.iter().filter(|import| !import.no_persistence) {
            imports.add_declared(import);
        }
        writeln!(out, "{}", imports.go_imports()?)?;

        out.push_str(&generated_banner("//", &config.source_name)?);
        writeln!(out)?;

        let control = &doc.db_control;
        let schema = if control.schema.is_empty() {
            format!("{}{}", config.table_prefix, doc.schema_name())
        } else {
            control.schema.clone()
        };

        writeln!(out, "var globalDataBase *sql.DB")?;
        writeln!(out)?;
        writeln!(out, "const (")?;
        writeln!(out, "  DB_USER       = \"{}\"", control.user)?;
        writeln!(out, "  DB_PASSWORD   = \"{}\"", control.password)?;
        writeln!(out, "  DB_SCHEMA     = \"{schema}\"")?;
        writeln!(out, "  DB_HOST_MYSQL = \"{}\"", control.host)?;
        writeln!(out, "  DB_NAME_MYSQL = \"{}\"", control.dbname)?;
        writeln!(out, ")")?;
        writeln!(out)?;

        writeln!(out, "// Persistence wraps the shared database handle")?;
        writeln!(out, "type Persistence struct {{")?;
        writeln!(out, "  db *sql.DB")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "func initMySQL() (*sql.DB, error) {{")?;
        writeln!(
            out,
            "  dsn := fmt.Sprintf(\"%s:%s@tcp(%s)/%s?parseTime=true\", DB_USER, DB_PASSWORD, DB_HOST_MYSQL, DB_NAME_MYSQL)"
        )?;
        writeln!(out, "  return sql.Open(\"mysql\", dsn)")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "func globalInitDb() error {{")?;
        writeln!(out, "  if globalDataBase != nil {{")?;
        writeln!(out, "    return nil")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  db, err := initMySQL()")?;
        writeln!(out, "  if err != nil {{")?;
        writeln!(out, "    log.Printf(\"can't open database: %v\", err)")?;
        writeln!(out, "    return err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  globalDataBase = db")?;
        writeln!(out, "  return nil")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "// NewPersistence connects to the configured database")?;
        writeln!(out, "func NewPersistence() (*Persistence, error) {{")?;
        writeln!(out, "  if err := globalInitDb(); err != nil {{")?;
        writeln!(out, "    return nil, err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  return &Persistence{{db: globalDataBase}}, nil")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        Ok(out)
    }

    fn generate_entity(
        entity: &Entity,
        doc: &Document,
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

        let name = &entity.name;
        let key = plan.primary.column_name();
        let key_type = TypeResolver::language(doc).resolve(plan.primary);
        let schema_const = format!("DB_SCHEMA_{}", name.to_uppercase());
        let fetch = session.fetch_helper_name(FETCH_HELPER, name);

        let mut out = String::new();
        writeln!(out, "//")?;
        writeln!(out, "// persistence for {name}")?;
        writeln!(out, "//")?;
        writeln!(
            out,
            "const {schema_const} = \"{}\"",
            table_name(entity, &config.table_prefix)
        )?;
        writeln!(out)?;
        writeln!(out, "var ErrNoSuch{name} = errors.New(\"No such {name}\")")?;
        writeln!(out)?;
        writeln!(
            out,
            "const createUpdateVariables{name} = \"{}\"",
            assignment_clause(&plan.settable)
        )?;
        writeln!(out)?;

        // create
        if plan.create.is_empty() {
            session.warn(name, "no insertable columns, Create skipped");
        } else {
            writeln!(out, "// Create{name} inserts a new row")?;
            writeln!(out, "func (p *Persistence) Create{name}(obj *{name}) error {{")?;
            writeln!(
                out,
                "  stmt, err := p.db.Prepare(\"INSERT \" + {schema_const} + \" SET {}\")",
                assignment_clause(&plan.create)
            )?;
            writeln!(out, "  if err != nil {{")?;
            writeln!(out, "    return err")?;
            writeln!(out, "  }}")?;
            writeln!(out, "  defer stmt.Close()")?;
            writeln!(out, "  _, err = stmt.Exec({})", Self::binds(&plan.create))?;
            writeln!(out, "  return err")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        // fetch
        writeln!(
            out,
            "func (p *Persistence) {fetch}(queryString string, args ...interface{{}}) ([]{name}, error) {{"
        )?;
        writeln!(out, "  rows, err := p.db.Query(queryString, args...)")?;
        writeln!(out, "  if err != nil {{")?;
        writeln!(out, "    return nil, err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  defer rows.Close()")?;
        writeln!(out, "  var list []{name}")?;
        writeln!(out, "  for rows.Next() {{")?;
        writeln!(out, "    var res {name}")?;
        let targets: Vec<String> = plan
            .scan
            .iter()
            .map(|field| format!("&res.{}", field.name))
            .collect();
        writeln!(out, "    if err := rows.Scan({}); err != nil {{", targets.join(", "))?;
        writeln!(out, "      return nil, err")?;
        writeln!(out, "    }}")?;
        writeln!(out, "    list = append(list, res)")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  return list, rows.Err()")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        // retrieve
        writeln!(out, "// Retrieve{name}FromID loads one row by key")?;
        writeln!(
            out,
            "func (p *Persistence) Retrieve{name}FromID(id {key_type}) (*{name}, error) {{"
        )?;
        writeln!(
            out,
            "  list, err := p.{fetch}(\"SELECT * FROM \" + {schema_const} + \" WHERE {key}=?\", id)"
        )?;
        writeln!(out, "  if err != nil {{")?;
        writeln!(out, "    return nil, err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  if len(list) == 0 {{")?;
        writeln!(out, "    return nil, ErrNoSuch{name}")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  return &list[0], nil")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        // update
        if plan.settable.is_empty() {
            session.warn(name, "no updatable columns, Update skipped");
        } else {
            writeln!(
                out,
                "var updateQuery{name} = \"UPDATE \" + {schema_const} + \" SET \" + createUpdateVariables{name} + \" WHERE {key}=?\""
            )?;
            writeln!(out)?;
            writeln!(out, "// Update{name} writes all settable columns")?;
            writeln!(out, "func (p *Persistence) Update{name}(obj *{name}) error {{")?;
            writeln!(out, "  stmt, err := p.db.Prepare(updateQuery{name})")?;
            writeln!(out, "  if err != nil {{")?;
            writeln!(out, "    return err")?;
            writeln!(out, "  }}")?;
            writeln!(out, "  defer stmt.Close()")?;
            writeln!(out, "  _, err = stmt.Exec({})", Self::binds(&plan.update_binds()))?;
            writeln!(out, "  return err")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        // delete
        writeln!(
            out,
            "var deleteQuery{name} = \"DELETE FROM \" + {schema_const} + \" WHERE {key}=?\""
        )?;
        writeln!(out)?;
        writeln!(out, "// Delete{name} removes one row by key")?;
        writeln!(out, "func (p *Persistence) Delete{name}(id {key_type}) error {{")?;
        writeln!(out, "  res, err := p.db.Exec(deleteQuery{name}, id)")?;
        writeln!(out, "  if err != nil {{")?;
        writeln!(out, "    return err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  count, err := res.RowsAffected()")?;
        writeln!(out, "  if err != nil {{")?;
        writeln!(out, "    return err")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  if count == 0 {{")?;
        writeln!(out, "    return ErrNoSuch{name}")?;
        writeln!(out, "  }}")?;
        writeln!(out, "  return nil")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        session.complete_persisted_entity();
        Ok(Some(out))
    }

    fn binds(fields: &[&Field]) -> String {
        fields
            .iter()
            .map(|field| format!("obj.{}", field.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Generator for GoCrudGenerator {
    fn name(&self) -> &str {
        "go-crud"
    }

    fn role(&self) -> GeneratorRole {
        GeneratorRole::Crud
    }

    fn generate(
        &self,
        doc: &Document,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<String> {
        let mut out = Self::header(doc, config)?;

        for entity in persistence_candidates(doc, config) {
            match &entity.kind {
                EntityKind::Class => {
                    debug!(entity = %entity.name, "generating go persistence");
                    if let Some(code) = Self::generate_entity(entity, doc, config, session)? {
                        out.push_str(&code);
                    }
                }
                EntityKind::Enum => {}
                EntityKind::Unknown(kind) => {
                    session.warn(
                        &entity.name,
                        format!("can't generate persistence for type '{kind}'"),
                    );
                }
            }
        }

        Ok(out)
    }
}
