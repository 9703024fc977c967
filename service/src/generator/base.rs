//! Base functionality shared by all code generators

use convert_case::{Case, Casing};
use indexmap::IndexSet;
use modelgen_core::{Field, Import};
use std::fmt::Write;

use super::traits::GeneratorResult;

/// Ordered, de-duplicated import list
#[derive(Debug, Default, Clone)]
pub struct ImportManager {
    /// (alias, path) pairs in insertion order
    imports: IndexSet<(Option<String>, String)>,
}

impl ImportManager {
    /// Create an empty import list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain package path
    pub fn add(&mut self, path: impl Into<String>) {
        self.imports.insert((None, path.into()));
    }

    /// Add a package under an alias (`_` for side effect imports)
    pub fn add_aliased(&mut self, alias: impl Into<String>, path: impl Into<String>) {
        self.imports.insert((Some(alias.into()), path.into()));
    }

    /// Add a schema import declaration
    pub fn add_declared(&mut self, import: &Import) {
        match import.alias_and_path() {
            (_, "") => {}
            (Some(alias), path) => self.add_aliased(alias, path),
            (None, path) => self.add(path),
        }
    }

    /// Render a Go import block, empty when there is nothing to import
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the buffer fails
    pub fn go_imports(&self) -> GeneratorResult<String> {
        let mut out = String::new();
        if self.imports.is_empty() {
            return Ok(out);
        }

        writeln!(out, "import (")?;
        for (alias, path) in &self.imports {
            match alias {
                Some(alias) => writeln!(out, "  {alias} \"{path}\"")?,
                None => writeln!(out, "  \"{path}\"")?,
            }
        }
        writeln!(out, ")")?;
        Ok(out)
    }
}

/// Base code formatter with common functionality
pub struct BaseCodeFormatter;

impl BaseCodeFormatter {
    /// Escape a string for a double quoted Go, TypeScript or C++ literal
    #[must_use]
    pub fn escape_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Escape a value for a single quoted SQL literal
    #[must_use]
    pub fn escape_sql_string(s: &str) -> String {
        s.replace('\\', "\\\\").replace('\'', "''")
    }

    /// Convert an identifier to camelCase
    #[must_use]
    pub fn to_camel_case(s: &str) -> String {
        s.to_case(Case::Camel)
    }
}

/// Comment banner naming the generator and the schema source
///
/// # Errors
///
/// Returns an error if writing to the buffer fails
pub fn generated_banner(comment: &str, source: &str) -> GeneratorResult<String> {
    let mut out = String::new();
    writeln!(out, "{comment}")?;
    writeln!(out, "{comment} this code is generated by the modelgenerator")?;
    if !source.is_empty() {
        writeln!(out, "{comment} data model source = {source}")?;
    }
    writeln!(out, "{comment}")?;
    Ok(out)
}

/// Element type decorated with the pointer qualifier of a field
#[must_use]
pub fn qualified_element(field: &Field, element: &str, pointer: &str) -> String {
    if field.is_pointer {
        format!("{pointer}{element}")
    } else {
        element.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_manager_keeps_order_and_dedups() -> GeneratorResult<()> {
        let mut imports = ImportManager::new();
        imports.add("time");
        imports.add_declared(&Import {
            package: "uuid github.com/satori/go.uuid".to_string(),
            no_persistence: false,
        });
        imports.add("time");
        imports.add_aliased("_", "github.com/go-sql-driver/mysql");

        assert_eq!(
            imports.go_imports()?,
            "import (\n  \"time\"\n  uuid \"github.com/satori/go.uuid\"\n  _ \"github.com/go-sql-driver/mysql\"\n)\n"
        );
        assert_eq!(ImportManager::new().go_imports()?, "");
        Ok(())
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(BaseCodeFormatter::to_camel_case("OrderState"), "orderState");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(BaseCodeFormatter::escape_string("a \"b\"\n"), "a \\\"b\\\"\\n");
        assert_eq!(BaseCodeFormatter::escape_sql_string("it's"), "it''s");
    }

    #[test]
    fn test_banner() -> GeneratorResult<()> {
        assert_eq!(
            generated_banner("//", "shop.xml")?,
            "//\n// this code is generated by the modelgenerator\n// data model source = shop.xml\n//\n"
        );
        Ok(())
    }
}
