//! Schema document model
//!
//! A [`Document`] is the in-memory form of one schema unit after parsing. Once the loader has
//! merged all includes into the root document it is treated as immutable; generators only
//! borrow it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::type_mapping::TypeResolver;

/// Root of a schema unit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Document {
    /// Namespace (package name for generated code)
    pub namespace: String,

    /// Database schema name, falls back to the namespace when absent
    #[serde(alias = "dbschema", skip_serializing_if = "Option::is_none")]
    pub db_schema: Option<String>,

    /// Documents to load and merge into this one
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<Include>,

    /// Package imports for generated code
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Import>,

    /// Declared entities in document order
    #[serde(alias = "defines")]
    pub entities: Vec<Entity>,

    /// Logical type to database column type
    #[serde(alias = "dbtypemappings", skip_serializing_if = "Vec::is_empty")]
    pub db_type_mappings: Vec<TypeMapping>,

    /// Logical type to the primary target language type
    #[serde(
        alias = "gotypemappings",
        alias = "go_type_mappings",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub lang_type_mappings: Vec<TypeMapping>,

    /// Language tagged mappings shared by the secondary targets
    #[serde(alias = "anytypemappings", skip_serializing_if = "Vec::is_empty")]
    pub any_type_mappings: Vec<TypeMapping>,

    /// Database connection block
    #[serde(alias = "dbcontrol")]
    pub db_control: DbControl,
}

/// Reference to another schema file, relative to the root document directory
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Include {
    /// File name as written in the schema
    pub filename: String,
}

impl Include {
    /// Create an include reference
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Package import declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Import {
    /// Package path, optionally prefixed with an alias (`alias path`)
    pub package: String,

    /// Leave this import out of persistence code
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_persistence: bool,
}

impl Import {
    /// Split the declaration into an optional alias and the package path
    #[must_use]
    pub fn alias_and_path(&self) -> (Option<&str>, &str) {
        let trimmed = self.package.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((alias, path)) => (Some(alias), path.trim()),
            None => (None, trimmed),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DbControl {
    /// Database host
    pub host: String,
    /// Database name
    pub dbname: String,
    /// Explicit schema name, overrides the prefixed default
    pub schema: String,
    /// User name
    pub user: String,
    /// Password
    pub password: String,
}

impl DbControl {
    /// Override each setting for which `other` carries a non-empty value
    pub fn overlay(&mut self, other: &DbControl) {
        fn take(dst: &mut String, src: &str) {
            if !src.is_empty() {
                *dst = src.to_string();
            }
        }

        take(&mut self.host, &other.host);
        take(&mut self.dbname, &other.dbname);
        take(&mut self.schema, &other.schema);
        take(&mut self.user, &other.user);
        take(&mut self.password, &other.password);
    }
}

/// Entity kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    /// Record type with fields
    #[default]
    Class,
    /// Named integer constants
    Enum,
    /// Anything else, kept verbatim so generators can report it
    Unknown(String),
}

impl EntityKind {
    /// Keyword used in schema files
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for EntityKind {
    fn from(value: String) -> Self {
        match value.trim() {
            "class" => Self::Class,
            "enum" => Self::Enum,
            _ => Self::Unknown(value),
        }
    }
}

impl From<&str> for EntityKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared type (a `define` in XML schemas)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Entity {
    /// Class or enum
    #[serde(alias = "type")]
    pub kind: EntityKind,

    /// Type name
    pub name: String,

    /// Base type to embed or derive from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,

    /// Table name override (still prefixed)
    #[serde(alias = "dbschema", skip_serializing_if = "Option::is_none")]
    pub db_schema: Option<String>,

    /// Generate the model but no persistence code or table
    #[serde(alias = "nopersist", skip_serializing_if = "std::ops::Not::not")]
    pub skip_persistence: bool,

    /// Canonical ordered field list
    pub fields: Vec<Field>,
}

impl Entity {
    /// Create a class entity
    #[must_use]
    pub fn class(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            kind: EntityKind::Class,
            name: name.into(),
            fields,
            ..Self::default()
        }
    }

    /// Create an enum entity
    #[must_use]
    pub fn enumeration(name: impl Into<String>, members: Vec<Field>) -> Self {
        Self {
            kind: EntityKind::Enum,
            name: name.into(),
            fields: members,
            ..Self::default()
        }
    }

    /// Whether this is a class
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind == EntityKind::Class
    }

    /// Whether this is an enum
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == EntityKind::Enum
    }

    /// Class entities not flagged skip-persistence
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.is_class() && !self.skip_persistence
    }

    /// Key field: the first field marked primary, otherwise the first field
    #[must_use]
    pub fn primary_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.primary)
            .or_else(|| self.fields.first())
    }

    /// Fields that map to table columns, in declaration order
    pub fn persisted_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.is_persisted())
    }

    /// Persisted fields other than the key, in declaration order
    pub fn settable_fields(&self) -> impl Iterator<Item = &Field> {
        let primary = self.primary_field().map(|field| field.name.as_str());
        self.persisted_fields()
            .filter(move |field| Some(field.name.as_str()) != primary)
    }

    /// Field names declared more than once
    #[must_use]
    pub fn duplicate_field_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) && !duplicates.contains(&field.name.as_str()) {
                duplicates.push(field.name.as_str());
            }
        }
        duplicates
    }

    /// Accessor descriptors for every field, types resolved through `resolver`
    #[must_use]
    pub fn access_methods(&self, resolver: &TypeResolver<'_>) -> Vec<AccessMethod> {
        self.fields
            .iter()
            .map(|field| AccessMethod::from_field(field, resolver.resolve(field)))
            .collect()
    }
}

/// Legacy field categories, one per element name of the old categorized lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Guid,
    String,
    Bool,
    Time,
    Int,
    List,
    Object,
    Enum,
}

impl FieldCategory {
    /// Element name, also used as logical type when the field declares none
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Guid => "guid",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Time => "time",
            Self::Int => "int",
            Self::List => "list",
            Self::Object => "object",
            Self::Enum => "enum",
        }
    }
}

impl FromStr for FieldCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "guid" => Ok(Self::Guid),
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "time" => Ok(Self::Time),
            "int" => Ok(Self::Int),
            "list" => Ok(Self::List),
            "object" => Ok(Self::Object),
            "enum" => Ok(Self::Enum),
            other => Err(format!("unknown field category '{other}'")),
        }
    }
}

/// One member of an entity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Field {
    /// Member name
    pub name: String,

    /// Default value; `Some("")` is an explicit empty default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Literal value (enum members only)
    pub value: i64,

    /// Column size for the database type mapping
    #[serde(alias = "dbsize", skip_serializing_if = "Option::is_none")]
    pub db_size: Option<u32>,

    /// Size substituted into parameterized type mappings
    #[serde(alias = "fieldsize", skip_serializing_if = "Option::is_none")]
    pub field_size: Option<u32>,

    /// Logical type name
    #[serde(rename = "type")]
    pub field_type: String,

    /// Member holds a pointer
    #[serde(alias = "ispointer", skip_serializing_if = "std::ops::Not::not")]
    pub is_pointer: bool,

    /// Member holds a sequence
    #[serde(alias = "islist", skip_serializing_if = "std::ops::Not::not")]
    pub is_list: bool,

    /// Schema version introducing this field
    #[serde(alias = "fromversion")]
    pub from_version: u32,

    /// Not stored in the database
    #[serde(alias = "nopersist", skip_serializing_if = "std::ops::Not::not")]
    pub skip_persistence: bool,

    /// Value assigned by the database on insert
    #[serde(alias = "dbautoid", skip_serializing_if = "std::ops::Not::not")]
    pub auto_id: bool,

    /// Explicit primary key marker
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary: bool,

    /// Legacy declaration category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldCategory>,
}

impl Field {
    /// Create a field with a name and logical type
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    /// Create an enum member
    #[must_use]
    pub fn member(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            ..Self::default()
        }
    }

    /// Set the default value
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the generic field size
    #[must_use]
    pub fn with_field_size(mut self, size: u32) -> Self {
        self.field_size = Some(size);
        self
    }

    /// Set the schema version introducing this field
    #[must_use]
    pub fn with_from_version(mut self, version: u32) -> Self {
        self.from_version = version;
        self
    }

    /// Mark as assigned by the database
    #[must_use]
    pub fn auto_id(mut self) -> Self {
        self.auto_id = true;
        self
    }

    /// Mark as list valued
    #[must_use]
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Mark as pointer valued
    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    /// Exclude from persistence
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.skip_persistence = true;
        self
    }

    /// Mark as primary key
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Whether the field maps to a column
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.skip_persistence
    }

    /// Lowercased column name
    #[must_use]
    pub fn column_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Type mapping rule
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TypeMapping {
    /// Language tag, only meaningful in the generic table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Logical source type
    pub from: String,

    /// Destination template, may contain one `%d` size placeholder
    pub to: String,

    /// Size used when the field does not declare one
    #[serde(alias = "fieldsize", skip_serializing_if = "Option::is_none")]
    pub field_size: Option<u32>,
}

impl TypeMapping {
    /// Create an untagged mapping
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            lang: None,
            from: from.into(),
            to: to.into(),
            field_size: None,
        }
    }

    /// Set the default size
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.field_size = Some(size);
        self
    }

    /// Set the language tag
    #[must_use]
    pub fn for_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

/// Accessor descriptor derived from a field during model generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMethod {
    /// Emit a getter
    pub getter: bool,
    /// Emit a setter
    pub setter: bool,
    /// Field is list valued
    pub is_list: bool,
    /// Field is pointer valued
    pub is_pointer: bool,
    /// Field is not persisted
    pub no_persist: bool,
    /// Field is database assigned
    pub auto_id: bool,
    /// Field name
    pub name: String,
    /// Resolved element type
    pub type_name: String,
}

impl AccessMethod {
    /// Describe the accessors of `field` whose element type resolved to `type_name`
    #[must_use]
    pub fn from_field(field: &Field, type_name: String) -> Self {
        Self {
            getter: true,
            setter: true,
            is_list: field.is_list,
            is_pointer: field.is_pointer,
            no_persist: field.skip_persistence,
            auto_id: field.auto_id,
            name: field.name.clone(),
            type_name,
        }
    }
}

/// Problem found by [`Document::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Entity the issue belongs to
    pub entity: String,
    /// Description
    pub message: String,
}

impl Document {
    /// Merge an included document into this one.
    ///
    /// Imports, entities and all mapping tables are appended after the existing entries.
    /// Connection settings are overridden one by one, and only by non-empty values.
    /// Includes of the child are not carried over.
    pub fn merge_include(&mut self, child: Document) {
        let Document {
            imports,
            entities,
            db_type_mappings,
            lang_type_mappings,
            any_type_mappings,
            db_control,
            ..
        } = child;

        self.imports.extend(imports);
        self.entities.extend(entities);
        self.db_type_mappings.extend(db_type_mappings);
        self.lang_type_mappings.extend(lang_type_mappings);
        self.any_type_mappings.extend(any_type_mappings);
        self.db_control.overlay(&db_control);
    }

    /// Look up an entity by name
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    /// Database schema name, falling back to the namespace
    #[must_use]
    pub fn schema_name(&self) -> &str {
        self.db_schema
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.namespace)
    }

    /// Structural checks that do not stop generation
    #[must_use]
    pub fn validate(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        for entity in &self.entities {
            for name in entity.duplicate_field_names() {
                issues.push(SchemaIssue {
                    entity: entity.name.clone(),
                    message: format!("duplicate field name '{name}'"),
                });
            }
        }
        issues
    }

    /// Short human readable dump used for verbose logging
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Namespace: {}", self.namespace);
        let _ = writeln!(out, "Imports: {}", self.imports.len());
        for import in &self.imports {
            let _ = writeln!(out, "  {}", import.package);
        }
        let _ = writeln!(
            out,
            "Type mappings: db={} lang={} any={}",
            self.db_type_mappings.len(),
            self.lang_type_mappings.len(),
            self.any_type_mappings.len()
        );
        for entity in &self.entities {
            let _ = writeln!(out, "{} {} ({} fields)", entity.kind, entity.name, entity.fields.len());
            for field in &entity.fields {
                let _ = writeln!(out, "  {}: {}", field.name, field.field_type);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primary_defaults_to_first_field() {
        let entity = Entity::class(
            "User",
            vec![Field::new("ID", "guid"), Field::new("Name", "string")],
        );
        assert_eq!(entity.primary_field().map(|f| f.name.as_str()), Some("ID"));

        let settable: Vec<_> = entity.settable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(settable, vec!["Name"]);
    }

    #[test]
    fn test_explicit_primary_marker_wins() {
        let entity = Entity::class(
            "Session",
            vec![
                Field::new("Owner", "string"),
                Field::new("Token", "string").primary(),
                Field::new("Scratch", "string").transient(),
            ],
        );
        assert_eq!(
            entity.primary_field().map(|f| f.name.as_str()),
            Some("Token")
        );
        let settable: Vec<_> = entity.settable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(settable, vec!["Owner"]);
    }

    #[test]
    fn test_entity_kind_round_trips_unknown_text() {
        assert_eq!(EntityKind::from("class"), EntityKind::Class);
        assert_eq!(EntityKind::from("enum"), EntityKind::Enum);
        let kind = EntityKind::from("interface");
        assert_eq!(kind, EntityKind::Unknown("interface".to_string()));
        assert_eq!(kind.to_string(), "interface");
    }

    #[test]
    fn test_merge_appends_and_overlays_connection() {
        let mut parent = Document {
            namespace: "main".to_string(),
            entities: vec![Entity::class("A", vec![Field::new("ID", "guid")])],
            db_control: DbControl {
                host: "db.local".to_string(),
                dbname: "prod".to_string(),
                user: "root".to_string(),
                password: "secret".to_string(),
                ..DbControl::default()
            },
            ..Document::default()
        };
        let child = Document {
            entities: vec![Entity::class("B", vec![Field::new("ID", "guid")])],
            includes: vec![Include::new("nested.xml")],
            db_control: DbControl {
                user: "app".to_string(),
                ..DbControl::default()
            },
            ..Document::default()
        };

        parent.merge_include(child);

        let names: Vec<_> = parent.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(parent.includes.is_empty());
        assert_eq!(parent.db_control.user, "app");
        assert_eq!(parent.db_control.host, "db.local");
        assert_eq!(parent.db_control.dbname, "prod");
        assert_eq!(parent.db_control.password, "secret");
    }

    #[test]
    fn test_duplicate_field_names() {
        let entity = Entity::class(
            "Dup",
            vec![
                Field::new("A", "int"),
                Field::new("B", "int"),
                Field::new("A", "string"),
            ],
        );
        assert_eq!(entity.duplicate_field_names(), vec!["A"]);

        let doc = Document {
            entities: vec![entity],
            ..Document::default()
        };
        let issues = doc.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].entity, "Dup");
    }

    #[test]
    fn test_import_alias_split() {
        let import = Import {
            package: "uuid github.com/satori/go.uuid".to_string(),
            no_persistence: false,
        };
        assert_eq!(
            import.alias_and_path(),
            (Some("uuid"), "github.com/satori/go.uuid")
        );
    }

    #[test]
    fn test_deserialize_yaml_document() {
        let yaml = r"
namespace: shop
db_type_mappings:
  - from: guid
    to: varchar(%d)
    field_size: 36
entities:
  - kind: class
    name: Order
    fields:
      - name: ID
        type: guid
        auto_id: true
      - name: Total
        type: int
        default: '0'
";
        let doc: Document = serde_yaml::from_str(yaml).expect("yaml should parse");
        assert_eq!(doc.namespace, "shop");
        let order = doc.entity("Order").expect("Order should exist");
        assert!(order.is_class());
        assert!(order.fields[0].auto_id);
        assert_eq!(order.fields[1].default.as_deref(), Some("0"));
        assert_eq!(doc.db_type_mappings[0].field_size, Some(36));
    }
}
