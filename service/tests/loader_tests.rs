//! Schema tree loading against real files on disk

use modelgen::CodeGenerationService;
use modelgen::parser::SchemaLoader;
use modelgen_core::{EntityKind, FieldCategory, GeneratorConfig, LoaderSettings, ModelGenError};
use modelgen::file_system_adapter::TokioFileSystemAdapter;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

const MAIN: &str = r#"<?xml version="1.0"?>
<doc namespace="shop" dbschema="shopdb">
  <include>common.xml</include>
  <include>billing.yaml</include>
  <imports>
    <package>time</package>
    <package no_persistence="true">net/http</package>
  </imports>
  <define type="class" name="Order" inherits="Base">
    <field name="ID" type="guid" primary="true"/>
    <field name="Note" type="string" fieldsize="512"/>
  </define>
  <dbtypemappings>
    <map from="guid" to="varchar(%d)" fieldsize="36"/>
  </dbtypemappings>
  <dbcontrol>
    <host>db.local:3306</host>
    <dbname>shop</dbname>
    <user>root</user>
    <password>secret</password>
  </dbcontrol>
</doc>
"#;

const COMMON: &str = r#"<doc>
  <define type="enum" name="State">
    <int name="Open" value="1"/>
    <int name="Closed" value="2"/>
  </define>
  <dbtypemappings>
    <map from="guid" to="binary(16)"/>
    <map from="string" to="varchar(%d)" fieldsize="255"/>
  </dbtypemappings>
  <dbcontrol>
    <user>shop_rw</user>
  </dbcontrol>
</doc>
"#;

const BILLING: &str = r#"
entities:
  - name: Invoice
    type: class
    fields:
      - name: ID
        type: int
        dbautoid: true
      - name: Total
        type: decimal
anytypemappings:
  - lang: ts
    from: decimal
    to: number
"#;

async fn write_tree(dir: &TempDir, files: &[(&str, &str)]) -> std::io::Result<()> {
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_include_tree_is_merged_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[("main.xml", MAIN), ("common.xml", COMMON), ("billing.yaml", BILLING)],
    )
    .await?;

    let doc = SchemaLoader::new().load(dir.path().join("main.xml")).await?;

    assert_eq!(doc.namespace, "shop");
    assert_eq!(doc.schema_name(), "shopdb");
    let names: Vec<_> = doc.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "State", "Invoice"]);

    // root mappings come first, so the root's guid rule wins
    let froms: Vec<_> = doc.db_type_mappings.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(froms, vec!["varchar(%d)", "binary(16)", "varchar(%d)"]);
    assert_eq!(doc.any_type_mappings.len(), 1);

    assert_eq!(doc.imports.len(), 2);
    assert!(doc.imports[1].no_persistence);
    Ok(())
}

#[tokio::test]
async fn test_db_control_merge_only_overrides_set_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[("main.xml", MAIN), ("common.xml", COMMON), ("billing.yaml", BILLING)],
    )
    .await?;

    let doc = SchemaLoader::new().load(dir.path().join("main.xml")).await?;

    assert_eq!(doc.db_control.user, "shop_rw");
    assert_eq!(doc.db_control.host, "db.local:3306");
    assert_eq!(doc.db_control.dbname, "shop");
    assert_eq!(doc.db_control.password, "secret");
    assert_eq!(doc.db_control.schema, "");
    Ok(())
}

#[tokio::test]
async fn test_legacy_categories_and_field_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[("main.xml", MAIN), ("common.xml", COMMON), ("billing.yaml", BILLING)],
    )
    .await?;

    let doc = SchemaLoader::new().load(dir.path().join("main.xml")).await?;

    let state = doc.entity("State").ok_or("State missing")?;
    assert_eq!(state.kind, EntityKind::Enum);
    assert_eq!(state.fields[1].name, "Closed");
    assert_eq!(state.fields[1].value, 2);
    assert_eq!(state.fields[1].category, Some(FieldCategory::Int));
    assert_eq!(state.fields[1].field_type, "int");

    let order = doc.entity("Order").ok_or("Order missing")?;
    assert_eq!(order.inherits.as_deref(), Some("Base"));
    assert!(order.fields[0].primary);
    assert_eq!(order.fields[1].field_size, Some(512));

    let invoice = doc.entity("Invoice").ok_or("Invoice missing")?;
    assert!(invoice.fields[0].auto_id);
    Ok(())
}

#[tokio::test]
async fn test_nested_includes_resolve_from_root_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[
            ("root.xml", "<doc namespace=\"n\"><include>parts/a.xml</include></doc>"),
            ("parts/a.xml", "<doc><include>parts/b.json</include><define name=\"A\"/></doc>"),
            ("parts/b.json", r#"{"entities": [{"name": "B", "type": "class"}]}"#),
        ],
    )
    .await?;

    let doc = SchemaLoader::new().load(dir.path().join("root.xml")).await?;
    let names: Vec<_> = doc.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    Ok(())
}

#[tokio::test]
async fn test_include_cycle_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[
            ("a.xml", "<doc><include>b.xml</include></doc>"),
            ("b.xml", "<doc><include>a.xml</include></doc>"),
        ],
    )
    .await?;

    let err = SchemaLoader::new()
        .load(dir.path().join("a.xml"))
        .await
        .unwrap_err();
    match err {
        ModelGenError::ImportError { reason, .. } => {
            assert!(reason.contains("include cycle"), "{reason}");
        }
        other => panic!("expected ImportError, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_broken_include_names_the_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[
            ("main.xml", "<doc><include>bad.xml</include></doc>"),
            ("bad.xml", "<doc><define name=\"X\"><field name=\"A\" fromversion=\"soon\"/></define></doc>"),
        ],
    )
    .await?;

    let err = SchemaLoader::new()
        .load(dir.path().join("main.xml"))
        .await
        .unwrap_err();
    match err {
        ModelGenError::ImportError { import, reason } => {
            assert_eq!(import, "bad.xml");
            assert!(reason.contains("fromversion"), "{reason}");
        }
        other => panic!("expected ImportError, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_default_format_applies_to_unknown_extensions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(&dir, &[("model.def", "namespace: plain\nentities: []\n")]).await?;

    let settings = LoaderSettings {
        default_format: "yaml".to_string(),
        ..LoaderSettings::default()
    };
    let loader = SchemaLoader::with_settings(Arc::new(TokioFileSystemAdapter::new()), &settings);
    let doc = loader.load(dir.path().join("model.def")).await?;
    assert_eq!(doc.namespace, "plain");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_fields_load_and_are_reported_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    write_tree(
        &dir,
        &[(
            "dup.xml",
            r#"<doc namespace="dup">
  <define type="class" name="User">
    <field name="ID" type="int"/>
    <field name="Name" type="string"/>
    <field name="Name" type="string"/>
  </define>
</doc>
"#,
        )],
    )
    .await?;

    let doc = SchemaLoader::new().load(dir.path().join("dup.xml")).await?;
    assert_eq!(doc.entities[0].fields.len(), 3);

    let output = CodeGenerationService::new()
        .generate_file(dir.path().join("dup.xml"), &GeneratorConfig::default())
        .await?;
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].entity, "User");
    Ok(())
}
