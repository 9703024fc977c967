//! XML parser for schema documents
//!
//! The document is first read into a small element tree with `quick-xml`, then mapped onto
//! the schema model. Element and attribute names follow the native schema layout:
//!
//! ```xml
//! <doc namespace="shop" dbschema="shop">
//!   <include>common.xml</include>
//!   <imports><package no_persistence="true">time</package></imports>
//!   <define type="class" name="Order" inherits="Base" dbschema="orders" nopersist="false">
//!     <field name="ID" type="guid" dbautoid="true"/>
//!     <string name="Note" dbsize="512"/>
//!   </define>
//!   <dbtypemappings><map from="guid" to="varchar(%d)" fieldsize="36"/></dbtypemappings>
//!   <gotypemappings>...</gotypemappings>
//!   <anytypemappings><map lang="ts" from="int" to="number"/></anytypemappings>
//!   <dbcontrol><host>localhost</host><user>shop</user></dbcontrol>
//! </doc>
//! ```
//!
//! Legacy categorized elements (`guid`, `string`, `bool`, `time`, `int`, `list`, `object`,
//! `enum`) inside a define are folded into the field list in document order.

use modelgen_core::{
    DbControl, Document, Entity, EntityKind, Field, FieldCategory, Import, Include, ModelGenError,
    Result, TypeMapping,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::trace;

use super::SchemaParser;

/// `XML` parser implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlParser;

/// Parsed element with attributes, children and text
#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<XmlElement>,
    text: Option<String>,
}

impl XmlElement {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn text(&self) -> String {
        self.text.as_deref().unwrap_or_default().trim().to_string()
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

impl XmlParser {
    /// Create a new `XML` parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn read_tree(content: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(Self::parse_element(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(completed) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(completed),
                            None => root = Some(completed),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| {
                        ModelGenError::parse_at(
                            format!("XML text unescape error: {err}"),
                            format!("byte {position}"),
                        )
                    })?;
                    if let Some(current) = stack.last_mut() {
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    if let Some(current) = stack.last_mut() {
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ModelGenError::parse_at(
                        format!("XML parse error: {e}"),
                        format!("byte {}", reader.buffer_position()),
                    ));
                }
                _ => {}
            }

            buf.clear();
        }

        if !stack.is_empty() {
            return Err(ModelGenError::parse("XML document ended inside an open element"));
        }

        root.ok_or_else(|| ModelGenError::parse("No root element found in XML"))
    }

    fn parse_element(e: &BytesStart) -> Result<XmlElement> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attributes = HashMap::new();

        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| ModelGenError::parse(format!("XML attribute error: {err}")))?;

            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| ModelGenError::parse(format!("XML attribute value error: {err}")))?
                .to_string();

            attributes.insert(key, value);
        }

        Ok(XmlElement {
            name,
            attributes,
            ..XmlElement::default()
        })
    }

    fn build_document(root: &XmlElement) -> Result<Document> {
        let mut doc = Document {
            namespace: root.attr("namespace").unwrap_or_default().to_string(),
            db_schema: root
                .attr("dbschema")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ..Document::default()
        };

        for child in &root.children {
            match child.name.as_str() {
                "include" => doc.includes.push(Include::new(child.text())),
                "imports" => {
                    for package in child.children_named("package") {
                        doc.imports.push(Import {
                            package: package.text(),
                            no_persistence: parse_attr::<bool>(package, "no_persistence")?
                                .unwrap_or(false),
                        });
                    }
                }
                "define" => doc.entities.push(Self::build_entity(child)?),
                "dbtypemappings" => doc.db_type_mappings.extend(Self::build_mappings(child)?),
                "gotypemappings" | "langtypemappings" => {
                    doc.lang_type_mappings.extend(Self::build_mappings(child)?);
                }
                "anytypemappings" => doc.any_type_mappings.extend(Self::build_mappings(child)?),
                "dbcontrol" => doc.db_control = Self::build_db_control(child),
                other => trace!(element = other, "ignoring unknown document element"),
            }
        }

        Ok(doc)
    }

    fn build_entity(element: &XmlElement) -> Result<Entity> {
        let name = element.attr("name").unwrap_or_default().to_string();
        let mut entity = Entity {
            kind: EntityKind::from(element.attr("type").unwrap_or("class")),
            inherits: element
                .attr("inherits")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            db_schema: element
                .attr("dbschema")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            skip_persistence: parse_attr::<bool>(element, "nopersist")?.unwrap_or(false),
            name,
            fields: Vec::new(),
        };

        for child in &element.children {
            let category = match child.name.as_str() {
                "field" => None,
                other => match FieldCategory::from_str(other) {
                    Ok(category) => Some(category),
                    Err(_) => {
                        trace!(entity = %entity.name, element = other, "ignoring unknown define element");
                        continue;
                    }
                },
            };
            let field = Self::build_field(child, category).map_err(|e| match e {
                ModelGenError::ParseError { message, .. } => {
                    ModelGenError::parse_at(message, format!("define '{}'", entity.name))
                }
                other => other,
            })?;
            entity.fields.push(field);
        }

        Ok(entity)
    }

    fn build_field(element: &XmlElement, category: Option<FieldCategory>) -> Result<Field> {
        let declared_type = element.attr("type").filter(|s| !s.is_empty());
        let field_type = match (declared_type, category) {
            (Some(ty), _) => ty.to_string(),
            (None, Some(category)) => category.keyword().to_string(),
            (None, None) => String::new(),
        };

        Ok(Field {
            name: element.attr("name").unwrap_or_default().to_string(),
            default: element.attr("default").map(str::to_string),
            value: parse_attr(element, "value")?.unwrap_or(0),
            db_size: parse_attr(element, "dbsize")?,
            field_size: parse_attr(element, "fieldsize")?,
            field_type,
            is_pointer: parse_attr(element, "ispointer")?.unwrap_or(false),
            is_list: parse_attr(element, "islist")?
                .unwrap_or(category == Some(FieldCategory::List)),
            from_version: parse_attr(element, "fromversion")?.unwrap_or(0),
            skip_persistence: parse_attr(element, "nopersist")?.unwrap_or(false),
            auto_id: parse_attr(element, "dbautoid")?.unwrap_or(false),
            primary: parse_attr(element, "primary")?.unwrap_or(false),
            category,
        })
    }

    fn build_mappings(element: &XmlElement) -> Result<Vec<TypeMapping>> {
        element
            .children_named("map")
            .map(|map| {
                Ok(TypeMapping {
                    lang: map.attr("lang").filter(|s| !s.is_empty()).map(str::to_string),
                    from: map.attr("from").unwrap_or_default().to_string(),
                    to: map.attr("to").unwrap_or_default().to_string(),
                    field_size: parse_attr(map, "fieldsize")?,
                })
            })
            .collect()
    }

    fn build_db_control(element: &XmlElement) -> DbControl {
        let mut control = DbControl::default();
        for child in &element.children {
            let value = child.text();
            match child.name.as_str() {
                "host" => control.host = value,
                "dbname" => control.dbname = value,
                "schema" => control.schema = value,
                "user" => control.user = value,
                "password" => control.password = value,
                other => trace!(element = other, "ignoring unknown dbcontrol element"),
            }
        }
        control
    }
}

/// Attribute values accepted in schema files
trait AttrValue: Sized {
    fn parse_attr(raw: &str) -> Option<Self>;
}

impl AttrValue for bool {
    fn parse_attr(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
            _ => None,
        }
    }
}

impl AttrValue for i64 {
    fn parse_attr(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl AttrValue for u32 {
    fn parse_attr(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

fn parse_attr<T: AttrValue>(element: &XmlElement, key: &str) -> Result<Option<T>> {
    match element.attr(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => T::parse_attr(raw).map(Some).ok_or_else(|| {
            ModelGenError::parse(format!(
                "invalid value '{raw}' for attribute '{key}' on <{}>",
                element.name
            ))
        }),
    }
}

impl SchemaParser for XmlParser {
    fn parse_str(&self, content: &str) -> Result<Document> {
        let root = Self::read_tree(content)?;
        Self::build_document(&root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHOP: &str = r#"<?xml version="1.0"?>
<doc namespace="shop" dbschema="shopdb">
  <include>common.xml</include>
  <imports>
    <package>time</package>
    <package no_persistence="true">uuid github.com/satori/go.uuid</package>
  </imports>
  <define type="class" name="Order" inherits="Base" dbschema="orders">
    <field name="ID" type="guid" dbautoid="true"/>
    <field name="Total" type="int" default="0" fromversion="2"/>
    <field name="Lines" type="OrderLine" islist="true" ispointer="true"/>
    <field name="Cache" type="string" nopersist="true"/>
  </define>
  <define type="enum" name="State">
    <int name="Open" value="1"/>
    <int name="Closed" value="2"/>
  </define>
  <dbtypemappings>
    <map from="guid" to="varchar(%d)" fieldsize="36"/>
  </dbtypemappings>
  <gotypemappings>
    <map from="guid" to="uuid.UUID"/>
  </gotypemappings>
  <anytypemappings>
    <map lang="ts" from="int" to="number"/>
  </anytypemappings>
  <dbcontrol>
    <host>localhost</host>
    <dbname>shop</dbname>
    <user>shopper</user>
    <password>s3cret</password>
  </dbcontrol>
</doc>
"#;

    #[test]
    fn test_parse_full_document() -> modelgen_core::Result<()> {
        let doc = XmlParser::new().parse_str(SHOP)?;

        assert_eq!(doc.namespace, "shop");
        assert_eq!(doc.schema_name(), "shopdb");
        assert_eq!(doc.includes, vec![Include::new("common.xml")]);
        assert_eq!(doc.imports.len(), 2);
        assert!(doc.imports[1].no_persistence);

        let order = doc.entity("Order").expect("Order is declared");
        assert_eq!(order.inherits.as_deref(), Some("Base"));
        assert_eq!(order.db_schema.as_deref(), Some("orders"));
        assert!(order.fields[0].auto_id);
        assert_eq!(order.fields[1].default.as_deref(), Some("0"));
        assert_eq!(order.fields[1].from_version, 2);
        assert!(order.fields[2].is_list && order.fields[2].is_pointer);
        assert!(order.fields[3].skip_persistence);
        assert_eq!(order.fields[0].default, None);

        assert_eq!(doc.db_type_mappings[0].field_size, Some(36));
        assert_eq!(doc.lang_type_mappings[0].to, "uuid.UUID");
        assert_eq!(doc.any_type_mappings[0].lang.as_deref(), Some("ts"));
        assert_eq!(doc.db_control.host, "localhost");
        assert_eq!(doc.db_control.password, "s3cret");
        Ok(())
    }

    #[test]
    fn test_legacy_category_elements_fold_into_fields() -> modelgen_core::Result<()> {
        let xml = r#"<doc namespace="n">
  <define type="class" name="User">
    <guid name="ID"/>
    <string name="Name" dbsize="64"/>
    <field name="Age" type="int"/>
    <list name="Groups" type="Group"/>
  </define>
</doc>"#;
        let doc = XmlParser::new().parse_str(xml)?;
        let user = &doc.entities[0];

        let names: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "Name", "Age", "Groups"]);
        assert_eq!(user.fields[0].field_type, "guid");
        assert_eq!(user.fields[0].category, Some(FieldCategory::Guid));
        assert_eq!(user.fields[1].db_size, Some(64));
        assert_eq!(user.fields[2].category, None);
        assert_eq!(user.fields[3].field_type, "Group");
        assert!(user.fields[3].is_list);
        Ok(())
    }

    #[test]
    fn test_explicit_empty_default_is_kept() -> modelgen_core::Result<()> {
        let xml = r#"<doc><define name="A"><field name="X" type="string" default=""/></define></doc>"#;
        let doc = XmlParser::new().parse_str(xml)?;
        assert_eq!(doc.entities[0].fields[0].default.as_deref(), Some(""));
        assert_eq!(doc.entities[0].kind, EntityKind::Class);
        Ok(())
    }

    #[test]
    fn test_unknown_entity_kind_is_preserved() -> modelgen_core::Result<()> {
        let xml = r#"<doc><define type="interface" name="Shape"/></doc>"#;
        let doc = XmlParser::new().parse_str(xml)?;
        assert_eq!(
            doc.entities[0].kind,
            EntityKind::Unknown("interface".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_invalid_number_attribute() {
        let xml = r#"<doc><define name="A"><field name="X" type="int" dbsize="big"/></define></doc>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dbsize"), "{message}");
    }

    #[test]
    fn test_malformed_xml() {
        let err = XmlParser::new()
            .parse_str("<doc><define name=\"A\"></doc>")
            .unwrap_err();
        assert!(matches!(err, ModelGenError::ParseError { .. }));
    }
}
