//! Go model generation
//!
//! Classes become structs embedding their base type, with getters and setters. List setters
//! and copy getters allocate fresh slices so a stored value never aliases a caller's slice.
//! Enums become `int64` constants with a value to name map.

use modelgen_core::{AccessMethod, Document, Entity, EntityKind, GeneratorConfig, TypeResolver};
use std::fmt::Write;
use tracing::debug;

use crate::generator::base::{ImportManager, generated_banner, qualified_element};
use crate::generator::session::GenerationSession;
use crate::generator::traits::{Generator, GeneratorResult, GeneratorRole};

/// Go model generator
#[derive(Debug, Default, Clone, Copy)]
pub struct GoModelGenerator;

impl GoModelGenerator {
    /// Create a new Go model generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn header(doc: &Document, config: &GeneratorConfig) -> GeneratorResult<String> {
        let mut out = String::new();
        writeln!(out, "package {}", doc.namespace)?;
        writeln!(out)?;

        let mut imports = ImportManager::new();
        for import in &doc.imports {
            imports.add_declared(import);
        }
        if config.converters {
            imports.add("bytes");
            imports.add("encoding/json");
            imports.add("encoding/xml");
        }
        let block = imports.go_imports()?;
        if !block.is_empty() {
            writeln!(out, "{block}")?;
        }

        out.push_str(&generated_banner("//", &config.source_name)?);
        writeln!(out)?;
        Ok(out)
    }

    fn generate_class(
        entity: &Entity,
        doc: &Document,
        config: &GeneratorConfig,
    ) -> GeneratorResult<String> {
        let resolver = TypeResolver::language(doc);
        let mut out = String::new();

        writeln!(out, "//")?;
        writeln!(out, "// {} is generated", entity.name)?;
        writeln!(out, "//")?;
        writeln!(out, "type {} struct {{", entity.name)?;
        if let Some(base) = &entity.inherits {
            writeln!(out, "  {base}")?;
            writeln!(out)?;
        }
        for field in &entity.fields {
            let element = qualified_element(field, &resolver.resolve(field), "*");
            let list = if field.is_list { "[]" } else { "" };
            writeln!(out, "  {} {list}{element}", field.name)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        if config.accessors {
            for method in entity.access_methods(&resolver) {
                Self::write_accessors(&mut out, &entity.name, &method)?;
            }
        }

        if config.converters {
            Self::write_converters(&mut out, &entity.name)?;
        }

        Ok(out)
    }

    fn write_accessors(out: &mut String, owner: &str, method: &AccessMethod) -> GeneratorResult<()> {
        let name = &method.name;
        let element = if method.is_pointer {
            format!("*{}", method.type_name)
        } else {
            method.type_name.clone()
        };

        if method.getter {
            if method.is_list {
                writeln!(out, "func (this *{owner}) Get{name}AsRef() []{element} {{")?;
                writeln!(out, "  return this.{name}[:len(this.{name})]")?;
                writeln!(out, "}}")?;
                writeln!(out)?;

                writeln!(out, "func (this *{owner}) Get{name}AsCopy() []{element} {{")?;
                writeln!(out, "  newSlice := make([]{element}, len(this.{name}))")?;
                writeln!(out, "  copy(newSlice, this.{name})")?;
                writeln!(out, "  return newSlice")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
            } else {
                writeln!(out, "func (this *{owner}) Get{name}() {element} {{")?;
                writeln!(out, "  return this.{name}")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
            }
        }

        if method.setter {
            if method.is_list {
                writeln!(out, "func (this *{owner}) Set{name}(value []{element}) {{")?;
                writeln!(out, "  this.{name} = make([]{element}, len(value))")?;
                writeln!(out, "  copy(this.{name}, value)")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
            } else {
                writeln!(out, "func (this *{owner}) Set{name}(value {element}) {{")?;
                writeln!(out, "  this.{name} = value")?;
                writeln!(out, "}}")?;
                writeln!(out)?;
            }
        }

        Ok(())
    }

    fn write_converters(out: &mut String, owner: &str) -> GeneratorResult<()> {
        for (format, package) in [("JSON", "json"), ("XML", "xml")] {
            writeln!(
                out,
                "// To{format} creates a {format} representation of the data for the type"
            )?;
            writeln!(out, "func (this *{owner}) To{format}() string {{")?;
            writeln!(out, "  b, err := {package}.MarshalIndent(this, \"\", \"    \")")?;
            writeln!(out, "  if err != nil {{")?;
            writeln!(out, "    return \"\"")?;
            writeln!(out, "  }}")?;
            writeln!(out, "  return bytes.NewBuffer(b).String()")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        for (format, package) in [("JSON", "json"), ("XML", "xml")] {
            let arg = format!("{package}data");
            writeln!(
                out,
                "// {owner}From{format} converts a {format} representation to the type"
            )?;
            writeln!(out, "func {owner}From{format}({arg} string) (*{owner}, error) {{")?;
            writeln!(out, "  var value {owner}")?;
            writeln!(out, "  err := {package}.Unmarshal([]byte({arg}), &value)")?;
            writeln!(out, "  if err != nil {{")?;
            writeln!(out, "    return nil, err")?;
            writeln!(out, "  }}")?;
            writeln!(out, "  return &value, nil")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        Ok(())
    }

    fn generate_enum(entity: &Entity) -> GeneratorResult<String> {
        let name = &entity.name;
        let mut out = String::new();

        writeln!(out, "type {name} int64")?;
        writeln!(out)?;
        writeln!(out, "const (")?;
        for member in &entity.fields {
            writeln!(out, "  {} {name} = {}", member.name, member.value)?;
        }
        writeln!(out, ")")?;
        writeln!(out)?;

        writeln!(out, "var map{name}ToName = map[{name}]string{{")?;
        for member in &entity.fields {
            writeln!(out, "  {}: \"{}\",", member.value, member.name)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "func (this {name}) String() string {{")?;
        writeln!(out, "  return map{name}ToName[this]")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        Ok(out)
    }
}

impl Generator for GoModelGenerator {
    fn name(&self) -> &str {
        "go-model"
    }

    fn role(&self) -> GeneratorRole {
        GeneratorRole::Model
    }

    fn generate(
        &self,
        doc: &Document,
        config: &GeneratorConfig,
        session: &mut GenerationSession,
    ) -> GeneratorResult<String> {
        let mut out = Self::header(doc, config)?;

        for entity in &doc.entities {
            debug!(entity = %entity.name, kind = %entity.kind, "generating go model");
            match &entity.kind {
                EntityKind::Class => out.push_str(&Self::generate_class(entity, doc, config)?),
                EntityKind::Enum => out.push_str(&Self::generate_enum(entity)?),
                EntityKind::Unknown(kind) => {
                    session.warn(&entity.name, format!("can't generate code for type '{kind}'"));
                }
            }
        }

        Ok(out)
    }
}
