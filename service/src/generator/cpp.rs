//! C++ model generation
//!
//! Emits a single header. Types resolve through the generic mapping table rules tagged `cpp`.

use modelgen_core::{AccessMethod, Document, Entity, EntityKind, GeneratorConfig, TypeResolver};
use std::fmt::Write;
use tracing::debug;

use super::base::generated_banner;
use super::session::GenerationSession;
use super::traits::{Generator, GeneratorResult, GeneratorRole};

/// Language identifier of the C++ target
pub const LANGUAGE_ID: &str = "cpp";

/// C++ model generator
#[derive(Debug, Default, Clone, Copy)]
pub struct CppGenerator;

impl CppGenerator {
    /// Create a new C++ generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn generate_enum(entity: &Entity) -> GeneratorResult<String> {
        let name = &entity.name;
        let mut out = String::new();

        writeln!(out, "enum class {name} : int64_t {{")?;
        for member in &entity.fields {
            writeln!(out, "  {} = {},", member.name, member.value)?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;

        writeln!(out, "inline std::string ToString({name} value) {{")?;
        writeln!(out, "  switch (value) {{")?;
        for member in &entity.fields {
            writeln!(
                out,
                "    case {name}::{}: return \"{}\";",
                member.name, member.name
            )?;
        }
        writeln!(out, "  }}")?;
        writeln!(out, "  return \"\";")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        Ok(out)
    }

    fn member_type(method: &AccessMethod) -> String {
        let element = if method.is_pointer {
            format!("{}*", method.type_name)
        } else {
            method.type_name.clone()
        };
        if method.is_list {
            format!("std::vector<{element}>")
        } else {
            element
        }
    }

    fn generate_class(
        entity: &Entity,
        resolver: &TypeResolver<'_>,
        config: &GeneratorConfig,
    ) -> GeneratorResult<String> {
        let mut out = String::new();
        match &entity.inherits {
            Some(base) => writeln!(out, "class {} : public {base} {{", entity.name)?,
            None => writeln!(out, "class {} {{", entity.name)?,
        }
        writeln!(out, "public:")?;

        let methods = entity.access_methods(resolver);
        if config.accessors {
            for method in &methods {
                Self::write_accessors(&mut out, method)?;
            }
            writeln!(out)?;
            writeln!(out, "private:")?;
        }

        for method in &methods {
            writeln!(out, "  {} {}_;", Self::member_type(method), method.name)?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        Ok(out)
    }

    fn write_accessors(out: &mut String, method: &AccessMethod) -> GeneratorResult<()> {
        let name = &method.name;
        let ty = Self::member_type(method);

        if method.is_list {
            writeln!(out, "  const {ty}& Get{name}AsRef() const {{ return {name}_; }}")?;
            writeln!(out, "  {ty} Get{name}AsCopy() const {{ return {name}_; }}")?;
            writeln!(out, "  void Set{name}(const {ty}& value) {{ {name}_ = {ty}(value); }}")?;
        } else {
            writeln!(out, "  {ty} Get{name}() const {{ return {name}_; }}")?;
            writeln!(out, "  void Set{name}({ty} value) {{ {name}_ = value; }}")?;
        }
        Ok(())
    }
}

impl Generator for CppGenerator {
    fn name(&self) -> &str {
        "cpp"
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
        let resolver = TypeResolver::for_language(doc, LANGUAGE_ID);
        let mut out = generated_banner("//", &config.source_name)?;
        writeln!(out, "#pragma once")?;
        writeln!(out)?;
        writeln!(out, "#include <cstdint>")?;
        writeln!(out, "#include <string>")?;
        writeln!(out, "#include <vector>")?;
        writeln!(out)?;

        let namespace = doc.namespace.trim();
        if !namespace.is_empty() {
            writeln!(out, "namespace {namespace} {{")?;
            writeln!(out)?;
        }

        for entity in &doc.entities {
            debug!(entity = %entity.name, "generating c++ model");
            match &entity.kind {
                EntityKind::Class => {
                    out.push_str(&Self::generate_class(entity, &resolver, config)?);
                }
                EntityKind::Enum => out.push_str(&Self::generate_enum(entity)?),
                EntityKind::Unknown(kind) => {
                    session.warn(&entity.name, format!("can't generate code for type '{kind}'"));
                }
            }
        }

        if !namespace.is_empty() {
            writeln!(out, "}}  // namespace {namespace}")?;
        }
        Ok(out)
    }
}
