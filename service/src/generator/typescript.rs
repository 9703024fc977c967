//! TypeScript model generation
//!
//! Types resolve through the generic mapping table rules tagged `ts`.

use modelgen_core::{AccessMethod, Document, Entity, EntityKind, GeneratorConfig, TypeResolver};
use std::fmt::Write;
use tracing::debug;

use super::base::{BaseCodeFormatter, generated_banner};
use super::session::GenerationSession;
use super::traits::{Generator, GeneratorResult, GeneratorRole};

/// Language identifier of the TypeScript target
pub const LANGUAGE_ID: &str = "ts";

/// TypeScript model generator
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    /// Create a new TypeScript generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn generate_enum(entity: &Entity) -> GeneratorResult<String> {
        let name = &entity.name;
        let mut out = String::new();

        writeln!(out, "export enum {name} {{")?;
        for member in &entity.fields {
            writeln!(out, "  {} = {},", member.name, member.value)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "export const {name}ToName: Record<number, string> = {{")?;
        for member in &entity.fields {
            writeln!(
                out,
                "  {}: \"{}\",",
                member.value,
                BaseCodeFormatter::escape_string(&member.name)
            )?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;

        writeln!(
            out,
            "export function {}ToString(value: {name}): string {{",
            BaseCodeFormatter::to_camel_case(name)
        )?;
        writeln!(out, "  return {name}ToName[value] ?? \"\";")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        Ok(out)
    }

    fn generate_class(
        entity: &Entity,
        resolver: &TypeResolver<'_>,
        config: &GeneratorConfig,
    ) -> GeneratorResult<String> {
        let mut out = String::new();
        match &entity.inherits {
            Some(base) => writeln!(out, "export class {} extends {base} {{", entity.name)?,
            None => writeln!(out, "export class {} {{", entity.name)?,
        }

        let methods = entity.access_methods(resolver);
        for method in &methods {
            writeln!(out, "  {}!: {};", method.name, Self::member_type(method))?;
        }

        if config.accessors {
            for method in &methods {
                writeln!(out)?;
                Self::write_accessors(&mut out, method)?;
            }
        }

        writeln!(out, "}}")?;
        writeln!(out)?;
        Ok(out)
    }

    fn member_type(method: &AccessMethod) -> String {
        let element = if method.is_pointer {
            format!("{} | null", method.type_name)
        } else {
            method.type_name.clone()
        };
        match (method.is_list, method.is_pointer) {
            (true, true) => format!("({element})[]"),
            (true, false) => format!("{element}[]"),
            (false, _) => element,
        }
    }

    fn write_accessors(out: &mut String, method: &AccessMethod) -> GeneratorResult<()> {
        let name = &method.name;
        let ty = Self::member_type(method);

        if method.is_list {
            writeln!(out, "  get{name}AsRef(): {ty} {{")?;
            writeln!(out, "    return this.{name};")?;
            writeln!(out, "  }}")?;
            writeln!(out)?;
            writeln!(out, "  get{name}AsCopy(): {ty} {{")?;
            writeln!(out, "    return [...this.{name}];")?;
            writeln!(out, "  }}")?;
            writeln!(out)?;
            writeln!(out, "  set{name}(value: {ty}): void {{")?;
            writeln!(out, "    this.{name} = [...value];")?;
            writeln!(out, "  }}")?;
        } else {
            writeln!(out, "  get{name}(): {ty} {{")?;
            writeln!(out, "    return this.{name};")?;
            writeln!(out, "  }}")?;
            writeln!(out)?;
            writeln!(out, "  set{name}(value: {ty}): void {{")?;
            writeln!(out, "    this.{name} = value;")?;
            writeln!(out, "  }}")?;
        }
        Ok(())
    }
}

impl Generator for TypeScriptGenerator {
    fn name(&self) -> &str {
        "typescript"
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
        writeln!(out, "// This file has been generated by modelgen - do NOT edit!")?;
        writeln!(out)?;

        for entity in &doc.entities {
            debug!(entity = %entity.name, "generating typescript model");
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

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_core::{Field, TypeMapping};

    fn run(doc: &Document, config: &GeneratorConfig) -> String {
        let mut session = GenerationSession::new();
        TypeScriptGenerator::new()
            .generate(doc, config, &mut session)
            .unwrap()
    }

    #[test]
    fn test_enum_output() {
        let doc = Document {
            entities: vec![Entity::enumeration(
                "OrderState",
                vec![Field::member("Open", 1), Field::member("Closed", 2)],
            )],
            ..Document::default()
        };
        let code = run(&doc, &GeneratorConfig::default());
        assert!(code.contains("export enum OrderState {\n  Open = 1,\n  Closed = 2,\n}\n"));
        assert!(code.contains("export function orderStateToString(value: OrderState): string {"));
        assert!(code.contains("  1: \"Open\",\n"));
    }

    #[test]
    fn test_class_uses_ts_tagged_mappings() {
        let mut user = Entity::class(
            "User",
            vec![
                Field::new("ID", "int"),
                Field::new("Tags", "string").list(),
            ],
        );
        user.inherits = Some("Base".to_string());
        let doc = Document {
            entities: vec![user],
            any_type_mappings: vec![
                TypeMapping::new("int", "int64_t").for_lang("cpp"),
                TypeMapping::new("int", "number").for_lang("ts"),
            ],
            ..Document::default()
        };
        let code = run(&doc, &GeneratorConfig::default());
        assert!(code.contains("export class User extends Base {\n  ID!: number;\n  Tags!: string[];\n"));
        assert!(code.contains("  getTagsAsCopy(): string[] {\n    return [...this.Tags];\n  }\n"));
        assert!(code.contains("  setTags(value: string[]): void {\n    this.Tags = [...value];\n  }\n"));
        assert!(code.contains("  getID(): number {"));
    }

    #[test]
    fn test_banner_present() {
        let code = run(&Document::default(), &GeneratorConfig::default());
        assert!(code.contains("// This file has been generated by modelgen - do NOT edit!\n"));
    }
}
