//! CLI type definitions

use clap::{ArgAction, Parser, ValueEnum};
use modelgen_core::{GeneratorConfig, LoaderSettings, ModelGenError, PersistenceFilter, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::parser::SchemaFormat;

/// Persistence output file used when none is configured
pub const DEFAULT_OUTPUT_DB: &str = "db.go";

/// `modelgen` command-line interface
#[derive(Parser, Debug, Clone)]
#[command(
    name = "modelgen",
    version,
    about = "Generate model, persistence and table creation code from schema documents"
)]
pub struct ModelGenCli {
    /// Emit one file per entity (not supported)
    #[arg(short = 's', long)]
    pub split: bool,

    /// Generate JSON/XML converters on model classes
    #[arg(short = 'c', long)]
    pub converters: bool,

    /// Emit DROP TABLE before each CREATE TABLE
    #[arg(short = 'd', long)]
    pub drop: bool,

    /// Target language (go, ts, cpp)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Generate upgrade statements for fields introduced at or after this version
    #[arg(short = 'f', long, value_name = "VERSION")]
    pub from_version: Option<u32>,

    /// Skip getters and setters
    #[arg(long)]
    pub no_accessors: bool,

    /// Generate persistence code for all classes, or only those given as `-p=A,B`
    #[arg(
        short = 'p',
        long,
        value_name = "CLASS[,CLASS..]|-",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "-",
        value_parser = parse_persistence
    )]
    pub persistence: Option<PersistenceFilter>,

    /// Prefix for table names
    #[arg(short = 'P', long)]
    pub table_prefix: Option<String>,

    /// Increase logging verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Model output file, stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Persistence output file
    #[arg(short = 'O', long)]
    pub output_db: Option<PathBuf>,

    /// Table statement output file, stdout when omitted
    #[arg(long)]
    pub output_ddl: Option<PathBuf>,

    /// Project configuration file (toml, yaml or json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Format of schema files without a known extension
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Root schema document
    pub input: PathBuf,
}

fn parse_persistence(value: &str) -> std::result::Result<PersistenceFilter, String> {
    value.parse().map_err(|e: ModelGenError| e.to_string())
}

/// Schema input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// XML schema
    Xml,
    /// YAML schema
    Yaml,
    /// JSON schema
    Json,
}

impl From<InputFormat> for SchemaFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Xml => Self::Xml,
            InputFormat::Yaml => Self::Yaml,
            InputFormat::Json => Self::Json,
        }
    }
}

/// Per-project defaults read from a configuration file
///
/// Command line flags take precedence over every value here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Generator options
    pub generator: GeneratorConfig,
    /// Loader options
    pub loader: LoaderSettings,
    /// Model output file
    pub output: Option<PathBuf>,
    /// Persistence output file
    pub output_db: Option<PathBuf>,
    /// Table statement output file
    pub output_ddl: Option<PathBuf>,
}

impl ProjectConfig {
    /// Parse configuration text, choosing the format from the extension of `path`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown extensions or invalid content
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parsed = match extension.as_str() {
            "toml" => toml::from_str(content).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(content).map_err(|e| e.to_string()),
            other => Err(format!("unsupported config file extension '{other}'")),
        };

        parsed.map_err(|reason| {
            ModelGenError::config(format!("{}: {reason}", path.display()))
        })
    }
}

/// Fully resolved settings of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Generator options
    pub generator: GeneratorConfig,
    /// Loader options
    pub loader: LoaderSettings,
    /// Model output file, stdout when `None`
    pub output: Option<PathBuf>,
    /// Persistence output file
    pub output_db: PathBuf,
    /// Table statement output file, stdout when `None`
    pub output_ddl: Option<PathBuf>,
}

impl ModelGenCli {
    /// Layer the flags over `project`
    #[must_use]
    pub fn settings(&self, project: ProjectConfig) -> Settings {
        let ProjectConfig {
            mut generator,
            mut loader,
            output,
            output_db,
            output_ddl,
        } = project;

        generator.split_in_files |= self.split;
        generator.converters |= self.converters;
        generator.generate_drop |= self.drop;
        if self.no_accessors {
            generator.accessors = false;
        }
        if let Some(language) = &self.language {
            generator.language.clone_from(language);
        }
        if let Some(version) = self.from_version {
            generator.from_version = version;
        }
        if let Some(filter) = &self.persistence {
            generator.persistence = filter.clone();
            generator.generate_persistence = true;
        }
        if let Some(prefix) = &self.table_prefix {
            generator.table_prefix.clone_from(prefix);
        }
        generator.verbose = generator.verbose.max(self.verbose);
        generator.source_name = self.input.display().to_string();

        if let Some(format) = self.format {
            loader.default_format = SchemaFormat::from(format).to_string();
        }

        Settings {
            generator,
            loader,
            output: self.output.clone().or(output),
            output_db: self
                .output_db
                .clone()
                .or(output_db)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DB)),
            output_ddl: self.output_ddl.clone().or(output_ddl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_persistence_flag_forms() {
        let cli = ModelGenCli::try_parse_from(["modelgen", "-p", "shop.xml"]).unwrap();
        assert_eq!(cli.persistence, Some(PersistenceFilter::All));
        assert_eq!(cli.input, PathBuf::from("shop.xml"));

        let cli = ModelGenCli::try_parse_from(["modelgen", "shop.xml", "-p=-"]).unwrap();
        assert_eq!(cli.persistence, Some(PersistenceFilter::All));

        let cli = ModelGenCli::try_parse_from(["modelgen", "-p=User,Group", "shop.xml"]).unwrap();
        assert_eq!(
            cli.persistence,
            Some(PersistenceFilter::Classes(vec!["User".to_string(), "Group".to_string()]))
        );

        let cli = ModelGenCli::try_parse_from(["modelgen", "shop.xml"]).unwrap();
        assert_eq!(cli.persistence, None);
    }

    #[test]
    fn test_verbosity_counts_and_conflicts_with_quiet() {
        let cli = ModelGenCli::try_parse_from(["modelgen", "-vvv", "shop.xml"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(ModelGenCli::try_parse_from(["modelgen", "-v", "-q", "shop.xml"]).is_err());
    }

    #[test]
    fn test_flags_override_project_config() {
        let project = ProjectConfig::parse(
            "output_db = \"persist.go\"\n[generator]\ntable_prefix = \"app_\"\nlanguage = \"ts\"\n",
            Path::new("modelgen.toml"),
        )
        .unwrap();
        assert_eq!(project.generator.table_prefix, "app_");

        let cli = ModelGenCli::try_parse_from([
            "modelgen", "-l", "go", "-d", "--no-accessors", "shop.xml",
        ])
        .unwrap();
        let settings = cli.settings(project);
        assert_eq!(settings.generator.language, "go");
        assert_eq!(settings.generator.table_prefix, "app_");
        assert!(settings.generator.generate_drop);
        assert!(!settings.generator.accessors);
        assert!(!settings.generator.generate_persistence);
        assert_eq!(settings.output_db, PathBuf::from("persist.go"));
        assert_eq!(settings.generator.source_name, "shop.xml");
    }

    #[test]
    fn test_defaults_without_config() {
        let cli = ModelGenCli::try_parse_from(["modelgen", "--format", "yaml", "schema"]).unwrap();
        let settings = cli.settings(ProjectConfig::default());
        assert_eq!(settings.output_db, PathBuf::from(DEFAULT_OUTPUT_DB));
        assert_eq!(settings.loader.default_format, "yaml");
        assert_eq!(settings.output, None);
    }

    #[test]
    fn test_unknown_config_extension() {
        let err = ProjectConfig::parse("", Path::new("modelgen.ini")).unwrap_err();
        assert!(matches!(err, ModelGenError::ConfigError(_)));
    }
}
