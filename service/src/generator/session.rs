//! Per-run generation state
//!
//! A [`GenerationSession`] is created for every generation run and passed by `&mut` to each
//! generator. It carries the fetch helper naming state shared by persistence generators and
//! collects entity scoped diagnostics.

use std::fmt;
use tracing::{error, warn};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Generation continued with a degraded result
    Warning,
    /// Output for the entity was withheld
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Entity scoped problem found during generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Entity the problem belongs to
    pub entity: String,
    /// Severity
    pub severity: Severity,
    /// Description
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.entity, self.message)
    }
}

/// Run-scoped generation context
#[derive(Debug, Default)]
pub struct GenerationSession {
    fetch_helper_claimed: bool,
    diagnostics: Vec<Diagnostic>,
}

impl GenerationSession {
    /// Start a fresh run
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the row fetch helper for `entity`
    ///
    /// The first persisted entity of a run gets the bare `base` name; once one has completed,
    /// later entities get `base` suffixed with their own name.
    #[must_use]
    pub fn fetch_helper_name(&self, base: &str, entity: &str) -> String {
        if self.fetch_helper_claimed {
            format!("{base}{entity}")
        } else {
            base.to_string()
        }
    }

    /// Record that a persisted entity finished generating
    pub fn complete_persisted_entity(&mut self) {
        self.fetch_helper_claimed = true;
    }

    /// Record a warning
    pub fn warn(&mut self, entity: &str, message: impl Into<String>) {
        self.record(entity, Severity::Warning, message.into());
    }

    /// Record an error
    pub fn error(&mut self, entity: &str, message: impl Into<String>) {
        self.record(entity, Severity::Error, message.into());
    }

    fn record(&mut self, entity: &str, severity: Severity, message: String) {
        let diagnostic = Diagnostic {
            entity: entity.to_string(),
            severity,
            message,
        };
        if self.diagnostics.contains(&diagnostic) {
            return;
        }

        match severity {
            Severity::Warning => warn!(entity, "{}", diagnostic.message),
            Severity::Error => error!(entity, "{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics recorded so far
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the session, keeping its diagnostics
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Whether any error was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}
