//! Diagnostics collected while translating
//!
//! Warnings and recoverable MusicXML errors never stop a translation: they
//! are logged through `log` and recorded here so callers can show them with
//! their input line. Fatal problems are `TranslationError`s instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for a diagnostic
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Questionable but recoverable input, e.g. dynamics on a rest
    Warning,
    /// Value outside the MusicXML vocabulary; a default was used
    Error,
}

/// One reported problem, located in the input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    /// Name of the input source (file name, or "-")
    pub source_name: String,
    /// 1-based input line
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: DiagnosticSeverity,
        source_name: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            DiagnosticSeverity::Warning => "MusicXML warning",
            DiagnosticSeverity::Error => "MusicXML error",
        };
        write!(f, "{}:{}: {}: {}", self.source_name, self.line, label, self.message)
    }
}

/// Ordered collection of diagnostics for one translation
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a diagnostic and log it at the matching level
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Warning => log::warn!("{}", diagnostic),
            DiagnosticSeverity::Error => log::error!("{}", diagnostic),
        }
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add(diagnostic);
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether any diagnostic message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.items.iter().any(|d| d.message.contains(needle))
    }
}
