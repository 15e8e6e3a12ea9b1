//! Non-fatal findings collected while planning.
//!
//! A run always produces a (possibly partial) plan together with the list of
//! diagnostics explaining why something was left out. Diagnostics are never
//! turned into errors; the collector is passed explicitly through the
//! pipeline and keeps insertion order.

use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A listed method matches no catalog entry
    UnknownMethod,
    /// A subject or projection target could not be resolved
    UnresolvedType,
    /// Projection types without projection methods, or the reverse
    InconsistentConfiguration,
    /// Use of the legacy per-field annotation
    Deprecated,
    /// A source file could not be parsed and was skipped
    ParseFailure,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownMethod => "unknown-method",
            Self::UnresolvedType => "unresolved-type",
            Self::InconsistentConfiguration => "inconsistent-configuration",
            Self::Deprecated => "deprecated",
            Self::ParseFailure => "parse-failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Declared type the finding belongs to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Append-only, ordered collector.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        type_name: Option<&str>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        debug!(kind = kind.as_str(), %message, "diagnostic");
        self.items.push(Diagnostic {
            kind,
            type_name: type_name.map(str::to_string),
            message,
        });
    }

    /// Shorthand for findings attached to a declared type.
    pub fn report(&mut self, kind: DiagnosticKind, type_name: &str, message: impl Into<String>) {
        self.push(kind, Some(type_name), message);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|d| d.message.clone()).collect()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
