//! Discrepancies and the verification report.
//!
//! Each `Discrepancy` renders as one report line. The report is valid only
//! when no fatal error occurred and no discrepancy was recorded.

use crate::resource::ResourceKind;
use crate::scanner::ScanError;
use crate::schema_loader::SchemaViolation;
use crate::security::Finding;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Discrepancy {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{} {name}: Schema validation failed: {}", .kind.label(), join(.violations, "; "))]
    Schema {
        kind: ResourceKind,
        name: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("{} {name}: Potential security issues detected: {}", .kind.label(), join(.findings, ", "))]
    Security {
        kind: ResourceKind,
        name: String,
        findings: Vec<Finding>,
    },

    #[error("{} {name}: no content file ending in {}", .kind.label(), .kind.content_suffix())]
    MissingContent { kind: ResourceKind, name: String },

    #[error("{} {name}: Failed to read content file: {message}", .kind.label())]
    UnreadableContent {
        kind: ResourceKind,
        name: String,
        message: String,
    },

    #[error("{} \"{name}\" in catalog but not found in filesystem", .kind.label())]
    NotInFilesystem { kind: ResourceKind, name: String },

    #[error("Path mismatch for \"{name}\": expected \"{expected}\", got \"{actual}\"")]
    PathMismatch {
        kind: ResourceKind,
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Meta mismatch for \"{name}\"")]
    MetaMismatch { kind: ResourceKind, name: String },

    #[error("{} \"{name}\" exists in filesystem but missing from catalog", .kind.label())]
    MissingFromCatalog { kind: ResourceKind, name: String },

    #[error("{} in catalog are not sorted by name", .kind.plural_label())]
    Unsorted { kind: ResourceKind },

    #[error("{} \"{name}\" appears more than once in catalog", .kind.label())]
    Duplicate { kind: ResourceKind, name: String },

    #[error("{} entry #{index} in catalog is malformed: {message}", .kind.label())]
    MalformedEntry {
        kind: ResourceKind,
        index: usize,
        message: String,
    },

    #[error("Catalog member \"prompts.{}\" must be an array", .kind.dir_name())]
    MalformedCollection { kind: ResourceKind },

    #[error("Agent guidance in catalog does not match the guidance document")]
    GuidanceMismatch,

    #[error("Failed to read agent guidance: {message}")]
    UnreadableGuidance { message: String },
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Outcome of one verification run.
#[derive(Debug, Default)]
pub struct VerificationReport {
    /// Set when the catalog could not be read at all; no other check ran.
    pub fatal: Option<String>,
    pub discrepancies: Vec<Discrepancy>,
}

impl VerificationReport {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            fatal: Some(message.into()),
            discrepancies: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.fatal.is_none() && self.discrepancies.is_empty()
    }

    /// Report lines without the header.
    pub fn lines(&self) -> Vec<String> {
        self.fatal
            .iter()
            .cloned()
            .chain(self.discrepancies.iter().map(ToString::to_string))
            .collect()
    }

    /// Text printed by `validate-catalog`.
    pub fn render(&self) -> String {
        if self.is_valid() {
            return "Validation passed: catalog.json matches the library files\n".to_string();
        }
        let mut out = String::from("Validation failed:\n");
        for line in self.lines() {
            out.push_str("- ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
