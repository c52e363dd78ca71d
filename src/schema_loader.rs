//! Metadata schema loading and validation.
//!
//! The schema document is opaque to this crate: it is read from disk,
//! compiled once, and used as a `validate(value)` capability that reports
//! every violation with the offending instance path.

use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// One schema violation: where in the metadata, and which constraint failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaViolation {
    pub instance_path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{path}: {}", self.message)
    }
}

/// Compiled metadata schema.
pub struct MetaSchema {
    compiled: JSONSchema,
}

impl MetaSchema {
    pub fn load(path: &Path) -> Result<Self> {
        let raw: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_value(&raw).with_context(|| format!("compiling schema {}", path.display()))
    }

    pub fn from_value(schema: &Value) -> Result<Self> {
        // The compile error borrows the schema, so render it before returning.
        let compiled = JSONSchema::compile(schema).map_err(|err| anyhow!("{err}"))?;
        Ok(Self { compiled })
    }

    /// Validate `instance`, returning every violation on failure.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<SchemaViolation>> {
        match self.compiled.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|err| SchemaViolation {
                    instance_path: err.instance_path.to_string(),
                    message: err.to_string(),
                })
                .collect()),
        }
    }
}
