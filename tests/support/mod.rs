#![allow(dead_code)]

// Temporary resource-library fixtures shared by the integration tests.

use anyhow::{Context, Result};
use catalog_guard::{
    BuildOptions, BuildOutcome, LibraryLayout, MetaSchema, PatternSet, ResourceKind,
    VerificationReport, VerifyOptions, build_catalog, verify_catalog,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHEMA_REF: &str = "../../../schemas/instruction-meta.schema.json";

pub fn meta_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["description", "tags"],
        "properties": {
            "$schema": {"type": "string"},
            "author": {"type": "string"},
            "description": {"type": "string"},
            "tags": {"type": "array", "items": {"type": "string"}}
        }
    })
}

pub fn valid_meta(description: &str, tags: &[&str]) -> Value {
    json!({
        "$schema": SCHEMA_REF,
        "author": "fixture author",
        "description": description,
        "tags": tags,
    })
}

pub struct Library {
    dir: TempDir,
}

impl Library {
    /// Empty library with the metadata schema installed.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("creating fixture library")?;
        fs::create_dir_all(dir.path().join("library"))?;
        let schema_path = dir.path().join("schemas/instruction-meta.schema.json");
        fs::create_dir_all(schema_path.parent().unwrap())?;
        fs::write(&schema_path, serde_json::to_string_pretty(&meta_schema())?)?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> LibraryLayout {
        LibraryLayout::new(self.root())
    }

    pub fn resource_dir(&self, kind: ResourceKind, name: &str) -> PathBuf {
        self.layout().kind_dir(kind).join(name)
    }

    /// Add a resource with metadata and a content file named after it.
    pub fn add(&self, kind: ResourceKind, name: &str, meta: &Value, body: &str) -> Result<PathBuf> {
        let dir = self.add_meta_only(kind, name, meta)?;
        let content = dir.join(format!("{name}{}", kind.content_suffix()));
        fs::write(&content, body)?;
        Ok(content)
    }

    pub fn add_valid(&self, kind: ResourceKind, name: &str) -> Result<PathBuf> {
        self.add(
            kind,
            name,
            &valid_meta(&format!("{name} guidance"), &[name]),
            &format!("# {name}\n\nFollow the project conventions.\n"),
        )
    }

    pub fn add_meta_only(&self, kind: ResourceKind, name: &str, meta: &Value) -> Result<PathBuf> {
        let dir = self.resource_dir(kind, name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("_meta.json"), serde_json::to_string_pretty(meta)?)?;
        Ok(dir)
    }

    pub fn write_raw_meta(&self, kind: ResourceKind, name: &str, raw: &str) -> Result<()> {
        let dir = self.resource_dir(kind, name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("_meta.json"), raw)?;
        Ok(())
    }

    pub fn remove(&self, kind: ResourceKind, name: &str) -> Result<()> {
        fs::remove_dir_all(self.resource_dir(kind, name))?;
        Ok(())
    }

    pub fn write_guidance(&self, guidance: &Value) -> Result<()> {
        fs::write(
            self.layout().guidance_path(),
            serde_json::to_string_pretty(guidance)?,
        )?;
        Ok(())
    }

    pub fn schema(&self) -> Result<MetaSchema> {
        MetaSchema::load(&self.layout().schema_path())
    }

    pub fn build(&self) -> Result<BuildOutcome> {
        let schema = self.schema()?;
        Ok(build_catalog(
            &self.layout(),
            BuildOptions {
                schema: Some(&schema),
            },
        ))
    }

    /// Build with schema filtering and write the catalog; returns its text.
    pub fn generate(&self) -> Result<String> {
        let outcome = self.build()?;
        let path = self.layout().catalog_path();
        outcome.catalog.write(&path)?;
        Ok(fs::read_to_string(&path)?)
    }

    pub fn verify(&self) -> Result<VerificationReport> {
        let schema = self.schema()?;
        let patterns = PatternSet::standard()?;
        Ok(verify_catalog(
            &self.layout(),
            VerifyOptions {
                schema: &schema,
                patterns: &patterns,
            },
        ))
    }

    pub fn catalog_json(&self) -> Result<Value> {
        let raw = fs::read_to_string(self.layout().catalog_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_catalog_json(&self, value: &Value) -> Result<()> {
        fs::write(
            self.layout().catalog_path(),
            serde_json::to_string_pretty(value)?,
        )?;
        Ok(())
    }
}

pub fn lines(report: &VerificationReport) -> Vec<String> {
    report.lines()
}
