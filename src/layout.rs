//! On-disk layout of a resource library.
//!
//! Everything the builder and verifier read or write is addressed through a
//! `LibraryLayout` rooted at the repository root. Individual paths (catalog,
//! schema) can be overridden so CLI flags and tests can point at fixtures.

use crate::resource::ResourceKind;
use std::path::{Component, Path, PathBuf};

pub const LIBRARY_DIR: &str = "library";
pub const META_FILE: &str = "_meta.json";
pub const GUIDANCE_FILE: &str = "agent-guidance.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const META_SCHEMA_PATH: &str = "schemas/instruction-meta.schema.json";

#[derive(Clone, Debug)]
pub struct LibraryLayout {
    root: PathBuf,
    catalog: Option<PathBuf>,
    schema: Option<PathBuf>,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            catalog: None,
            schema: None,
        }
    }

    /// Override the catalog location (defaults to `<root>/catalog.json`).
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    /// Override the metadata schema location.
    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema = Some(path.into());
        self
    }

    pub fn library_dir(&self) -> PathBuf {
        self.root.join(LIBRARY_DIR)
    }

    pub fn kind_dir(&self, kind: ResourceKind) -> PathBuf {
        self.library_dir().join(kind.dir_name())
    }

    pub fn guidance_path(&self) -> PathBuf {
        self.library_dir().join(GUIDANCE_FILE)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| self.root.join(CATALOG_FILE))
    }

    pub fn schema_path(&self) -> PathBuf {
        self.schema
            .clone()
            .unwrap_or_else(|| self.root.join(META_SCHEMA_PATH))
    }

    /// Render `path` relative to the root with `/` separators.
    ///
    /// Paths outside the root are rendered as-is so a misconfigured override
    /// still produces a stable (if unhelpful) string rather than an error.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }
}
