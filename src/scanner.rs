//! Resource discovery for one resource-type directory.
//!
//! Discovery is split in two: `list_resource_candidates` only answers "which
//! subdirectories carry a metadata file", and `load_resource` parses one
//! candidate. A candidate that fails to load is reported as a `ScanError`
//! and never hides its siblings.

use crate::layout::{LibraryLayout, META_FILE};
use crate::resource::{Meta, Resource, ResourceKind};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A subdirectory that contains a metadata file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDir {
    pub name: String,
    pub dir: PathBuf,
}

impl ResourceDir {
    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }
}

/// A loaded resource before normalization.
#[derive(Clone, Debug)]
pub struct ScannedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub dir: PathBuf,
    /// First file (by name) carrying the kind's content suffix.
    pub content: Option<PathBuf>,
    pub raw_meta: Meta,
}

impl ScannedResource {
    /// Catalog record for this resource; falls back to the directory path when
    /// there is no content file.
    pub fn to_resource(&self, layout: &LibraryLayout) -> Resource {
        let location = self.content.as_deref().unwrap_or(&self.dir);
        Resource {
            name: self.name.clone(),
            path: layout.relative(location),
            meta: self.kind.normalizer().normalize(&self.raw_meta),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Error listing {kind} directory {}: {message}", .dir.display())]
    Listing {
        kind: ResourceKind,
        dir: PathBuf,
        message: String,
    },
    #[error("Error processing {kind} {name}: {message}")]
    Entry {
        kind: ResourceKind,
        name: String,
        message: String,
    },
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Successfully loaded resources, in directory-name order.
    pub resources: Vec<ScannedResource>,
    pub errors: Vec<ScanError>,
}

/// List subdirectories of `root` that contain a metadata file.
///
/// A missing root yields an empty list. Entries are returned in byte-wise
/// name order.
pub fn list_resource_candidates(root: &Path) -> Result<Vec<ResourceDir>> {
    if !root.is_dir() {
        log::debug!("{} does not exist; no resources", root.display());
        return Ok(Vec::new());
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("reading {}", root.display()))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to read entry under {}: {err}", root.display());
                continue;
            }
        };
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            log::warn!("Skipping non UTF-8 directory {}", entry.path().display());
            continue;
        };
        let candidate = ResourceDir {
            name,
            dir: entry.path(),
        };
        if candidate.meta_path().is_file() {
            candidates.push(candidate);
        } else {
            log::debug!("Skipping {} (no {META_FILE})", candidate.dir.display());
        }
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Parse one candidate's metadata and locate its content file.
pub fn load_resource(kind: ResourceKind, candidate: &ResourceDir) -> Result<ScannedResource> {
    let meta_path = candidate.meta_path();
    let raw = fs::read_to_string(&meta_path)
        .with_context(|| format!("reading {}", meta_path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", meta_path.display()))?;
    let Value::Object(raw_meta) = value else {
        bail!("{} must contain a JSON object", meta_path.display());
    };
    let content = find_content_file(&candidate.dir, kind.content_suffix())?;

    Ok(ScannedResource {
        kind,
        name: candidate.name.clone(),
        dir: candidate.dir.clone(),
        content,
        raw_meta,
    })
}

fn find_content_file(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(suffix) {
                matches.push(name.to_string());
            }
        }
    }
    matches.sort();
    Ok(matches.into_iter().next().map(|name| dir.join(name)))
}

/// Scan every resource of `kind` under the layout's library directory.
pub fn scan_kind(layout: &LibraryLayout, kind: ResourceKind) -> ScanOutcome {
    let root = layout.kind_dir(kind);
    let candidates = match list_resource_candidates(&root) {
        Ok(candidates) => candidates,
        Err(err) => {
            return ScanOutcome {
                resources: Vec::new(),
                errors: vec![ScanError::Listing {
                    kind,
                    dir: root,
                    message: format!("{err:#}"),
                }],
            };
        }
    };

    let mut outcome = ScanOutcome::default();
    for candidate in &candidates {
        match load_resource(kind, candidate) {
            Ok(resource) => outcome.resources.push(resource),
            Err(err) => outcome.errors.push(ScanError::Entry {
                kind,
                name: candidate.name.clone(),
                message: format!("{err:#}"),
            }),
        }
    }
    log::debug!(
        "Found {} {kind} resources under {}",
        outcome.resources.len(),
        root.display()
    );
    outcome
}
