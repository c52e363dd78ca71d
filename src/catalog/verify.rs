//! Independent verification of a persisted catalog against the library.
//!
//! The verifier re-derives every collection from disk and diffs it against
//! the catalog file. Apart from an unreadable catalog, nothing short-circuits:
//! every resource is schema-checked and content-scanned, and every
//! collection is diffed, so one run reports all drift at once.

use crate::catalog::model::read_guidance;
use crate::layout::LibraryLayout;
use crate::report::{Discrepancy, VerificationReport};
use crate::resource::{Resource, ResourceKind, compare_names};
use crate::scanner::{ScanError, ScannedResource, scan_kind};
use crate::schema_loader::MetaSchema;
use crate::security::PatternSet;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[derive(Clone, Copy)]
pub struct VerifyOptions<'a> {
    pub schema: &'a MetaSchema,
    pub patterns: &'a PatternSet,
}

/// Resources of one kind as they should appear in the catalog.
#[derive(Debug, Default)]
struct Expected {
    resources: BTreeMap<String, Resource>,
    /// Present on disk but excluded (unparsable or schema-invalid); already
    /// reported, so a catalog entry naming one is not a ghost.
    rejected: BTreeSet<String>,
}

pub fn verify_catalog(layout: &LibraryLayout, options: VerifyOptions<'_>) -> VerificationReport {
    let catalog_path = layout.catalog_path();
    if !catalog_path.is_file() {
        return VerificationReport::fatal(format!("{} does not exist", catalog_path.display()));
    }
    let raw = match fs::read_to_string(&catalog_path) {
        Ok(raw) => raw,
        Err(err) => {
            return VerificationReport::fatal(format!(
                "Failed to read {}: {err}",
                catalog_path.display()
            ));
        }
    };
    let persisted: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            return VerificationReport::fatal(format!(
                "Failed to parse {}: {err}",
                catalog_path.display()
            ));
        }
    };

    let mut discrepancies = Vec::new();
    for kind in ResourceKind::ALL {
        let expected = expected_resources(layout, kind, options, &mut discrepancies);
        let entries = persisted_entries(&persisted, kind, &mut discrepancies);
        diff_collection(kind, &expected, &entries, &mut discrepancies);
    }
    check_guidance(layout, &persisted, &mut discrepancies);

    VerificationReport {
        fatal: None,
        discrepancies,
    }
}

fn expected_resources(
    layout: &LibraryLayout,
    kind: ResourceKind,
    options: VerifyOptions<'_>,
    out: &mut Vec<Discrepancy>,
) -> Expected {
    let scanned = scan_kind(layout, kind);
    let mut expected = Expected::default();

    for error in scanned.errors {
        if let ScanError::Entry { name, .. } = &error {
            expected.rejected.insert(name.clone());
        }
        out.push(error.into());
    }

    for resource in scanned.resources {
        let schema_ok = !kind.schema_checked() || check_schema(&resource, options.schema, out);
        check_content(&resource, options.patterns, out);
        if schema_ok {
            expected
                .resources
                .insert(resource.name.clone(), resource.to_resource(layout));
        } else {
            expected.rejected.insert(resource.name.clone());
        }
    }
    expected
}

fn check_schema(resource: &ScannedResource, schema: &MetaSchema, out: &mut Vec<Discrepancy>) -> bool {
    match schema.validate(&Value::Object(resource.raw_meta.clone())) {
        Ok(()) => true,
        Err(violations) => {
            out.push(Discrepancy::Schema {
                kind: resource.kind,
                name: resource.name.clone(),
                violations,
            });
            false
        }
    }
}

fn check_content(resource: &ScannedResource, patterns: &PatternSet, out: &mut Vec<Discrepancy>) {
    let kind = resource.kind;
    let name = resource.name.clone();
    let Some(path) = &resource.content else {
        out.push(Discrepancy::MissingContent { kind, name });
        return;
    };
    match fs::read_to_string(path) {
        Ok(text) => {
            let findings = patterns.scan(&text);
            if !findings.is_empty() {
                out.push(Discrepancy::Security {
                    kind,
                    name,
                    findings,
                });
            }
        }
        Err(err) => out.push(Discrepancy::UnreadableContent {
            kind,
            name,
            message: format!("{}: {err}", path.display()),
        }),
    }
}

fn persisted_entries(
    persisted: &Value,
    kind: ResourceKind,
    out: &mut Vec<Discrepancy>,
) -> Vec<Resource> {
    let Some(member) = persisted
        .get("prompts")
        .and_then(|collections| collections.get(kind.dir_name()))
    else {
        return Vec::new();
    };
    let Value::Array(items) = member else {
        out.push(Discrepancy::MalformedCollection { kind });
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<Resource>(item.clone()) {
                Ok(resource) => Some(resource),
                Err(err) => {
                    out.push(Discrepancy::MalformedEntry {
                        kind,
                        index,
                        message: err.to_string(),
                    });
                    None
                }
            },
        )
        .collect()
}

fn diff_collection(
    kind: ResourceKind,
    expected: &Expected,
    entries: &[Resource],
    out: &mut Vec<Discrepancy>,
) {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            out.push(Discrepancy::Duplicate {
                kind,
                name: entry.name.clone(),
            });
            continue;
        }
        let Some(actual) = expected.resources.get(&entry.name) else {
            if !expected.rejected.contains(&entry.name) {
                out.push(Discrepancy::NotInFilesystem {
                    kind,
                    name: entry.name.clone(),
                });
            }
            continue;
        };
        if entry.path != actual.path {
            out.push(Discrepancy::PathMismatch {
                kind,
                name: entry.name.clone(),
                expected: actual.path.clone(),
                actual: entry.path.clone(),
            });
        }
        if entry.meta != actual.meta {
            out.push(Discrepancy::MetaMismatch {
                kind,
                name: entry.name.clone(),
            });
        }
    }

    for name in expected.resources.keys() {
        if !seen.contains(name.as_str()) {
            out.push(Discrepancy::MissingFromCatalog {
                kind,
                name: name.clone(),
            });
        }
    }

    let unsorted = entries
        .windows(2)
        .any(|pair| compare_names(&pair[0].name, &pair[1].name) == Ordering::Greater);
    if unsorted {
        out.push(Discrepancy::Unsorted { kind });
    }
}

fn check_guidance(layout: &LibraryLayout, persisted: &Value, out: &mut Vec<Discrepancy>) {
    match read_guidance(&layout.guidance_path()) {
        Ok(expected) => {
            let actual = persisted
                .get("agentGuidance")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            if actual != expected {
                out.push(Discrepancy::GuidanceMismatch);
            }
        }
        Err(err) => out.push(Discrepancy::UnreadableGuidance {
            message: format!("{err:#}"),
        }),
    }
}
