use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod guidance;
pub mod layout;
pub mod report;
pub mod resource;
pub mod scanner;
pub mod schema_loader;
pub mod security;

pub use catalog::{
    BuildOptions, BuildOutcome, Catalog, Collections, VerifyOptions, build_catalog,
    verify_catalog,
};
pub use guidance::{QueryMatch, match_query};
pub use layout::LibraryLayout;
pub use report::{Discrepancy, VerificationReport};
pub use resource::{Meta, MetaNormalizer, Resource, ResourceKind, compare_names};
pub use scanner::{ResourceDir, ScanError, ScanOutcome, ScannedResource, scan_kind};
pub use schema_loader::{MetaSchema, SchemaViolation};
pub use security::{Finding, PatternConfig, PatternSet};

const ROOT_ENV: &str = "CATALOG_GUARD_ROOT";

fn is_library_root(candidate: &Path) -> bool {
    candidate.join(layout::LIBRARY_DIR).is_dir()
}

fn library_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_library_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_library_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root that holds `library/`.
///
/// Order: `CATALOG_GUARD_ROOT`, the working directory and its ancestors, the
/// executable's directory and its ancestors, then the compile-time hint.
pub fn find_library_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = library_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("CATALOG_GUARD_ROOT_HINT") {
        if let Some(root) = library_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a directory containing '{}/'. Pass --root or set {ROOT_ENV}.",
        layout::LIBRARY_DIR
    );
}

/// Use `explicit` when given, otherwise discover the root.
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(root) => {
            if !root.is_dir() {
                bail!("root {} is not a directory", root.display());
            }
            Ok(root)
        }
        None => find_library_root(),
    }
}
