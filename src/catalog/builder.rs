//! Catalog generation from the library on disk.

use crate::catalog::model::{Catalog, read_guidance};
use crate::layout::LibraryLayout;
use crate::report::Discrepancy;
use crate::resource::{ResourceKind, sort_by_name};
use crate::scanner::scan_kind;
use crate::schema_loader::MetaSchema;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Default)]
pub struct BuildOptions<'a> {
    /// When set, schema-checked kinds drop resources whose metadata fails it.
    pub schema: Option<&'a MetaSchema>,
}

/// A built catalog plus every per-entry problem hit while building it.
#[derive(Debug)]
pub struct BuildOutcome {
    pub catalog: Catalog,
    pub issues: Vec<Discrepancy>,
}

pub fn build_catalog(layout: &LibraryLayout, options: BuildOptions<'_>) -> BuildOutcome {
    let mut issues = Vec::new();

    let agent_guidance = match read_guidance(&layout.guidance_path()) {
        Ok(guidance) => guidance,
        Err(err) => {
            issues.push(Discrepancy::UnreadableGuidance {
                message: format!("{err:#}"),
            });
            Value::Object(Map::new())
        }
    };

    let mut catalog = Catalog {
        agent_guidance,
        prompts: Default::default(),
    };

    for kind in ResourceKind::ALL {
        let scanned = scan_kind(layout, kind);
        issues.extend(scanned.errors.into_iter().map(Discrepancy::from));

        let collection = catalog.prompts.get_mut(kind);
        for resource in scanned.resources {
            if let (Some(schema), true) = (options.schema, kind.schema_checked()) {
                if let Err(violations) = schema.validate(&Value::Object(resource.raw_meta.clone()))
                {
                    issues.push(Discrepancy::Schema {
                        kind,
                        name: resource.name.clone(),
                        violations,
                    });
                    continue;
                }
            }
            collection.push(resource.to_resource(layout));
        }
        sort_by_name(collection);
    }

    for issue in &issues {
        log::warn!("{issue}");
    }

    BuildOutcome { catalog, issues }
}
