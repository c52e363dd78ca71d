//! Resource kinds, catalog records, and the shared name ordering.

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Normalized metadata mapping as persisted in the catalog.
pub type Meta = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Instruction,
    Prompt,
    Skill,
}

impl ResourceKind {
    /// Every kind, in catalog member order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Instruction,
        ResourceKind::Prompt,
        ResourceKind::Skill,
    ];

    /// Directory under `library/`; also the member key inside the catalog.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceKind::Instruction => "instructions",
            ResourceKind::Prompt => "prompts",
            ResourceKind::Skill => "skills",
        }
    }

    pub fn content_suffix(self) -> &'static str {
        match self {
            ResourceKind::Instruction => ".instructions.md",
            ResourceKind::Prompt => ".prompts.md",
            ResourceKind::Skill => ".skills.md",
        }
    }

    /// Capitalized singular used at the start of report lines.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Instruction => "Instruction",
            ResourceKind::Prompt => "Prompt",
            ResourceKind::Skill => "Skill",
        }
    }

    /// Capitalized plural used for collection-level report lines.
    pub fn plural_label(self) -> &'static str {
        match self {
            ResourceKind::Instruction => "Instructions",
            ResourceKind::Prompt => "Prompts",
            ResourceKind::Skill => "Skills",
        }
    }

    /// Whether metadata of this kind must satisfy the metadata schema.
    pub fn schema_checked(self) -> bool {
        matches!(self, ResourceKind::Instruction | ResourceKind::Prompt)
    }

    pub fn normalizer(self) -> MetaNormalizer {
        match self {
            ResourceKind::Instruction | ResourceKind::Prompt => MetaNormalizer::STRICT,
            ResourceKind::Skill => MetaNormalizer::BASIC,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self {
            ResourceKind::Instruction => "instruction",
            ResourceKind::Prompt => "prompt",
            ResourceKind::Skill => "skill",
        };
        f.write_str(noun)
    }
}

/// Fixed set of metadata keys dropped before comparison or persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaNormalizer {
    excluded: &'static [&'static str],
}

impl MetaNormalizer {
    pub const SCHEMA_REF: &'static str = "$schema";
    pub const AUTHOR: &'static str = "author";

    /// Drops only the schema reference.
    pub const BASIC: MetaNormalizer = MetaNormalizer {
        excluded: &[Self::SCHEMA_REF],
    };

    /// Drops the schema reference and authorship.
    pub const STRICT: MetaNormalizer = MetaNormalizer {
        excluded: &[Self::SCHEMA_REF, Self::AUTHOR],
    };

    pub fn normalize(&self, meta: &Meta) -> Meta {
        meta.iter()
            .filter(|(key, _)| !self.excluded.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// One catalog record. Field order is the persisted key order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub path: String,
    pub meta: Meta,
}

/// Root-locale collator at tertiary strength, built once.
static ROOT_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            log::warn!("root collator unavailable ({err}); ordering names by bytes");
            None
        }
    }
});

/// Locale-aware name ordering shared by the builder and the verifier.
///
/// Names collate under the root locale (punctuation and symbols before
/// digits before letters, accents secondary, lower-case before upper-case);
/// names the collator considers equal fall back to raw bytes so the order is
/// total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let collated = ROOT_COLLATOR
        .as_ref()
        .map_or(Ordering::Equal, |collator| collator.compare(a, b));
    collated.then_with(|| a.cmp(b))
}

pub fn sort_by_name(resources: &mut [Resource]) {
    resources.sort_by(|a, b| compare_names(&a.name, &b.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Meta {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn strict_normalizer_drops_schema_and_author() {
        let raw = meta(json!({
            "$schema": "../../schemas/instruction-meta.schema.json",
            "author": "someone",
            "description": "d",
            "tags": ["a", "b"]
        }));
        let normalized = MetaNormalizer::STRICT.normalize(&raw);
        assert_eq!(
            Value::Object(normalized),
            json!({"description": "d", "tags": ["a", "b"]})
        );
    }

    #[test]
    fn basic_normalizer_keeps_author() {
        let raw = meta(json!({"$schema": "x", "author": "someone"}));
        let normalized = MetaNormalizer::BASIC.normalize(&raw);
        assert_eq!(Value::Object(normalized), json!({"author": "someone"}));
    }

    #[test]
    fn names_compare_under_root_locale() {
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("Beta", "alpha"), Ordering::Greater);
        assert_eq!(compare_names("npm", "npm-workspaces"), Ordering::Less);
        assert_eq!(compare_names("react", "React"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
        // accents are secondary: éclair sits with the e's, not after z
        assert_eq!(compare_names("éclair", "fig"), Ordering::Less);
        assert_eq!(compare_names("eclair", "éclair"), Ordering::Less);
        // punctuation < symbols < digits < letters
        assert_eq!(compare_names("a_b", "a-c"), Ordering::Less);
        assert_eq!(compare_names("a-c", "a~"), Ordering::Less);
        assert_eq!(compare_names("a~", "a1"), Ordering::Less);
        assert_eq!(compare_names("a1", "ab"), Ordering::Less);
    }

    #[test]
    fn sort_by_name_matches_locale_compare() {
        let mut resources: Vec<Resource> = ["a-c", "a_b", "éclair", "fig", "ab", "a~", "a1"]
            .iter()
            .map(|name| Resource {
                name: name.to_string(),
                path: String::new(),
                meta: Meta::new(),
            })
            .collect();
        sort_by_name(&mut resources);
        let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a_b", "a-c", "a~", "a1", "ab", "éclair", "fig"]);
    }

    #[test]
    fn sort_by_name_orders_mixed_case() {
        let mut resources: Vec<Resource> = ["zeta", "Alpha", "beta"]
            .iter()
            .map(|name| Resource {
                name: name.to_string(),
                path: String::new(),
                meta: Meta::new(),
            })
            .collect();
        sort_by_name(&mut resources);
        let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }
}
