//! Keyword matching of a user query against a catalog.
//!
//! This is the consumer side of `agentGuidance`: a query is matched first
//! against the curated `matchingExamples`, then against instruction names
//! and tags.

use crate::catalog::Catalog;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

const EXAMPLE_PREFIX_WORDS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingExample {
    #[serde(default)]
    pub user_query: String,
    #[serde(default)]
    pub matching_instructions: Vec<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryMatch {
    /// First curated example whose query contains the query's leading words.
    pub example: Option<MatchingExample>,
    /// Instructions matched by name or tag, excluding those the example named.
    pub keyword_matches: Vec<String>,
}

impl QueryMatch {
    pub fn is_empty(&self) -> bool {
        self.example.is_none() && self.keyword_matches.is_empty()
    }
}

pub fn matching_examples(guidance: &Value) -> Vec<MatchingExample> {
    guidance
        .get("matchingExamples")
        .cloned()
        .and_then(|examples| serde_json::from_value(examples).ok())
        .unwrap_or_default()
}

pub fn match_query(catalog: &Catalog, query: &str) -> QueryMatch {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let prefix = words
        .iter()
        .take(EXAMPLE_PREFIX_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let example = if prefix.is_empty() {
        None
    } else {
        matching_examples(&catalog.agent_guidance)
            .into_iter()
            .find(|example| example.user_query.to_lowercase().contains(&prefix))
    };

    let keywords: BTreeSet<&str> = words.iter().copied().collect();
    let mut already: BTreeSet<String> = example
        .iter()
        .flat_map(|example| example.matching_instructions.iter().cloned())
        .collect();

    let mut keyword_matches = Vec::new();
    for instruction in &catalog.prompts.instructions {
        let name_hit = keywords.contains(instruction.name.to_lowercase().as_str());
        let tag_hit = tags(&instruction.meta)
            .any(|tag| keywords.contains(tag.to_lowercase().as_str()));
        if (name_hit || tag_hit) && already.insert(instruction.name.clone()) {
            keyword_matches.push(instruction.name.clone());
        }
    }

    QueryMatch {
        example,
        keyword_matches,
    }
}

/// String entries of `meta.tags`; anything else is ignored.
pub fn tags(meta: &serde_json::Map<String, Value>) -> impl Iterator<Item = &str> {
    meta.get("tags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
