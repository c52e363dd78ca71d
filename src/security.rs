//! Content-security scanning for resource bodies.
//!
//! Two independent checks run over the whole text: known prompt-injection
//! phrasings, and invisible or control characters that can smuggle content
//! past a human reviewer. Each pattern contributes at most one finding (its
//! first match). The pattern lists live in a `PatternConfig` value that is
//! compiled into a `PatternSet` and handed to whoever scans, so alternate
//! sets can be loaded from disk or substituted in tests.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

const DEFAULT_INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+(?:all\s+)?previous\s+instructions?",
    r"forget\s+(?:all\s+)?previous\s+(?:instructions?|rules)",
    r"system\s+prompt",
    r"override\s+(?:the\s+)?system",
    r"new\s+important\s+instruction",
    r"bypass\s+(?:the\s+)?restriction",
    r"jailbreak",
    r"developer\s+mode",
    r"admin\s+mode",
    r"unrestricted",
    r"uncensored",
    // persona override
    r"DAN\s+mode",
    r"assistant.*override",
];

const DEFAULT_HIDDEN_PATTERNS: &[&str] = &[
    r"\x{200B}", // zero-width space
    r"\x{200C}", // zero-width non-joiner
    r"\x{200D}", // zero-width joiner
    r"\x{200E}", // left-to-right mark
    r"\x{200F}", // right-to-left mark
    r"\x{202A}", // left-to-right embedding
    r"\x{202B}", // right-to-left embedding
    r"\x{202C}", // pop directional formatting
    r"\x{202D}", // left-to-right override
    r"\x{202E}", // right-to-left override
    r"\x{FEFF}", // byte-order mark
    r"\x{00AD}", // soft hyphen
    // C0/C1 controls except tab, newline, carriage return
    r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x{9F}]",
];

/// Uncompiled pattern lists, serializable so alternate sets can live on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Matched case-insensitively.
    pub injection: Vec<String>,
    /// Matched as written; each match is reported by code point.
    pub hidden: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            injection: DEFAULT_INJECTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            hidden: DEFAULT_HIDDEN_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PatternConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening patterns {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| format!("parsing patterns {}", path.display()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    Injection { matched: String },
    HiddenCharacter { character: char },
}

impl Finding {
    /// Unpadded `U+<hex>` code point for hidden-character findings.
    pub fn code_point(&self) -> Option<String> {
        match self {
            Finding::HiddenCharacter { character } => Some(format!("U+{:X}", *character as u32)),
            Finding::Injection { .. } => None,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Injection { matched } => write!(f, "Injection pattern: {matched}"),
            Finding::HiddenCharacter { character } => write!(
                f,
                "Hidden character detected: {} (Unicode: U+{:X})",
                character.escape_unicode(),
                *character as u32
            ),
        }
    }
}

/// Compiled, immutable pattern set.
#[derive(Clone, Debug)]
pub struct PatternSet {
    injection: Vec<Regex>,
    hidden: Vec<Regex>,
}

impl PatternSet {
    pub fn from_config(config: &PatternConfig) -> Result<Self> {
        let injection = config
            .injection
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("compiling injection pattern {pattern:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        let hidden = config
            .hidden
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("compiling hidden-character pattern {pattern:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { injection, hidden })
    }

    /// The built-in pattern lists.
    pub fn standard() -> Result<Self> {
        Self::from_config(&PatternConfig::default())
    }

    /// Every finding in `text`, injection findings first, each in pattern order.
    pub fn scan(&self, text: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        for pattern in &self.injection {
            if let Some(found) = pattern.find(text) {
                findings.push(Finding::Injection {
                    matched: found.as_str().to_string(),
                });
            }
        }
        for pattern in &self.hidden {
            if let Some(character) = pattern.find(text).and_then(|m| m.as_str().chars().next()) {
                findings.push(Finding::HiddenCharacter { character });
            }
        }
        findings
    }
}
