//! Persisted catalog shape and its (de)serialization.

use crate::resource::{Resource, ResourceKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Guidance document, copied verbatim.
    pub agent_guidance: Value,
    pub prompts: Collections,
}

/// One sorted collection per resource kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub instructions: Vec<Resource>,
    #[serde(default)]
    pub prompts: Vec<Resource>,
    #[serde(default)]
    pub skills: Vec<Resource>,
}

impl Collections {
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut Vec<Resource> {
        match kind {
            ResourceKind::Instruction => &mut self.instructions,
            ResourceKind::Prompt => &mut self.prompts,
            ResourceKind::Skill => &mut self.skills,
        }
    }
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            agent_guidance: Value::Object(Map::new()),
            prompts: Collections::default(),
        }
    }

    /// Deterministic text form: two-space indentation, sorted object keys,
    /// trailing newline.
    pub fn render(&self) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(self).context("serializing catalog")?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Replace `path` with the rendered catalog in one rename.
    pub fn write(&self, path: &Path) -> Result<()> {
        let rendered = self.render()?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("staging catalog in {}", parent.display()))?;
        staged
            .write_all(rendered.as_bytes())
            .context("writing staged catalog")?;
        staged
            .persist(path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Read the guidance document; a missing file is an empty object.
pub fn read_guidance(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}
