//! Component inventory exported as JSON by a host process or build system.

use crate::ComponentSource;
use anyhow::Context;
use camino::Utf8PathBuf;
use modguard_domain::model::{ComponentInventory, DependencyRef, RawComponent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct InventoryEntry {
    identity: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// `[{"identity": "...", "dependencies": ["..."]}]` read from disk.
#[derive(Clone, Debug)]
pub struct InventoryFile {
    path: Utf8PathBuf,
}

impl InventoryFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ComponentSource for InventoryFile {
    fn describe(&self) -> String {
        format!("inventory file {}", self.path)
    }

    fn load_inventory(&self) -> anyhow::Result<ComponentInventory> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path))?;
        parse_inventory(&text).with_context(|| format!("parse {}", self.path))
    }
}

pub fn parse_inventory(text: &str) -> anyhow::Result<ComponentInventory> {
    let entries: Vec<InventoryEntry> = serde_json::from_str(text)?;
    let components = entries
        .into_iter()
        .map(|e| RawComponent {
            identity: e.identity,
            dependencies: e
                .dependencies
                .iter()
                .map(|d| DependencyRef::named(d))
                .collect(),
        })
        .collect();
    Ok(ComponentInventory { components })
}
