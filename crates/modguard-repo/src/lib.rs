//! Repository adapters: locate and read the module manifest, load component inventories.
//!
//! This crate is allowed to do filesystem IO. It never spawns processes or loads code.

#![forbid(unsafe_code)]

mod cargo;
mod discover;
mod inventory;
mod locate;
mod parse;
mod services;

use modguard_domain::model::ComponentInventory;

pub use cargo::CargoWorkspace;
pub use discover::discover_manifests;
pub use inventory::InventoryFile;
pub use locate::{ManifestLocation, executable_base_dir, solution_root};
pub use services::{ManifestError, load_services, parse_services};

/// Something that can list the application's components and their direct dependencies.
///
/// Every call returns a fresh snapshot.
pub trait ComponentSource {
    fn describe(&self) -> String;

    /// Whether this source could ever report a component with this identity.
    fn can_name(&self, _identity: &str) -> bool {
        true
    }

    fn load_inventory(&self) -> anyhow::Result<ComponentInventory>;
}

impl<T: ComponentSource + ?Sized> ComponentSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn can_name(&self, identity: &str) -> bool {
        (**self).can_name(identity)
    }

    fn load_inventory(&self) -> anyhow::Result<ComponentInventory> {
        (**self).load_inventory()
    }
}

/// Fuzz-friendly entry points. None of these touch the filesystem or panic on any input.
pub mod fuzz {
    use modguard_types::RepoPath;

    pub fn parse_services_manifest(bytes: &[u8]) -> anyhow::Result<usize> {
        Ok(crate::services::parse_services(bytes)?.len())
    }

    pub fn parse_inventory(text: &str) -> anyhow::Result<usize> {
        Ok(crate::inventory::parse_inventory(text)?.components.len())
    }

    pub fn parse_cargo_manifest(text: &str) -> anyhow::Result<()> {
        let path = RepoPath::new("Cargo.toml");
        let _ = crate::parse::parse_root_manifest(&path, text)?;
        let _ = crate::parse::parse_member_manifest(&path, text)?;
        Ok(())
    }

    /// Match workspace member globs against candidate paths.
    pub fn expand_globs(patterns: &[String], candidates: &[String]) -> anyhow::Result<Vec<String>> {
        let set = crate::discover::build_globset(patterns)?;
        Ok(candidates
            .iter()
            .filter(|c| set.is_match(c.as_str()))
            .cloned()
            .collect())
    }
}
