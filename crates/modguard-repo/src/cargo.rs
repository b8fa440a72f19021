use crate::discover::discover_manifests;
use crate::parse::{self, DepKind, PackageManifest};
use crate::ComponentSource;
use anyhow::Context;
use camino::Utf8PathBuf;
use modguard_domain::model::{ComponentInventory, DependencyRef, RawComponent};
use modguard_types::RepoPath;
use std::collections::BTreeMap;

/// Components are the packages of a Cargo workspace; identity is the package name.
#[derive(Clone, Debug)]
pub struct CargoWorkspace {
    root: Utf8PathBuf,
    include_dev: bool,
}

impl CargoWorkspace {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_dev: false,
        }
    }

    /// Count `[dev-dependencies]` as dependencies too.
    pub fn include_dev(mut self, yes: bool) -> Self {
        self.include_dev = yes;
        self
    }
}

/// Cargo package names are ASCII alphanumerics, `-` and `_`.
fn is_package_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ComponentSource for CargoWorkspace {
    fn describe(&self) -> String {
        format!("cargo workspace {}", self.root)
    }

    fn can_name(&self, identity: &str) -> bool {
        is_package_name(identity)
    }

    fn load_inventory(&self) -> anyhow::Result<ComponentInventory> {
        let manifests = discover_manifests(&self.root).context("discover manifests")?;

        let root_manifest = RepoPath::new("Cargo.toml");
        let root_abs = self.root.join(root_manifest.as_str());
        let root_text =
            std::fs::read_to_string(&root_abs).with_context(|| format!("read {root_abs}"))?;
        let (renames, root_model) = parse::parse_root_manifest(&root_manifest, &root_text)
            .context("parse root manifest")?;

        let mut components = Vec::new();
        components.extend(self.component_for(root_model, &renames));

        for path in manifests.into_iter().filter(|p| p.as_str() != "Cargo.toml") {
            let abs = self.root.join(path.as_str());
            let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
            match parse::parse_member_manifest(&path, &text) {
                Ok(model) => components.extend(self.component_for(model, &renames)),
                Err(err) => {
                    let error = format!("{err:#}");
                    tracing::warn!(manifest = %path, %error, "skipping unparsable member manifest");
                }
            }
        }

        let inventory = ComponentInventory { components };
        tracing::debug!(
            root = %self.root,
            components = inventory.components.len(),
            dependencies = inventory.dependency_count(),
            "loaded cargo inventory"
        );
        Ok(inventory)
    }
}

impl CargoWorkspace {
    fn component_for(
        &self,
        manifest: PackageManifest,
        renames: &BTreeMap<String, String>,
    ) -> Option<RawComponent> {
        let identity = manifest.package?;
        let dependencies = manifest
            .dependencies
            .into_iter()
            .filter(|d| self.include_dev || d.kind != DepKind::Dev)
            .map(|d| DependencyRef {
                identity: d.identity(renames),
                location: Some(d.location),
            })
            .collect();
        Some(RawComponent {
            identity,
            dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fs::{utf8_root, write_file};
    use camino::Utf8Path;
    use tempfile::TempDir;

    fn workspace(root: &Utf8Path) {
        write_file(
            &root.join("Cargo.toml"),
            r#"[workspace]
members = ["services/*"]

[workspace.dependencies]
catalog = { package = "app-catalog-contracts", path = "services/catalog-contracts" }
"#,
        );
        write_file(
            &root.join("services/catalog-contracts/Cargo.toml"),
            "[package]\nname = \"app-catalog-contracts\"\n",
        );
        write_file(
            &root.join("services/orders/Cargo.toml"),
            r#"[package]
name = "app-orders"

[dependencies]
catalog.workspace = true
serde = "1"

[dev-dependencies]
app-billing-contracts = { path = "../billing-contracts" }
"#,
        );
    }

    fn deps_of<'a>(inv: &'a ComponentInventory, id: &str) -> Vec<&'a str> {
        inv.components
            .iter()
            .find(|c| c.identity == id)
            .unwrap_or_else(|| panic!("component '{id}' should exist"))
            .dependencies
            .iter()
            .map(|d| d.identity.as_str())
            .collect()
    }

    #[test]
    fn packages_become_components_with_resolved_renames() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        workspace(&root);

        let inv = CargoWorkspace::new(root.clone())
            .load_inventory()
            .expect("load");

        let ids: Vec<&str> = inv.components.iter().map(|c| c.identity.as_str()).collect();
        assert_eq!(ids, vec!["app-catalog-contracts", "app-orders"]);
        assert_eq!(deps_of(&inv, "app-orders"), vec!["app-catalog-contracts", "serde"]);
    }

    #[test]
    fn dev_dependencies_only_when_requested() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        workspace(&root);

        let inv = CargoWorkspace::new(root.clone())
            .include_dev(true)
            .load_inventory()
            .expect("load");
        assert!(deps_of(&inv, "app-orders").contains(&"app-billing-contracts"));
    }

    #[test]
    fn dependency_locations_point_at_member_manifest() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        workspace(&root);

        let inv = CargoWorkspace::new(root).load_inventory().expect("load");
        let orders = inv
            .components
            .iter()
            .find(|c| c.identity == "app-orders")
            .expect("orders");
        let serde = orders
            .dependencies
            .iter()
            .find(|d| d.identity == "serde")
            .expect("serde");
        let loc = serde.location.as_ref().expect("location");
        assert_eq!(loc.path.as_str(), "services/orders/Cargo.toml");
        assert_eq!(loc.line, Some(6));
    }

    #[test]
    fn unparsable_member_is_skipped() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        workspace(&root);
        write_file(&root.join("services/broken/Cargo.toml"), "[package\n");

        let inv = CargoWorkspace::new(root).load_inventory().expect("load");
        assert_eq!(inv.components.len(), 2);
    }

    #[test]
    fn single_package_root_is_one_component() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(
            &root.join("Cargo.toml"),
            "[package]\nname = \"app-web\"\n\n[dependencies]\napp-orders-contracts = \"0.1\"\n",
        );

        let inv = CargoWorkspace::new(root).load_inventory().expect("load");
        assert_eq!(inv.components.len(), 1);
        assert_eq!(deps_of(&inv, "app-web"), vec!["app-orders-contracts"]);
    }

    #[test]
    fn dotted_identities_can_never_be_package_names() {
        let ws = CargoWorkspace::new("/repo");
        assert!(ws.can_name("app-catalog-contracts"));
        assert!(ws.can_name("app_catalog"));
        assert!(!ws.can_name("App.Catalog.Contracts"));
        assert!(!ws.can_name(""));
    }
}
