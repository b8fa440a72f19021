use anyhow::Context;
use modguard_types::{Location, RepoPath};
use std::collections::BTreeMap;
use toml_edit::{ImDocument, Item, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepKind {
    Normal,
    Dev,
    Build,
}

/// One dependency entry as written in a manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub kind: DepKind,
    /// Table key, i.e. the name the dependent crate uses.
    pub key: String,
    /// `package = "..."` when the dependency is renamed.
    pub package: Option<String>,
    pub workspace: bool,
    pub location: Location,
}

impl DeclaredDependency {
    /// Package name this entry points at. `workspace = true` entries without
    /// their own `package` fall back to the workspace rename table.
    pub fn identity(&self, workspace_renames: &BTreeMap<String, String>) -> String {
        if let Some(pkg) = &self.package {
            return pkg.clone();
        }
        if self.workspace
            && let Some(pkg) = workspace_renames.get(&self.key)
        {
            return pkg.clone();
        }
        self.key.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageManifest {
    pub path: RepoPath,
    /// `None` for virtual manifests.
    pub package: Option<String>,
    pub dependencies: Vec<DeclaredDependency>,
}

/// 1-based line of a byte offset.
fn byte_offset_to_line(source: &str, offset: usize) -> u32 {
    let line_count = source.as_bytes()[..offset.min(source.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    (line_count + 1) as u32
}

/// Parse the root manifest: `[workspace.dependencies]` renames plus its own package, if any.
pub fn parse_root_manifest(
    manifest_path: &RepoPath,
    text: &str,
) -> anyhow::Result<(BTreeMap<String, String>, PackageManifest)> {
    let doc: ImDocument<&str> = ImDocument::parse(text).context("parse Cargo.toml")?;
    let renames = parse_workspace_renames(&doc);
    Ok((renames, parse_manifest_doc(&doc, manifest_path, text)))
}

pub fn parse_member_manifest(
    manifest_path: &RepoPath,
    text: &str,
) -> anyhow::Result<PackageManifest> {
    let doc: ImDocument<&str> = ImDocument::parse(text).context("parse Cargo.toml")?;
    Ok(parse_manifest_doc(&doc, manifest_path, text))
}

fn parse_manifest_doc(
    doc: &ImDocument<&str>,
    manifest_path: &RepoPath,
    source: &str,
) -> PackageManifest {
    let package = doc
        .get("package")
        .and_then(|i| i.as_table())
        .and_then(|t| t.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string);

    let mut deps = Vec::new();
    for (section, kind) in DEP_SECTIONS {
        deps.extend(parse_dep_table(doc.get(section), kind, manifest_path, source));
    }

    // `[target.'cfg(unix)'.dependencies]` and friends.
    if let Some(targets) = doc.get("target").and_then(|i| i.as_table()) {
        for (_cfg, target) in targets.iter() {
            let Some(target) = target.as_table() else {
                continue;
            };
            for (section, kind) in DEP_SECTIONS {
                deps.extend(parse_dep_table(
                    target.get(section),
                    kind,
                    manifest_path,
                    source,
                ));
            }
        }
    }

    PackageManifest {
        path: manifest_path.clone(),
        package,
        dependencies: deps,
    }
}

const DEP_SECTIONS: [(&str, DepKind); 3] = [
    ("dependencies", DepKind::Normal),
    ("dev-dependencies", DepKind::Dev),
    ("build-dependencies", DepKind::Build),
];

/// Workspace dependency keys that are renamed via `package = "..."`.
fn parse_workspace_renames(doc: &ImDocument<&str>) -> BTreeMap<String, String> {
    let Some(deps) = doc
        .get("workspace")
        .and_then(|w| w.as_table())
        .and_then(|w| w.get("dependencies"))
        .and_then(|d| d.as_table())
    else {
        return BTreeMap::new();
    };

    deps.iter()
        .filter_map(|(key, item)| {
            let (package, _) = rename_and_workspace(item);
            package.map(|p| (key.to_string(), p))
        })
        .collect()
}

fn parse_dep_table(
    section: Option<&Item>,
    kind: DepKind,
    manifest_path: &RepoPath,
    source: &str,
) -> Vec<DeclaredDependency> {
    let Some(tbl) = section.and_then(|i| i.as_table()) else {
        return Vec::new();
    };

    tbl.iter()
        .map(|(key, item)| {
            let (package, workspace) = rename_and_workspace(item);
            let line = item
                .span()
                .map(|span| byte_offset_to_line(source, span.start));
            DeclaredDependency {
                kind,
                key: key.to_string(),
                package,
                workspace,
                location: Location {
                    path: manifest_path.clone(),
                    line,
                },
            }
        })
        .collect()
}

fn rename_and_workspace(item: &Item) -> (Option<String>, bool) {
    match item {
        Item::Value(Value::InlineTable(t)) => (
            t.get("package")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            t.get("workspace")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        ),
        Item::Table(t) => (
            t.get("package")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            t.get("workspace")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        ),
        _ => (None, false),
    }
}
