use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSetBuilder};
use modguard_types::RepoPath;
use std::path::PathBuf;
use toml_edit::DocumentMut;
use walkdir::WalkDir;

/// Discover Cargo manifests for the workspace rooted at `root`.
///
/// With `[workspace]`, `members` globs are expanded and `exclude` applied.
/// Otherwise only the root `Cargo.toml` is returned.
pub fn discover_manifests(root: &Utf8Path) -> anyhow::Result<Vec<RepoPath>> {
    let root_manifest = root.join("Cargo.toml");
    let text = std::fs::read_to_string(&root_manifest)
        .with_context(|| format!("read {root_manifest}"))?;
    let doc = text
        .parse::<DocumentMut>()
        .context("parse root Cargo.toml")?;

    let Some(workspace) = doc.get("workspace") else {
        return Ok(vec![RepoPath::new("Cargo.toml")]);
    };

    let members = string_list(workspace.get("members"));
    let excludes = string_list(workspace.get("exclude"));

    let member_set = build_globset(&members).context("compile members globset")?;
    let exclude_set = build_globset(&excludes).context("compile exclude globset")?;

    let mut out = vec![RepoPath::new("Cargo.toml")];

    for abs in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (e.file_name() != "target" && e.file_name() != ".git"))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "Cargo.toml")
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
    {
        let rel = RepoPath::relative_to(root, &abs);
        if rel.as_str() == "Cargo.toml" {
            continue;
        }

        // Globs may name either the manifest or its directory.
        let dir = rel.parent();
        let is_member = members.is_empty()
            || member_set.is_match(rel.as_str())
            || member_set.is_match(dir.as_str());
        let is_excluded =
            exclude_set.is_match(rel.as_str()) || exclude_set.is_match(dir.as_str());

        if is_member && !is_excluded {
            out.push(rel);
        }
    }

    out.sort();
    out.dedup();
    tracing::debug!(root = %root, manifests = out.len(), "discovered cargo manifests");
    Ok(out)
}

fn string_list(item: Option<&toml_edit::Item>) -> Vec<String> {
    item.and_then(|i| i.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn build_globset(patterns: &[String]) -> anyhow::Result<globset::GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
