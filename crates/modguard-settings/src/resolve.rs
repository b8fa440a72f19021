use crate::{model::ModguardConfigV1, presets};
use anyhow::Context;
use modguard_domain::policy::{AllowList, BoundaryPolicy, ContractMatch};
use modguard_domain::template::ContractTemplate;

pub const DEFAULT_MANIFEST_FILE: &str = "services.json";
/// Base directory -> solution root, e.g. `bin/Debug/net8.0/` or `target/debug/deps/`.
pub const DEFAULT_MANIFEST_DEPTH: u32 = 4;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub namespace: Option<String>,
    pub contract_template: Option<String>,
    pub contract_match: Option<String>,
    pub include_dev: Option<bool>,
    pub manifest_depth: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: BoundaryPolicy,
    pub include_dev: bool,
    pub manifest_file: String,
    pub manifest_depth: u32,
}

pub fn resolve_config(cfg: ModguardConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut policy = presets::preset(&profile)?;

    if let Some(ns) = overrides.namespace.or(cfg.namespace) {
        if ns.trim().is_empty() {
            anyhow::bail!("namespace must not be empty");
        }
        policy.namespace = ns;
    }

    if let Some(t) = overrides.contract_template.or(cfg.contract_template) {
        policy.template = ContractTemplate::parse(&t).context("invalid contract_template")?;
    }

    if let Some(m) = overrides.contract_match.or(cfg.contract_match) {
        policy.contract_match = parse_contract_match(&m)?;
    }

    if !cfg.allow.is_empty() {
        policy.allow = AllowList::new(&cfg.allow).context("invalid allow glob")?;
    }

    let manifest_file = cfg
        .manifest
        .file
        .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string());
    if manifest_file.trim().is_empty() {
        anyhow::bail!("manifest.file must not be empty");
    }

    Ok(ResolvedConfig {
        policy,
        include_dev: overrides.include_dev.or(cfg.include_dev).unwrap_or(false),
        manifest_file,
        manifest_depth: overrides
            .manifest_depth
            .or(cfg.manifest.depth)
            .unwrap_or(DEFAULT_MANIFEST_DEPTH),
    })
}

fn parse_contract_match(v: &str) -> anyhow::Result<ContractMatch> {
    match v {
        "exact" => Ok(ContractMatch::Exact),
        "substring" => Ok(ContractMatch::Substring),
        other => anyhow::bail!("unknown contract_match: {other} (expected exact|substring)"),
    }
}
