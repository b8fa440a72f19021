//! Config parsing and profile resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ManifestConfig, ModguardConfigV1};
pub use resolve::{DEFAULT_MANIFEST_DEPTH, DEFAULT_MANIFEST_FILE, Overrides, ResolvedConfig};

/// Parse `modguard.toml` into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ModguardConfigV1> {
    let cfg: ModguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective configuration (profile preset, then config file, then overrides).
pub fn resolve_config(cfg: ModguardConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
