use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `modguard.toml` schema v1.
///
/// Every field is optional; anything left out falls back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModguardConfigV1 {
    /// Optional schema string for tooling (`modguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default) or `legacy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Identity prefix shared by every application component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Contract naming template, e.g. `{namespace}.{module}.Contracts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_template: Option<String>,

    /// `exact` or `substring`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_match: Option<String>,

    /// Count `[dev-dependencies]` as component dependencies (Cargo source only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dev: Option<bool>,

    /// Component identity globs exempt from checking.
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Where `services.json` lives relative to the base directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Parent directories to walk up from the base directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}
