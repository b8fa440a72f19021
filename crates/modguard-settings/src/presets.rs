use modguard_domain::policy::{BoundaryPolicy, ContractMatch};

/// Preset profiles. Anything beyond these belongs in repo config.
pub fn preset(profile: &str) -> anyhow::Result<BoundaryPolicy> {
    match profile {
        "strict" => Ok(strict_profile()),
        "legacy" => Ok(legacy_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected strict|legacy)"),
    }
}

fn strict_profile() -> BoundaryPolicy {
    BoundaryPolicy::default()
}

/// Substring contract matching, as older setups expect.
fn legacy_profile() -> BoundaryPolicy {
    BoundaryPolicy {
        profile: "legacy".to_string(),
        contract_match: ContractMatch::Substring,
        ..BoundaryPolicy::default()
    }
}
