use crate::fingerprint::fingerprint_for_edge;
use crate::model::{Classification, ComponentRecord, ViolationRecord};
use crate::policy::BoundaryPolicy;
use crate::report::DomainReport;
use modguard_types::{Finding, ModguardData, Severity, Verdict, ids};
use serde_json::json;

/// Apply the forbidden-dependency rule over every component x every contract.
///
/// One record per (component, contract) pair where the component depends on the
/// contract. Components keep inspector order; contracts keep manifest order.
pub fn evaluate(records: &[ComponentRecord], classification: &Classification) -> Vec<ViolationRecord> {
    let mut out = Vec::new();

    for record in records {
        for (module, contract) in classification.pairs() {
            if record.depends_on(contract.as_str()) {
                out.push(ViolationRecord {
                    component: record.identity.clone(),
                    contract: contract.clone(),
                    module: module.name.clone(),
                    location: record.locations.get(contract.as_str()).cloned(),
                });
            }
        }
    }

    out
}

/// Turn violations into findings, verdict, and scan counters.
pub fn summarize(
    records: &[ComponentRecord],
    classification: &Classification,
    violations: Vec<ViolationRecord>,
    policy: &BoundaryPolicy,
) -> DomainReport {
    let findings: Vec<Finding> = violations.iter().map(finding_for).collect();

    let verdict = if violations.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    let data = ModguardData {
        namespace: policy.namespace.clone(),
        profile: policy.profile.clone(),
        microservices: classification
            .microservices
            .iter()
            .map(|m| m.name.clone())
            .collect(),
        contracts: classification
            .contracts
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        components_scanned: saturating_u32(records.len()),
        dependencies_scanned: saturating_u32(records.iter().map(|r| r.dependencies.len()).sum()),
        violations_total: saturating_u32(violations.len()),
    };

    DomainReport {
        verdict,
        violations,
        findings,
        data,
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn finding_for(v: &ViolationRecord) -> Finding {
    Finding {
        severity: Severity::Error,
        check_id: ids::CHECK_BOUNDARY_CONTRACTS.to_string(),
        code: ids::CODE_CONTRACT_DEPENDENCY.to_string(),
        message: v.to_string(),
        location: v.location.clone(),
        fingerprint: Some(fingerprint_for_edge(
            ids::CHECK_BOUNDARY_CONTRACTS,
            ids::CODE_CONTRACT_DEPENDENCY,
            &v.component,
            v.contract.as_str(),
        )),
        data: json!({
            "component": v.component,
            "contract": v.contract.as_str(),
            "module": v.module,
        }),
    }
}
