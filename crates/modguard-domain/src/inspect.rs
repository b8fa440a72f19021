//! Narrow a raw component inventory to the records the rule engine checks.

use crate::model::{Classification, ComponentInventory, ComponentRecord, RawComponent};
use crate::policy::BoundaryPolicy;

/// Build the checkable component records.
///
/// A component is kept when its identity starts with the namespace, it is not itself a
/// contracts artifact, and it is not allowlisted. Its dependencies are narrowed to the
/// namespaced identities that exactly equal a known contract id.
pub fn snapshot(
    inventory: &ComponentInventory,
    classification: &Classification,
    policy: &BoundaryPolicy,
) -> Vec<ComponentRecord> {
    inventory
        .components
        .iter()
        .filter(|c| is_checkable(c, classification, policy))
        .map(|c| narrow(c, classification, policy))
        .collect()
}

fn is_checkable(
    component: &RawComponent,
    classification: &Classification,
    policy: &BoundaryPolicy,
) -> bool {
    component.identity.starts_with(&policy.namespace)
        && !policy
            .contract_match
            .is_contract(&component.identity, &classification.contracts)
        && !policy.allow.is_allowed(&component.identity)
}

fn narrow(
    component: &RawComponent,
    classification: &Classification,
    policy: &BoundaryPolicy,
) -> ComponentRecord {
    let mut record = ComponentRecord {
        identity: component.identity.clone(),
        ..ComponentRecord::default()
    };

    for dep in &component.dependencies {
        if !dep.identity.starts_with(&policy.namespace)
            || !classification.contains_contract(&dep.identity)
        {
            continue;
        }
        if record.dependencies.insert(dep.identity.clone())
            && let Some(location) = &dep.location
        {
            record
                .locations
                .insert(dep.identity.clone(), location.clone());
        }
    }

    record
}
