//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - `evaluate` is deterministic over the same snapshot
//! - exactly one violation per (component, contract) edge, and none without one
//! - every contract a component depends on shows up in the same run
//! - the inspector never lets a contracts artifact or foreign component through

use crate::classify::classify;
use crate::engine::evaluate;
use crate::inspect::snapshot;
use crate::model::{ComponentInventory, DependencyRef, ModuleDescriptor, RawComponent};
use crate::policy::BoundaryPolicy;
use crate::template::ContractTemplate;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

fn arb_module_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,8}").unwrap()
}

fn arb_modules() -> impl Strategy<Value = Vec<ModuleDescriptor>> {
    prop::collection::vec((arb_module_name(), any::<bool>()), 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, micro)| ModuleDescriptor::new(&name, micro))
            .collect()
    })
}

/// A component identity inside or outside the `App` namespace.
fn arb_component_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_module_name().prop_map(|m| format!("App.{m}.Api")),
        1 => arb_module_name().prop_map(|m| format!("Vendor.{m}")),
    ]
}

/// Dependencies drawn from the modules' contract ids plus unrelated noise.
fn arb_inventory(modules: Vec<ModuleDescriptor>) -> impl Strategy<Value = ComponentInventory> {
    let mut pool: Vec<String> = modules
        .iter()
        .map(|m| format!("App.{}.Contracts", m.name))
        .collect();
    pool.push("App.SharedKernel".to_string());
    pool.push("Serde".to_string());

    let component = (
        arb_component_name(),
        prop::collection::vec(prop::sample::select(pool), 0..5),
    )
        .prop_map(|(identity, deps)| RawComponent {
            identity,
            dependencies: deps.iter().map(|d| DependencyRef::named(d)).collect(),
        });

    prop::collection::vec(component, 0..8).prop_map(|components| ComponentInventory { components })
}

fn arb_case() -> impl Strategy<Value = (Vec<ModuleDescriptor>, ComponentInventory)> {
    arb_modules().prop_flat_map(|modules| {
        let inv = arb_inventory(modules.clone());
        (Just(modules), inv)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn evaluate_is_idempotent((modules, inv) in arb_case()) {
        let policy = BoundaryPolicy::default();
        let classification = classify(&modules, &ContractTemplate::default(), "App");
        let records = snapshot(&inv, &classification, &policy);

        prop_assert_eq!(
            evaluate(&records, &classification),
            evaluate(&records, &classification)
        );
    }

    #[test]
    fn one_violation_per_edge((modules, inv) in arb_case()) {
        let policy = BoundaryPolicy::default();
        let classification = classify(&modules, &ContractTemplate::default(), "App");
        let records = snapshot(&inv, &classification, &policy);
        let violations = evaluate(&records, &classification);

        let mut expected = 0usize;
        for record in &records {
            for contract in &classification.contracts {
                if record.depends_on(contract.as_str()) {
                    expected += 1;
                    let hits = violations
                        .iter()
                        .filter(|v| v.component == record.identity && v.contract == *contract)
                        .count();
                    // Duplicate component identities in the inventory each contribute a record.
                    let same_identity = records
                        .iter()
                        .filter(|r| r.identity == record.identity && r.depends_on(contract.as_str()))
                        .count();
                    prop_assert_eq!(hits, same_identity);
                }
            }
        }
        prop_assert_eq!(violations.len(), expected);
    }

    #[test]
    fn every_contract_dependency_is_reported((modules, inv) in arb_case()) {
        let policy = BoundaryPolicy::default();
        let classification = classify(&modules, &ContractTemplate::default(), "App");
        let records = snapshot(&inv, &classification, &policy);
        let violations = evaluate(&records, &classification);

        for record in &records {
            let reported: BTreeSet<&str> = violations
                .iter()
                .filter(|v| v.component == record.identity)
                .map(|v| v.contract.as_str())
                .collect();
            for dep in &record.dependencies {
                prop_assert!(reported.contains(dep.as_str()));
            }
        }
    }

    #[test]
    fn snapshot_only_keeps_namespaced_non_contract_components((modules, inv) in arb_case()) {
        let policy = BoundaryPolicy::default();
        let classification = classify(&modules, &ContractTemplate::default(), "App");

        for record in snapshot(&inv, &classification, &policy) {
            prop_assert!(record.identity.starts_with("App"));
            prop_assert!(!classification.contains_contract(&record.identity));
            for dep in &record.dependencies {
                prop_assert!(classification.contains_contract(dep));
            }
        }
    }

    #[test]
    fn no_microservices_means_no_violations(inv in arb_inventory(Vec::new())) {
        let classification = classify(&[], &ContractTemplate::default(), "App");
        let records = snapshot(&inv, &classification, &BoundaryPolicy::default());

        prop_assert!(evaluate(&records, &classification).is_empty());
    }
}
