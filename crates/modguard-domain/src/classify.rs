use crate::model::{Classification, ModuleDescriptor};
use crate::template::ContractTemplate;
use std::collections::BTreeSet;

/// Keep the microservice modules (manifest order) and derive one contract id per module.
///
/// A module whose contract id was already produced by an earlier module (same name, or a
/// template that folds case) is kept out and reported in `duplicates`.
pub fn classify(
    descriptors: &[ModuleDescriptor],
    template: &ContractTemplate,
    namespace: &str,
) -> Classification {
    let mut seen = BTreeSet::new();
    let mut out = Classification::default();

    for module in descriptors.iter().filter(|d| d.is_microservice) {
        let contract = template.render(namespace, &module.name);
        if !seen.insert(contract.clone()) {
            out.duplicates.push(module.name.clone());
            continue;
        }
        out.contracts.push(contract);
        out.microservices.push(module.clone());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModuleDescriptor;

    #[test]
    fn keeps_only_microservices_in_manifest_order() {
        let descriptors = vec![
            ModuleDescriptor::new("Users", false),
            ModuleDescriptor::new("Catalog", true),
            ModuleDescriptor::new("Books", false),
            ModuleDescriptor::new("Email", true),
        ];

        let c = classify(&descriptors, &ContractTemplate::default(), "App");

        let names: Vec<&str> = c.microservices.iter().map(|m| m.name.as_str()).collect();
        let contracts: Vec<&str> = c.contracts.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["Catalog", "Email"]);
        assert_eq!(contracts, vec!["App.Catalog.Contracts", "App.Email.Contracts"]);
        assert!(c.duplicates.is_empty());
    }

    #[test]
    fn no_microservices_yields_empty_classification() {
        let descriptors = vec![ModuleDescriptor::new("Users", false)];
        assert!(classify(&descriptors, &ContractTemplate::default(), "App").is_empty());
        assert!(classify(&[], &ContractTemplate::default(), "App").is_empty());
    }

    #[test]
    fn duplicate_microservices_collapse_to_one_contract() {
        let descriptors = vec![
            ModuleDescriptor::new("Catalog", true),
            ModuleDescriptor::new("Catalog", true),
        ];

        let c = classify(&descriptors, &ContractTemplate::default(), "App");
        assert_eq!(c.microservices.len(), 1);
        assert_eq!(c.contracts.len(), 1);
        assert_eq!(c.duplicates, vec!["Catalog".to_string()]);
    }

    #[test]
    fn modules_rendering_the_same_contract_collapse() {
        let template =
            ContractTemplate::parse("{namespace}-{module_lower}-contracts").expect("parse");
        let descriptors = vec![
            ModuleDescriptor::new("Catalog", true),
            ModuleDescriptor::new("catalog", true),
        ];

        let c = classify(&descriptors, &template, "app");
        let contracts: Vec<&str> = c.contracts.iter().map(|c| c.as_str()).collect();
        assert_eq!(contracts, vec!["app-catalog-contracts"]);
        assert_eq!(c.microservices, vec![ModuleDescriptor::new("Catalog", true)]);
        assert_eq!(c.duplicates, vec!["catalog".to_string()]);

        let records = vec![crate::test_support::record(
            "app-orders",
            &["app-catalog-contracts"],
        )];
        assert_eq!(crate::evaluate(&records, &c).len(), 1);
    }
}
