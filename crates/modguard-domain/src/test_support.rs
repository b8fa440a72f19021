use crate::classify::classify;
use crate::model::{
    Classification, ComponentInventory, ComponentRecord, DependencyRef, ModuleDescriptor,
    RawComponent,
};
use crate::template::ContractTemplate;

pub fn component(identity: &str, deps: &[&str]) -> RawComponent {
    RawComponent {
        identity: identity.to_string(),
        dependencies: deps.iter().map(|d| DependencyRef::named(d)).collect(),
    }
}

pub fn inventory(components: Vec<RawComponent>) -> ComponentInventory {
    ComponentInventory { components }
}

pub fn record(identity: &str, deps: &[&str]) -> ComponentRecord {
    ComponentRecord {
        identity: identity.to_string(),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        ..ComponentRecord::default()
    }
}

pub fn classification_for(microservices: &[&str]) -> Classification {
    let descriptors: Vec<ModuleDescriptor> = microservices
        .iter()
        .map(|name| ModuleDescriptor::new(name, true))
        .collect();
    classify(&descriptors, &ContractTemplate::default(), "App")
}

pub fn catalog_classification() -> Classification {
    classification_for(&["Catalog"])
}
