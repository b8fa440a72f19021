use modguard_types::Location;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry of `services.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "IsMicroservice", default)]
    pub is_microservice: bool,
}

impl ModuleDescriptor {
    pub fn new(name: &str, is_microservice: bool) -> Self {
        Self {
            name: name.to_string(),
            is_microservice,
        }
    }
}

/// Identity of a microservice's contracts artifact, e.g. `App.Catalog.Contracts`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Microservice modules and their contract ids, index-aligned, manifest order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub microservices: Vec<ModuleDescriptor>,
    pub contracts: Vec<ContractId>,
    /// Microservice names listed more than once; only the first entry is kept.
    pub duplicates: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.microservices.is_empty()
    }

    /// `(module, contract)` pairs in manifest order.
    pub fn pairs(&self) -> impl Iterator<Item = (&ModuleDescriptor, &ContractId)> {
        self.microservices.iter().zip(self.contracts.iter())
    }

    pub fn contains_contract(&self, identity: &str) -> bool {
        self.contracts.iter().any(|c| c.as_str() == identity)
    }
}

/// A direct dependency reference as reported by a component source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyRef {
    pub identity: String,
    pub location: Option<Location>,
}

impl DependencyRef {
    pub fn named(identity: &str) -> Self {
        Self {
            identity: identity.to_string(),
            location: None,
        }
    }
}

/// An unfiltered component as reported by a component source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawComponent {
    pub identity: String,
    pub dependencies: Vec<DependencyRef>,
}

/// Point-in-time list of every component a source knows about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentInventory {
    pub components: Vec<RawComponent>,
}

impl ComponentInventory {
    pub fn dependency_count(&self) -> usize {
        self.components.iter().map(|c| c.dependencies.len()).sum()
    }
}

/// A checkable component with its dependencies narrowed to known contract ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentRecord {
    pub identity: String,
    pub dependencies: BTreeSet<String>,
    /// Where each retained dependency is declared, when the source knows.
    pub locations: BTreeMap<String, Location>,
}

impl ComponentRecord {
    pub fn depends_on(&self, identity: &str) -> bool {
        self.dependencies.contains(identity)
    }
}

/// One forbidden edge: `component` depends on another microservice's `contract`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViolationRecord {
    pub component: String,
    pub contract: ContractId,
    /// Microservice module owning `contract`.
    pub module: String,
    pub location: Option<Location>,
}

impl std::fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} has a dependency on microservice contract: {}",
            self.component, self.contract
        )
    }
}
