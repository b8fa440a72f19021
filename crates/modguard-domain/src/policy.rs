use crate::model::ContractId;
use crate::template::ContractTemplate;
use globset::{Glob, GlobSet, GlobSetBuilder};

pub const DEFAULT_NAMESPACE: &str = "App";

/// How a component is recognised as a contracts artifact (and so excluded from checking).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContractMatch {
    /// Component identity equals a contract id.
    #[default]
    Exact,
    /// Some contract id contains the component identity. Kept for compatibility with
    /// existing setups; a component named `App.Catalog` is then never checked.
    Substring,
}

impl ContractMatch {
    pub fn is_contract(self, identity: &str, contracts: &[ContractId]) -> bool {
        match self {
            ContractMatch::Exact => contracts.iter().any(|c| c.as_str() == identity),
            ContractMatch::Substring => contracts.iter().any(|c| c.as_str().contains(identity)),
        }
    }
}

/// Component identities exempt from checking.
#[derive(Clone, Debug)]
pub struct AllowList {
    set: GlobSet,
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }
}

impl AllowList {
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for p in patterns {
            builder.add(Glob::new(p)?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn is_allowed(&self, identity: &str) -> bool {
        self.set.is_match(identity)
    }
}

#[derive(Clone, Debug)]
pub struct BoundaryPolicy {
    pub profile: String,
    /// Prefix every application component (and contract) identity starts with.
    pub namespace: String,
    pub template: ContractTemplate,
    pub contract_match: ContractMatch,
    pub allow: AllowList,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            template: ContractTemplate::default(),
            contract_match: ContractMatch::Exact,
            allow: AllowList::default(),
        }
    }
}
