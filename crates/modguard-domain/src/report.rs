use crate::model::ViolationRecord;
use modguard_types::{Finding, ModguardData, Verdict};

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    /// Engine order: components as inspected, contracts in manifest order.
    pub violations: Vec<ViolationRecord>,
    pub findings: Vec<Finding>,
    pub data: ModguardData,
}
