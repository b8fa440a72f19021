//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_BOUNDARY_CONTRACTS: &str = "boundary.microservice_contracts";

// Codes: boundary.microservice_contracts
pub const CODE_CONTRACT_DEPENDENCY: &str = "contract_dependency";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_MANIFEST_NOT_FOUND: &str = "manifest_not_found";
pub const CODE_MANIFEST_MALFORMED: &str = "manifest_malformed";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
