//! Stable DTOs and IDs used across the modguard workspace.
//!
//! - data types for the emitted report
//! - stable string IDs and codes
//! - canonical repo-relative path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod receipt;

pub use path::RepoPath;
pub use receipt::{
    Finding, Location, ModguardData, ModguardReport, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict,
};
