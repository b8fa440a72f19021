//! Use case orchestration for modguard.
//!
//! Coordinates the settings, repo, domain and render layers. The CLI depends on this and only
//! handles argument parsing and process IO.

#![forbid(unsafe_code)]

mod error;
mod render;
mod report;
mod reporter;
mod verify;

pub use error::VerifyError;
pub use render::{render_annotations, render_markdown};
pub use report::{
    error_report, parse_report_json, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
pub use reporter::Reporter;
pub use verify::{
    ManifestSpec, SourceSpec, VerifyInput, VerifyOutput, run_verify, verify_with_source,
};
