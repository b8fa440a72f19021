//! Rendering for CI surfaces (Markdown summaries, GitHub annotations).
//!
//! Inputs are plain renderable structs so this crate has no knowledge of the report schema.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
