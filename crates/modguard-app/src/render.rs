//! Render use cases: Markdown and GitHub annotations from reports.

use crate::report::to_renderable;
use modguard_types::ModguardReport;

pub fn render_markdown(report: &ModguardReport) -> String {
    modguard_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &ModguardReport, max: usize) -> Vec<String> {
    modguard_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}
