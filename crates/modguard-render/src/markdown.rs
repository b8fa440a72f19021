use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Modguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Fail => "FAIL",
        RenderableVerdictStatus::Skip => "SKIP",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Namespace: `{}`\n- Components scanned: {}\n- Violations: {}\n\n",
        verdict,
        report.data.namespace,
        report.data.components_scanned,
        report.data.violations_total
    ));

    if report.data.microservices.is_empty() {
        out.push_str("There are no microservices in your project.\n\n");
    } else {
        out.push_str("## Microservices\n\n");
        for m in &report.data.microservices {
            out.push_str(&format!("- `{}`\n", m));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            sev, f.check_id, f.code, f.message
        ));
        match &f.location {
            Some(loc) => match loc.line {
                Some(line) => out.push_str(&format!(" (`{}`:{})\n", loc.path, line)),
                None => out.push_str(&format!(" (`{}`)\n", loc.path)),
            },
            None => out.push('\n'),
        }
    }

    out
}
