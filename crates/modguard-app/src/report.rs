use crate::VerifyError;
use anyhow::Context;
use modguard_domain::policy::BoundaryPolicy;
use modguard_domain::report::DomainReport;
use modguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use modguard_types::{
    Finding, Location, ModguardData, ModguardReport, RepoPath, SCHEMA_REPORT_V1, Severity,
    ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "modguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub(crate) fn build_report(started_at: OffsetDateTime, domain: DomainReport) -> ModguardReport {
    ModguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: domain.verdict,
        findings: domain.findings,
        data: domain.data,
    }
}

/// Report for a run that had no microservice modules to protect.
pub(crate) fn skip_report(started_at: OffsetDateTime, policy: &BoundaryPolicy) -> ModguardReport {
    ModguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: Verdict::Skip,
        findings: Vec::new(),
        data: ModguardData {
            namespace: policy.namespace.clone(),
            profile: policy.profile.clone(),
            ..ModguardData::default()
        },
    }
}

/// Failing report with a single `tool.runtime` finding.
pub fn runtime_error_report(code: &str, message: &str, path: Option<&str>) -> ModguardReport {
    let now = OffsetDateTime::now_utc();
    ModguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: code.to_string(),
            message: message.to_string(),
            location: path.map(|p| Location {
                path: RepoPath::new(p),
                line: None,
            }),
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: ModguardData {
            profile: "unknown".to_string(),
            ..ModguardData::default()
        },
    }
}

/// Runtime error report for a run that could not complete.
pub fn error_report(err: &VerifyError) -> ModguardReport {
    runtime_error_report(
        err.finding_code(),
        &err.to_string(),
        err.manifest_path().map(|p| p.as_str()),
    )
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ModguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;
    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }
    serde_json::from_value(value).context("parse modguard report")
}

pub fn serialize_report(report: &ModguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Map verdict to exit code: 0 = pass/skip, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass | Verdict::Skip => 0,
        Verdict::Fail => 2,
    }
}

pub fn to_renderable(report: &ModguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Fail => RenderableVerdictStatus::Fail,
            Verdict::Skip => RenderableVerdictStatus::Skip,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            namespace: report.data.namespace.clone(),
            microservices: report.data.microservices.clone(),
            components_scanned: report.data.components_scanned,
            violations_total: report.data.violations_total,
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
        }),
    }
}
