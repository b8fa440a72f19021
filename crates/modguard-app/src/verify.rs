//! The `verify` use case: classify modules, scan components, report contract edges.

use crate::report::{build_report, skip_report};
use crate::{Reporter, VerifyError};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use modguard_domain::model::Classification;
use modguard_repo::{CargoWorkspace, ComponentSource, InventoryFile, ManifestLocation};
use modguard_settings::{ModguardConfigV1, Overrides, ResolvedConfig};
use modguard_types::ModguardReport;
use std::io::Write;
use time::OffsetDateTime;

/// Where the module manifest comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestSpec {
    /// Use this file.
    Path(Utf8PathBuf),
    /// Walk the configured depth up from `base_dir` and look for the configured file name.
    Search { base_dir: Utf8PathBuf },
}

/// Where components and their dependencies come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    Inventory(Utf8PathBuf),
    /// Cargo workspace root; `None` means the manifest's directory.
    Workspace(Option<Utf8PathBuf>),
}

#[derive(Clone, Debug)]
pub struct VerifyInput<'a> {
    /// `modguard.toml` contents (empty when there is no config file).
    pub config_text: &'a str,
    pub overrides: Overrides,
    pub manifest: ManifestSpec,
    pub source: SourceSpec,
}

#[derive(Debug)]
pub struct VerifyOutput {
    pub report: ModguardReport,
    pub resolved_config: ResolvedConfig,
    pub manifest_path: Utf8PathBuf,
    /// What the reporter concluded: `Err(BoundaryViolation)` when any edge was found.
    pub outcome: Result<(), VerifyError>,
}

/// Resolve config and inputs, then run the check.
///
/// `Err` means the check could not run. A finished check with violations is `Ok` with a
/// failing `outcome`.
pub fn run_verify<W: Write>(input: VerifyInput<'_>, out: W) -> Result<VerifyOutput, VerifyError> {
    let cfg = if input.config_text.trim().is_empty() {
        ModguardConfigV1::default()
    } else {
        modguard_settings::parse_config_toml(input.config_text)
            .context("parse config")
            .map_err(VerifyError::Config)?
    };

    let resolved = modguard_settings::resolve_config(cfg, input.overrides)
        .context("resolve config")
        .map_err(VerifyError::Config)?;

    let location = match input.manifest {
        ManifestSpec::Path(path) => ManifestLocation::Explicit(path),
        ManifestSpec::Search { base_dir } => ManifestLocation::Relative {
            base_dir,
            depth: resolved.manifest_depth,
            file: resolved.manifest_file.clone(),
        },
    };
    let manifest_path = location.resolve();
    tracing::debug!(manifest = %manifest_path, "resolved module manifest");

    let source: Box<dyn ComponentSource> = match input.source {
        SourceSpec::Inventory(path) => Box::new(InventoryFile::new(path)),
        SourceSpec::Workspace(root) => {
            let root = root.unwrap_or_else(|| manifest_dir(&manifest_path));
            Box::new(CargoWorkspace::new(root).include_dev(resolved.include_dev))
        }
    };

    verify_with_source(&manifest_path, resolved, source.as_ref(), out)
}

/// Run the check against an already-resolved manifest path and component source.
pub fn verify_with_source<W: Write>(
    manifest_path: &Utf8Path,
    resolved: ResolvedConfig,
    source: &dyn ComponentSource,
    out: W,
) -> Result<VerifyOutput, VerifyError> {
    let started_at = OffsetDateTime::now_utc();
    let mut reporter = Reporter::new(out);
    let policy = &resolved.policy;

    let modules = modguard_repo::load_services(manifest_path)?;
    let classification = modguard_domain::classify(&modules, &policy.template, &policy.namespace);
    log_classification(&classification, modules.len());

    if classification.is_empty() {
        reporter.no_microservices()?;
        let report = skip_report(started_at, policy);
        return Ok(VerifyOutput {
            report,
            resolved_config: resolved,
            manifest_path: manifest_path.to_path_buf(),
            outcome: Ok(()),
        });
    }

    if let Some(contract) = classification
        .contracts
        .iter()
        .find(|c| !source.can_name(c.as_str()))
    {
        return Err(VerifyError::Config(anyhow::anyhow!(
            "contract id '{contract}' can never match a component of {}; \
             set contract_template to a form it can name (e.g. \"{{namespace}}-{{module_kebab}}-contracts\")",
            source.describe()
        )));
    }

    reporter.announce(&classification.microservices)?;

    tracing::debug!(source = %source.describe(), "loading component inventory");
    let inventory = source.load_inventory().map_err(VerifyError::Inventory)?;

    let records = modguard_domain::snapshot(&inventory, &classification, policy);
    tracing::debug!(
        components = inventory.components.len(),
        checked = records.len(),
        "inspected components"
    );

    let violations = modguard_domain::evaluate(&records, &classification);
    let outcome = match reporter.report(&violations) {
        Err(VerifyError::Output(e)) => return Err(VerifyError::Output(e)),
        other => other,
    };

    let domain = modguard_domain::summarize(&records, &classification, violations, policy);
    let report = build_report(started_at, domain);

    Ok(VerifyOutput {
        report,
        resolved_config: resolved,
        manifest_path: manifest_path.to_path_buf(),
        outcome,
    })
}

fn log_classification(classification: &Classification, modules: usize) {
    for name in &classification.duplicates {
        tracing::warn!(module = %name, "module maps to a contract id already taken; keeping the first entry");
    }
    tracing::debug!(
        modules,
        microservices = classification.microservices.len(),
        "classified modules"
    );
}

fn manifest_dir(manifest_path: &Utf8Path) -> Utf8PathBuf {
    match manifest_path.parent() {
        Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modguard_domain::model::{ComponentInventory, DependencyRef, RawComponent};
    use modguard_types::Verdict;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct StaticSource {
        components: Vec<(&'static str, Vec<&'static str>)>,
        loads: Cell<u32>,
    }

    impl StaticSource {
        fn new(components: Vec<(&'static str, Vec<&'static str>)>) -> Self {
            Self {
                components,
                loads: Cell::new(0),
            }
        }
    }

    impl ComponentSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn load_inventory(&self) -> anyhow::Result<ComponentInventory> {
            self.loads.set(self.loads.get() + 1);
            Ok(ComponentInventory {
                components: self
                    .components
                    .iter()
                    .map(|(id, deps)| RawComponent {
                        identity: id.to_string(),
                        dependencies: deps.iter().map(|d| DependencyRef::named(d)).collect(),
                    })
                    .collect(),
            })
        }
    }

    struct FailingSource;

    impl ComponentSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        fn load_inventory(&self) -> anyhow::Result<ComponentInventory> {
            anyhow::bail!("host unavailable")
        }
    }

    fn manifest(tmp: &TempDir, json: &str) -> Utf8PathBuf {
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        let path = dir.join("services.json");
        std::fs::write(&path, json).expect("write manifest");
        path
    }

    fn resolved() -> ResolvedConfig {
        modguard_settings::resolve_config(ModguardConfigV1::default(), Overrides::default())
            .expect("resolve")
    }

    fn run(
        path: &Utf8Path,
        source: &dyn ComponentSource,
    ) -> (Result<VerifyOutput, VerifyError>, String) {
        let mut buf = Vec::new();
        let result = verify_with_source(path, resolved(), source, &mut buf);
        (result, String::from_utf8(buf).expect("utf8"))
    }

    #[test]
    fn no_microservices_skips_without_loading_components() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, r#"[{"Name":"Users","IsMicroservice":false}]"#);
        let source = StaticSource::new(vec![("App.Users", vec!["App.Books.Contracts"])]);

        let (result, stdout) = run(&path, &source);
        let out = result.expect("verify");

        assert_eq!(stdout, "There are no microservices in your project.\n");
        assert_eq!(out.report.verdict, Verdict::Skip);
        assert!(out.outcome.is_ok());
        assert_eq!(source.loads.get(), 0);
    }

    const CATALOG_MANIFEST: &str =
        r#"[{"Name":"Users","IsMicroservice":false},{"Name":"Catalog","IsMicroservice":true}]"#;

    fn own_contract_source() -> StaticSource {
        StaticSource::new(vec![
            ("App.Users", vec!["App.Books.Contracts"]),
            ("App.Catalog", vec!["App.Catalog.Contracts"]),
        ])
    }

    #[test]
    fn clean_boundaries_pass() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, CATALOG_MANIFEST);
        let source = StaticSource::new(vec![
            ("App.Users", vec!["App.Books.Contracts"]),
            ("App.Catalog.Contracts", vec![]),
        ]);

        let (result, stdout) = run(&path, &source);
        let out = result.expect("verify");

        assert_eq!(
            stdout,
            "'Catalog' is a microservice.\n\
             Starting to check for dependencies...\n\
             Successfully verified all module dependencies!\n"
        );
        assert_eq!(out.report.verdict, Verdict::Pass);
        assert!(out.outcome.is_ok());
        assert_eq!(source.loads.get(), 1);
    }

    #[test]
    fn strict_profile_checks_the_owning_module_too() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, CATALOG_MANIFEST);

        let (result, stdout) = run(&path, &own_contract_source());
        let out = result.expect("verify");

        assert!(!stdout.contains("Successfully"));
        assert_eq!(out.report.verdict, Verdict::Fail);
        match out.outcome {
            Err(VerifyError::BoundaryViolation { detail, .. }) => assert_eq!(
                detail,
                "App.Catalog has a dependency on microservice contract: App.Catalog.Contracts"
            ),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn legacy_profile_exempts_names_contained_in_a_contract() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, CATALOG_MANIFEST);
        let legacy = modguard_settings::resolve_config(
            ModguardConfigV1::default(),
            Overrides {
                profile: Some("legacy".to_string()),
                ..Overrides::default()
            },
        )
        .expect("resolve");

        let mut buf = Vec::new();
        let out = verify_with_source(&path, legacy, &own_contract_source(), &mut buf)
            .expect("verify");

        assert_eq!(out.report.verdict, Verdict::Pass);
        assert!(out.outcome.is_ok());
        assert_eq!(out.report.data.components_scanned, 1);
    }

    #[test]
    fn violations_are_collected_before_failing() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(
            &tmp,
            r#"[{"Name":"Catalog","IsMicroservice":true},{"Name":"Email","IsMicroservice":true}]"#,
        );
        let source = StaticSource::new(vec![
            ("App.Web", vec!["App.Catalog.Contracts", "App.Email.Contracts"]),
            ("App.Orders", vec!["App.Catalog.Contracts"]),
        ]);

        let (result, stdout) = run(&path, &source);
        let out = result.expect("verify");

        assert!(!stdout.contains("Successfully"));
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.findings.len(), 3);
        match out.outcome {
            Err(VerifyError::BoundaryViolation { violations, detail }) => {
                assert_eq!(violations.len(), 3);
                assert_eq!(
                    detail,
                    "App.Web has a dependency on microservice contract: App.Catalog.Contracts\n\
                     App.Web has a dependency on microservice contract: App.Email.Contracts\n\
                     App.Orders has a dependency on microservice contract: App.Catalog.Contracts"
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let tmp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("services.json")).expect("utf8");
        let (result, stdout) = run(&path, &StaticSource::new(Vec::new()));

        assert!(matches!(result, Err(VerifyError::ManifestNotFound { .. })));
        assert!(stdout.is_empty());
    }

    #[test]
    fn malformed_manifest_is_reported() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, "{not json");
        let (result, _) = run(&path, &StaticSource::new(Vec::new()));
        assert!(matches!(result, Err(VerifyError::ManifestMalformed { .. })));
    }

    #[test]
    fn inventory_failures_surface_as_inventory_errors() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, r#"[{"Name":"Catalog","IsMicroservice":true}]"#);
        let (result, _) = run(&path, &FailingSource);

        let err = result.unwrap_err();
        assert!(matches!(err, VerifyError::Inventory(_)));
        assert!(err.to_string().contains("host unavailable"));
    }

    #[test]
    fn run_verify_searches_up_from_base_dir_and_reads_the_workspace() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8");
        std::fs::write(
            root.join("services.json"),
            r#"[{"Name":"catalog","IsMicroservice":true}]"#,
        )
        .expect("write manifest");
        std::fs::write(
            root.join("Cargo.toml"),
            "[package]\nname = \"app-web\"\n\n[dependencies]\napp-catalog-contracts = \"0.1\"\n",
        )
        .expect("write cargo");
        let base_dir = root.join("target/debug/deps/x");
        std::fs::create_dir_all(&base_dir).expect("mkdir");

        let input = VerifyInput {
            config_text: "namespace = \"app\"\ncontract_template = \"{namespace}-{module_kebab}-contracts\"\n",
            overrides: Overrides::default(),
            manifest: ManifestSpec::Search { base_dir },
            source: SourceSpec::Workspace(None),
        };

        let out = run_verify(input, Vec::new()).expect("verify");
        assert_eq!(out.manifest_path, root.join("services.json"));
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.contracts, vec!["app-catalog-contracts".to_string()]);
        assert!(out.outcome.is_err());
    }

    #[test]
    fn dotted_contracts_are_rejected_for_cargo_workspaces() {
        let tmp = TempDir::new().expect("temp dir");
        let path = manifest(&tmp, r#"[{"Name":"Catalog","IsMicroservice":true}]"#);
        let source = modguard_repo::CargoWorkspace::new(path.parent().expect("parent"));

        let mut buf = Vec::new();
        let err = verify_with_source(&path, resolved(), &source, &mut buf).unwrap_err();

        assert!(matches!(err, VerifyError::Config(_)));
        assert!(err.to_string().contains("App.Catalog.Contracts"));
        assert!(buf.is_empty());
    }

    #[test]
    fn bad_config_is_a_config_error() {
        let input = VerifyInput {
            config_text: "profile = \"lenient\"\n",
            overrides: Overrides::default(),
            manifest: ManifestSpec::Path(Utf8PathBuf::from("services.json")),
            source: SourceSpec::Workspace(None),
        };
        assert!(matches!(
            run_verify(input, Vec::new()),
            Err(VerifyError::Config(_))
        ));
    }

    #[test]
    fn manifest_dir_defaults_to_current_dir() {
        assert_eq!(manifest_dir(Utf8Path::new("services.json")), Utf8PathBuf::from("."));
        assert_eq!(manifest_dir(Utf8Path::new("/a/services.json")), Utf8PathBuf::from("/a"));
    }
}
