//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use modguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(modguard_types::ModguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(modguard_settings::ModguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "modguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "modguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate golden reports in tests/fixtures against the report schema");
    eprintln!("  conform-full      conform + run the modguard binary on every inventory fixture");
}

/// Identifier tokens: lowercase ASCII start, then lowercase, digits, `_` or `.`.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
}

/// No absolute paths, no `..`, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.starts_with('\\')
        || path.contains("..")
        || path.contains('\\')
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

fn compile_report_schema() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema())?;
    jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Schema, path and token checks for one report value.
fn check_report(label: &str, value: &Value, compiled: &jsonschema::Validator) -> Vec<String> {
    let mut errors: Vec<String> = compiled
        .iter_errors(value)
        .map(|err| format!("{label}: schema validation: {err}"))
        .collect();

    let findings = value
        .get("findings")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (i, finding) in findings.iter().enumerate() {
        // Runtime findings may point at an absolute manifest path.
        let is_runtime = finding.get("check_id").and_then(Value::as_str) == Some("tool.runtime");
        if !is_runtime
            && let Some(path) = finding
                .get("location")
                .and_then(|loc| loc.get("path"))
                .and_then(Value::as_str)
            && !is_clean_path(path)
        {
            errors.push(format!(
                "{label}: findings[{i}].location.path '{path}' is not repo-relative"
            ));
        }

        for key in ["check_id", "code"] {
            if let Some(token) = finding.get(key).and_then(Value::as_str)
                && !is_valid_token(token)
            {
                errors.push(format!("{label}: findings[{i}].{key} '{token}' is not a valid token"));
            }
        }
    }

    errors
}

/// Fixture directories that carry a golden `expected.report.json`.
fn golden_fixtures() -> anyhow::Result<Vec<PathBuf>> {
    let dir = fixtures_dir()?;
    let mut out = Vec::new();
    for entry in fs::read_dir(&dir).context("Failed to read tests/fixtures/")? {
        let path = entry?.path();
        if path.join("expected.report.json").is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn fixture_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn report_errors(errors: &[String], what: &str) -> anyhow::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("\n{what} errors:");
    for err in errors {
        eprintln!("  - {err}");
    }
    bail!("{what} failed with {} errors", errors.len())
}

fn conform() -> anyhow::Result<()> {
    let compiled = compile_report_schema()?;
    println!("✓ modguard.report.v1 schema compiles");

    let fixtures = golden_fixtures()?;
    if fixtures.is_empty() {
        bail!("No golden reports found under tests/fixtures/");
    }

    let mut errors = Vec::new();
    for dir in &fixtures {
        let name = fixture_name(dir);
        let value = read_json(&dir.join("expected.report.json"))?;
        let found = check_report(&name, &value, &compiled);
        if found.is_empty() {
            println!("  ✓ {name} validates");
        }
        errors.extend(found);
    }

    report_errors(&errors, "Conformance")?;
    println!("\n✓ All {} golden reports pass conformance checks!", fixtures.len());
    Ok(())
}

fn modguard_bin() -> anyhow::Result<PathBuf> {
    let bin = project_root()?.join("target").join("debug").join("modguard");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "modguard binary not found at {}.\nRun `cargo build -p modguard-cli` first.",
            bin.display()
        );
    }
    Ok(bin)
}

/// conform, then run the built binary on each inventory fixture and diff against its golden.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: modguard binary output ---\n");

    let compiled = compile_report_schema()?;
    let bin = modguard_bin()?;
    let mut errors = Vec::new();

    for dir in golden_fixtures()? {
        let name = fixture_name(&dir);
        if !dir.join("inventory.json").is_file() {
            continue;
        }

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&bin)
            .current_dir(temp_dir.path())
            .arg("verify")
            .arg("--manifest")
            .arg(dir.join("services.json"))
            .arg("--inventory")
            .arg(dir.join("inventory.json"))
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run modguard on fixture '{name}'"))?;

        // 0 and 2 both mean a verdict was reached.
        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{name}': modguard exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let actual = match read_json(&report_out) {
            Ok(value) => value,
            Err(err) => {
                errors.push(format!("fixture '{name}': {err:#}"));
                continue;
            }
        };
        errors.extend(check_report(&name, &actual, &compiled));

        let golden = read_json(&dir.join("expected.report.json"))?;
        if normalize_nondeterministic(actual) == normalize_nondeterministic(golden) {
            println!("  ✓ fixture '{name}' matches golden report");
        } else {
            errors.push(format!(
                "fixture '{name}': output differs from expected.report.json"
            ));
        }
    }

    report_errors(&errors, "Full conformance")?;
    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
