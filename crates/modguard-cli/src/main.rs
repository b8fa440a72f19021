//! CLI entry point for modguard.
//!
//! Argument parsing, process IO and exit codes only. Everything else lives in `modguard-app`.

mod logging;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use modguard_app::{
    ManifestSpec, SourceSpec, VerifyInput, error_report, parse_report_json, render_annotations,
    render_markdown, run_verify, runtime_error_report, serialize_report, verdict_exit_code,
};
use modguard_settings::Overrides;
use modguard_types::{ModguardReport, ids};

#[derive(Parser, Debug)]
#[command(
    name = "modguard",
    version,
    about = "Keeps modules from depending on other microservices' contracts"
)]
struct Cli {
    /// Path to modguard config TOML. A missing file means defaults.
    #[arg(long, global = true, default_value = "modguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|legacy).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override the component identity namespace.
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Override the contract naming template.
    #[arg(long, global = true)]
    contract_template: Option<String>,

    /// Override contract matching (exact|substring).
    #[arg(long, global = true)]
    contract_match: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g. `modguard_repo=debug`).
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify that no component depends on another microservice's contracts.
    Verify(VerifyArgs),

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/modguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (stdout when omitted).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/modguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Module manifest to read. Skips the directory search.
    #[arg(long, conflicts_with_all = ["base_dir", "manifest_depth"])]
    manifest: Option<Utf8PathBuf>,

    /// Directory to search up from (defaults to the executable's directory).
    #[arg(long)]
    base_dir: Option<Utf8PathBuf>,

    /// Parent directories to walk up from the base directory.
    #[arg(long)]
    manifest_depth: Option<u32>,

    /// Component inventory JSON exported by the host.
    #[arg(long, conflicts_with = "workspace")]
    inventory: Option<Utf8PathBuf>,

    /// Cargo workspace to scan (defaults to the manifest's directory).
    #[arg(long)]
    workspace: Option<Utf8PathBuf>,

    /// Count dev-dependencies (Cargo workspaces only).
    #[arg(long)]
    include_dev: bool,

    /// Where to write the JSON report.
    #[arg(long)]
    report_out: Option<Utf8PathBuf>,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/modguard/comment.md")]
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_filter.as_deref());

    match &cli.cmd {
        Commands::Verify(args) => cmd_verify(&cli, args),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
    }
}

fn cmd_verify(cli: &Cli, args: &VerifyArgs) -> anyhow::Result<()> {
    let prepared = (|| -> anyhow::Result<(String, ManifestSpec)> {
        let cfg_text = read_config(&cli.config)?;
        let manifest = match &args.manifest {
            Some(path) => ManifestSpec::Path(path.clone()),
            None => {
                let base_dir = match &args.base_dir {
                    Some(dir) => dir.canonicalize_utf8().unwrap_or_else(|_| dir.clone()),
                    None => modguard_repo::executable_base_dir()?,
                };
                ManifestSpec::Search { base_dir }
            }
        };
        Ok((cfg_text, manifest))
    })();

    let (cfg_text, manifest) = match prepared {
        Ok(v) => v,
        Err(err) => {
            let message = format!("{err:#}");
            let report = runtime_error_report(ids::CODE_RUNTIME_ERROR, &message, None);
            fail_runtime(args, &report, &message);
        }
    };

    let source = match (&args.inventory, &args.workspace) {
        (Some(path), _) => SourceSpec::Inventory(path.clone()),
        (None, root) => SourceSpec::Workspace(root.clone()),
    };

    let input = VerifyInput {
        config_text: &cfg_text,
        overrides: Overrides {
            profile: cli.profile.clone(),
            namespace: cli.namespace.clone(),
            contract_template: cli.contract_template.clone(),
            contract_match: cli.contract_match.clone(),
            include_dev: args.include_dev.then_some(true),
            manifest_depth: args.manifest_depth,
        },
        manifest,
        source,
    };

    let output = match run_verify(input, std::io::stdout().lock()) {
        Ok(output) => output,
        Err(err) => fail_runtime(args, &error_report(&err), &err.to_string()),
    };

    let artifacts = write_artifacts(args, &output.report);

    match output.outcome {
        Ok(()) => {
            artifacts?;
            let code = verdict_exit_code(output.report.verdict);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            // Violations keep their exit code even when an artifact could not be written.
            if let Err(artifact_err) = artifacts {
                eprintln!("modguard error: {artifact_err:#}");
            }
            std::process::exit(err.exit_code());
        }
    }
}

/// Best-effort report write, message on stderr, exit 1.
fn fail_runtime(args: &VerifyArgs, report: &ModguardReport, message: &str) -> ! {
    if let Some(path) = &args.report_out {
        let _ = write_report_file(path, report);
    }
    eprintln!("modguard error: {message}");
    std::process::exit(1);
}

fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    if !path.exists() {
        tracing::debug!(config = %path, "no config file; using defaults");
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
}

fn write_artifacts(args: &VerifyArgs, report: &ModguardReport) -> anyhow::Result<()> {
    if let Some(path) = &args.report_out {
        write_report_file(path, report).context("write report json")?;
    }
    if args.write_markdown {
        write_text_file(&args.markdown_out, &render_markdown(report)).context("write markdown")?;
    }
    Ok(())
}

fn write_report_file(path: &Utf8Path, report: &ModguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<ModguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let md = render_markdown(&read_report(report_path)?);

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&report, max) {
        println!("{annotation}");
    }
    Ok(())
}
