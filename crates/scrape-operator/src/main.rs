//! Scrape Operator
//!
//! Offline front end for the scrape config compiler: renders `ScrapeConfig`
//! manifests into the agent's `scrape_configs` document, or prints the CRD.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scrape_operator::compiler::compile_all;
use scrape_operator::config::ScrapeDefaults;
use scrape_operator::crd::ScrapeConfig;
use scrape_operator::secrets::SecretCache;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Scrape Operator
#[derive(Parser, Debug)]
#[command(name = "scrape-operator")]
#[command(about = "Compiles ScrapeConfig resources into metrics agent scrape configuration")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: Level,

    /// Enable JSON log format
    #[arg(long, env = "LOG_JSON", default_value = "false", global = true)]
    log_json: bool,

    /// Print CRD YAML and exit
    #[arg(long)]
    print_crd: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile ScrapeConfig manifests and print the scrape_configs document
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// ScrapeConfig manifest files, each may hold several YAML documents
    #[arg(long = "resource", required = true)]
    resources: Vec<PathBuf>,

    /// Secret cache snapshot (YAML)
    #[arg(long)]
    secrets: Option<PathBuf>,

    /// Operator defaults file (YAML); flags below override it
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Minimum scrape interval
    #[arg(long, env = "MIN_SCRAPE_INTERVAL")]
    min_scrape_interval: Option<String>,

    /// Maximum scrape interval
    #[arg(long, env = "MAX_SCRAPE_INTERVAL")]
    max_scrape_interval: Option<String>,

    /// Label receiving the resource namespace on every job
    #[arg(long, env = "ENFORCED_NAMESPACE_LABEL")]
    enforced_namespace_label: Option<String>,

    /// Force honor_labels to false on every job
    #[arg(long, env = "OVERRIDE_HONOR_LABELS")]
    override_honor_labels: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_crd {
        print_crd()?;
        return Ok(());
    }

    init_logging(&args)?;

    match args.command {
        Some(Command::Render(render_args)) => render(render_args),
        None => bail!("nothing to do: pass --print-crd or the render subcommand"),
    }
}

/// Initialize logging subsystem
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(false);

    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let defaults = load_defaults(&args)?;

    let cache = match &args.secrets {
        Some(path) => {
            let input = read(path)?;
            SecretCache::from_yaml(&input)
                .with_context(|| format!("Failed to parse secret cache {}", path.display()))?
        }
        None => SecretCache::new(),
    };

    let mut resources = Vec::new();
    for path in &args.resources {
        resources.extend(load_resources(path)?);
    }

    info!(
        resources = resources.len(),
        cached_secrets = cache.len(),
        "Rendering scrape configuration"
    );

    let out = compile_all(&resources, &defaults, &cache, &CancellationToken::new())
        .context("Compilation pass failed")?;
    print!("{}", out.file.to_yaml()?);

    for failure in &out.failures {
        error!(
            name = %failure.name,
            namespace = %failure.namespace,
            error = %failure.error,
            "ScrapeConfig skipped"
        );
    }
    if !out.is_complete() {
        bail!("{} resource(s) failed to compile", out.failures.len());
    }

    Ok(())
}

fn load_defaults(args: &RenderArgs) -> Result<ScrapeDefaults> {
    let mut defaults = match &args.defaults {
        Some(path) => ScrapeDefaults::from_yaml(&read(path)?)
            .with_context(|| format!("Failed to parse defaults {}", path.display()))?,
        None => ScrapeDefaults::default(),
    };

    if let Some(min) = &args.min_scrape_interval {
        defaults.min_scrape_interval = Some(min.clone());
    }
    if let Some(max) = &args.max_scrape_interval {
        defaults.max_scrape_interval = Some(max.clone());
    }
    if let Some(label) = &args.enforced_namespace_label {
        defaults.enforced_namespace_label = Some(label.clone());
    }
    if args.override_honor_labels {
        defaults.override_honor_labels = true;
    }

    Ok(defaults)
}

fn load_resources(path: &Path) -> Result<Vec<ScrapeConfig>> {
    let input = read(path)?;
    serde_yaml::Deserializer::from_str(&input)
        .map(|document| {
            ScrapeConfig::deserialize(document)
                .with_context(|| format!("Failed to parse ScrapeConfig in {}", path.display()))
        })
        .collect()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Print the CRD YAML for installation
fn print_crd() -> Result<()> {
    use kube::CustomResourceExt;

    let crd = ScrapeConfig::crd();
    let yaml = serde_yaml::to_string(&crd)?;
    println!("{}", yaml);

    Ok(())
}
