//! Command-line entry point.
//!
//! Product output (per-file progress, action counts) goes to stdout;
//! diagnostics and failures go to stderr, with verbosity controlled by
//! `RUST_LOG`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use txload::run::{FailurePolicy, run_load};
use txload::store::{HttpStore, regional_url};

#[derive(Parser)]
#[command(
    name = "txload",
    version,
    about = "Replays JSON transaction templates against a DynamoDB-compatible store"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every template under a directory, one transaction per file.
    Load {
        /// Directory scanned recursively for `.json` templates.
        #[arg(short, long, default_value = "./operations")]
        dir: PathBuf,
        /// Store endpoint URL, e.g. http://localhost:8000.
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Region to derive the endpoint from; wins over --endpoint.
        #[arg(short, long)]
        region: Option<String>,
        /// Redirect every write action to this table.
        #[arg(short, long)]
        table: Option<String>,
        /// Keep loading remaining files after one fails.
        #[arg(long)]
        keep_going: bool,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Load {
            dir,
            endpoint,
            region,
            table,
            keep_going,
        } => cmd_load(
            &dir,
            endpoint.as_deref(),
            region.as_deref(),
            table.as_deref(),
            keep_going,
        ),
    }
}

fn cmd_load(
    dir: &Path,
    endpoint: Option<&str>,
    region: Option<&str>,
    table: Option<&str>,
    keep_going: bool,
) -> Result<()> {
    // std::env::vars() panics on non-Unicode entries; skip them instead.
    let vars: BTreeMap<String, String> = std::env::vars_os()
        .filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        })
        .collect();
    let url = resolve_store_url(region, endpoint, &vars)?;
    let store = HttpStore::new(url)?;
    let policy = if keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let report = run_load(dir, table, &vars, &store, policy)?;
    if report.failed() > 0 {
        bail!(
            "{} of {} file(s) failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

/// Endpoint precedence: `--region`, then `--endpoint`, then `AWS_REGION` /
/// `AWS_DEFAULT_REGION` from the environment. An empty flag value counts as
/// absent, like an unset variable.
fn resolve_store_url(
    region: Option<&str>,
    endpoint: Option<&str>,
    vars: &BTreeMap<String, String>,
) -> Result<String> {
    if let Some(region) = region.filter(|value| !value.is_empty()) {
        return Ok(regional_url(region));
    }
    if let Some(endpoint) = endpoint.filter(|value| !value.is_empty()) {
        return Ok(endpoint.to_string());
    }
    for name in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Some(region) = vars.get(name).filter(|value| !value.is_empty()) {
            return Ok(regional_url(region));
        }
    }
    bail!("no store endpoint configured: pass --region or --endpoint, or set AWS_REGION")
}
