//! tidescaled — the Tidescale daemon.
//!
//! Loads `tidescale.toml`, builds one rule per entry, and hands them to the
//! supervisor. Exits non-zero when a rule fails.
//!
//! # Usage
//!
//! ```text
//! tidescaled run --config /etc/tidescale.toml --policy fail-fast
//! tidescaled check --config /etc/tidescale.toml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tidescale_config::Config;
use tidescale_engine::{FailurePolicy, Supervisor, SupervisorReport};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tidescaled", about = "Tidescale autoscaling daemon", version)]
struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch every configured rule and scale services.
    Run {
        /// Configuration file.
        #[arg(short, long, default_value = "tidescale.toml")]
        config: PathBuf,

        /// What to do when a rule fails: fail-fast or isolate.
        #[arg(long, default_value = "fail-fast")]
        policy: FailurePolicy,
    },
    /// Validate the configuration and print it as JSON.
    Check {
        /// Configuration file.
        #[arg(short, long, default_value = "tidescale.toml")]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Run { config, policy } => run(&config, policy, shutdown_signal()).await,
        Command::Check { config } => check(&config),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tidescale=debug"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(
    path: &Path,
    policy: FailurePolicy,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let rules = load(path)?.build_rules().context("invalid configuration")?;
    info!(rules = rules.len(), %policy, "tidescale daemon starting");

    let report = Supervisor::new(rules)
        .with_policy(policy)
        .run_until(shutdown)
        .await;

    exit_status(&report)?;
    info!("tidescale daemon stopped");
    Ok(())
}

fn check(path: &Path) -> anyhow::Result<()> {
    let config = load(path)?;
    config.validate().context("invalid configuration")?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    Config::from_file(path).with_context(|| format!("loading {}", path.display()))
}

/// Map a supervisor report to the process result.
fn exit_status(report: &SupervisorReport) -> anyhow::Result<()> {
    let Some(first) = report.first_failure() else {
        if let Some((rule, reason)) = report.aborted().next() {
            bail!("rule [{rule}] watcher aborted: {reason}");
        }
        return Ok(());
    };
    let others = report.failures().len() - 1;
    if others > 0 {
        bail!("rule [{}] failed: {} ({others} more rule(s) failed)", first.rule, first.error);
    }
    bail!("rule [{}] failed: {}", first.rule, first.error)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for ctrl-c, running until a rule fails");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
