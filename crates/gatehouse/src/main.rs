//! Gatehouse - command-line client for the Gatehouse authentication service
//!
//! Main entry point for the Gatehouse CLI.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, session, signin};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Gatehouse - sign users in and manage sessions
#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Service endpoint (host, or URL with scheme)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Project identifier
    #[arg(long, global = true)]
    pub project_id: Option<String>,

    /// Disable the session cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign a user in by email code or social provider
    Signin(signin::SigninArgs),

    /// Inspect, refresh or invalidate a session
    Session(session::SessionArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "gatehouse=debug,gatehouse_client=debug,gatehouse_session=debug,warn"
    } else {
        "gatehouse=warn,gatehouse_client=warn,gatehouse_session=warn,error"
    };

    let log_dir = gatehouse_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "gatehouse.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "gatehouse=trace,gatehouse_client=trace,gatehouse_session=trace,info",
                )),
        )
        .init();

    // Resolve configuration: files, then environment, then flags
    let loaded = gatehouse_config::load_config(None)?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    let sources = loaded
        .loaded_from()
        .into_iter()
        .map(std::path::Path::to_path_buf)
        .collect();
    let mut settings = loaded.config;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = Some(endpoint);
    }
    if let Some(project_id) = cli.project_id {
        settings.project_id = Some(project_id);
    }
    if cli.no_cache {
        settings
            .cache
            .get_or_insert_with(Default::default)
            .enabled = Some(false);
    }

    // Create context for commands
    let ctx = commands::Context {
        settings,
        sources,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Signin(args) => signin::run(args, &ctx).await,
        Commands::Session(args) => session::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
