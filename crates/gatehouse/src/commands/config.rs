//! Config command - show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde::Serialize;

use super::{Context, print_field};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Print the user config file path
    Path,
}

/// Effective configuration for JSON output.
#[derive(Debug, Serialize)]
struct ConfigOutput {
    endpoint: Option<String>,
    project_id: Option<String>,
    timeout_secs: u64,
    cache_enabled: bool,
    cache_duration_secs: u64,
    sources: Vec<String>,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<ExitCode> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<ExitCode> {
    let settings = &ctx.settings;
    let output = ConfigOutput {
        endpoint: settings.endpoint.clone(),
        project_id: settings.project_id.clone(),
        timeout_secs: settings.timeout().as_secs(),
        cache_enabled: settings.cache_enabled(),
        cache_duration_secs: settings.cache_duration().as_secs(),
        sources: ctx.sources.iter().map(|p| p.display().to_string()).collect(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    let dim = Style::new().dim();
    let unset = || dim.apply_to("(not set)").to_string();

    println!();
    println!("{}", style("Gatehouse Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    print_field("Endpoint", output.endpoint.unwrap_or_else(unset));
    print_field("Project", output.project_id.unwrap_or_else(unset));
    print_field("Timeout", format!("{}s", output.timeout_secs));
    print_field(
        "Cache",
        if output.cache_enabled {
            format!("enabled, cleared every {}s", output.cache_duration_secs)
        } else {
            "disabled".to_string()
        },
    );
    if output.sources.is_empty() {
        print_field("Loaded from", dim.apply_to("defaults and environment only"));
    } else {
        for source in &output.sources {
            print_field("Loaded from", source);
        }
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

fn cmd_path(ctx: &Context) -> Result<ExitCode> {
    let path = gatehouse_config::xdg_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "path": path.display().to_string() }));
    } else {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
