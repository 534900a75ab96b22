//! CLI command handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use console::Style;
use gatehouse_client::{ApiResult, CacheConfig, ErrorCode, GatehouseClient};
use gatehouse_config::GatehouseConfig;
use serde::Serialize;

pub mod config;
pub mod session;
pub mod signin;

/// Value of the `error` field when an operation succeeded.
const NO_ERROR: &str = "none";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration after files, environment and flags.
    pub settings: GatehouseConfig,
    /// Config files that contributed to `settings`.
    pub sources: Vec<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Build and initialize a client from the effective configuration.
    pub fn client(&self) -> Result<GatehouseClient> {
        let cache = CacheConfig::new()
            .with_enabled(self.settings.cache_enabled())
            .with_cache_duration(self.settings.cache_duration());

        let endpoint = self.settings.require_endpoint()?;
        if self.verbose {
            let dim = Style::new().dim();
            eprintln!("{}", dim.apply_to(format!("Using endpoint {endpoint}")));
        }

        let client = GatehouseClient::builder()
            .endpoint(endpoint)
            .project_id(self.settings.require_project_id()?)
            .cache(cache)
            .timeout(self.settings.timeout())
            .build()?;
        Ok(client)
    }
}

/// Print an operation outcome and turn it into an exit code.
///
/// JSON output always carries an `error` field: `"none"` on success, the
/// operation's code otherwise. Payload fields sit next to it.
pub fn report<T, E>(ctx: &Context, outcome: ApiResult<T, E>, human: impl FnOnce(&T)) -> Result<ExitCode>
where
    T: Serialize,
    E: ErrorCode,
{
    match outcome {
        Ok(payload) => {
            if ctx.json_output {
                let mut value = serde_json::to_value(&payload)?;
                if !value.is_object() {
                    value = serde_json::json!({});
                }
                value["error"] = NO_ERROR.into();
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                human(&payload);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(code) => {
            if ctx.json_output {
                let value = serde_json::json!({ "error": code.as_str() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let red = Style::new().red();
                eprintln!("{} {}", red.apply_to("✗"), code);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print a success marker with a message.
pub fn print_ok(message: &str) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

/// Print a labelled field.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    let dim = Style::new().dim();
    println!("  {} {}", dim.apply_to(format!("{label}:")), value);
}
