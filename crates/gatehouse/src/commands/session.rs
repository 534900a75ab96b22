//! Session command - info, refresh and invalidate.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};
use gatehouse_client::InvalidateType;

use super::signin::{expiration_display, print_token};
use super::{Context, print_field, print_ok, report};

/// Arguments for the session command.
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Show the owner and expiry of a session token
    Info {
        /// Session token
        token: String,
    },

    /// Trade a session token for a new one
    Refresh {
        /// Session token
        token: String,
    },

    /// Invalidate a session
    Invalidate {
        /// Session token
        token: String,
        /// Scope: only_this, all or all_but_this
        #[arg(long, default_value = "only_this")]
        scope: InvalidateType,
    },
}

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<ExitCode> {
    let client = ctx.client()?;

    let code = match args.command {
        SessionCommand::Info { token } => {
            let outcome = client.session().info(&token).await?;
            report(ctx, outcome, |info| {
                print_ok(&format!("Session belongs to {}", info.email));
                print_field("Expires", expiration_display(info.expiration));
                print_field("Refreshes left", info.refresh_left);
            })?
        }
        SessionCommand::Refresh { token } => {
            let outcome = client.session().refresh(&token).await?;
            report(ctx, outcome, print_token)?
        }
        SessionCommand::Invalidate { token, scope } => {
            let outcome = client.session().invalidate(&token, scope).await?;
            report(ctx, outcome, |_| {
                print_ok(&format!("Session invalidated ({scope})"));
            })?
        }
    };

    client.shutdown().await;
    Ok(code)
}
