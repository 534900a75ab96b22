//! Signin command - email and social sign-in flows.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};
use gatehouse_client::{SessionToken, SocialType};

use super::{Context, print_field, print_ok, report};

/// Arguments for the signin command.
#[derive(Args, Debug)]
pub struct SigninArgs {
    #[command(subcommand)]
    pub command: SigninCommand,
}

#[derive(Subcommand, Debug)]
pub enum SigninCommand {
    /// Email a one-time sign-in code
    Email {
        /// Email address to send the code to
        email: String,
    },

    /// Exchange an emailed code for a session token
    VerifyEmail {
        /// Email address the code was sent to
        email: String,
        /// The one-time code
        code: String,
    },

    /// Get the provider URL for a social sign-in
    Social {
        /// Provider: google, microsoft or apple
        social_type: SocialType,
    },

    /// Exchange a provider authorization code for a session token
    VerifySocial {
        /// Provider: google, microsoft or apple
        social_type: SocialType,
        /// Authorization code returned by the provider
        authorization_code: String,
    },
}

/// Run the signin command.
pub async fn run(args: SigninArgs, ctx: &Context) -> Result<ExitCode> {
    let client = ctx.client()?;

    let code = match args.command {
        SigninCommand::Email { email } => {
            let outcome = client.signin().email(&email).await?;
            report(ctx, outcome, |_| print_ok(&format!("Code sent to {email}")))?
        }
        SigninCommand::VerifyEmail { email, code } => {
            let outcome = client.signin().email_verify(&email, &code).await?;
            report(ctx, outcome, print_token)?
        }
        SigninCommand::Social { social_type } => {
            let outcome = client.signin().social(social_type).await?;
            report(ctx, outcome, |signin| {
                print_ok(&format!("Continue {social_type} sign-in at:"));
                println!("  {}", signin.signin_url);
            })?
        }
        SigninCommand::VerifySocial {
            social_type,
            authorization_code,
        } => {
            let outcome = client
                .signin()
                .social_verify(social_type, &authorization_code)
                .await?;
            report(ctx, outcome, print_token)?
        }
    };

    client.shutdown().await;
    Ok(code)
}

/// Human-readable summary of an issued token.
pub(crate) fn print_token(token: &SessionToken) {
    print_ok(&format!("Signed in as {}", token.email));
    print_field("Token", &token.session_token);
    print_field("Expires", expiration_display(token.expiration));
    print_field("Refreshes left", token.refresh_left);
}

/// Format a unix timestamp for display.
pub(crate) fn expiration_display(expiration: i64) -> String {
    chrono::DateTime::from_timestamp(expiration, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| expiration.to_string())
}
