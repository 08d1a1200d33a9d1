use clap::Args;
use serde_json::json;

use crate::cli::context::{prompt_line, CliContext};
use crate::cli::output::{output_success, output_value};
use crate::cli::session::{clear_session, save_session};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CredentialArgs {
    #[arg(help = "Email address")]
    pub email: String,
    #[arg(long, help = "Password (will prompt if not provided)")]
    pub password: Option<String>,
}

async fn password(args: &CredentialArgs) -> anyhow::Result<String> {
    match &args.password {
        Some(password) => Ok(password.clone()),
        None => prompt_line("Password: ").await,
    }
}

pub async fn login(server: Option<&str>, args: CredentialArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = password(&args).await?;
    let ctx = CliContext::connect(server, output_format).await?;
    let session = ctx.console.gate().sign_in_with_password(&args.email, &password).await?;

    let stored = ctx.stored_session()?;
    save_session(&stored)?;
    output_success(
        &ctx.output_format,
        &format!("Signed in as {}", session.email.as_deref().unwrap_or(&session.uid)),
        Some(json!({ "uid": session.uid, "server": ctx.server_url })),
    )
}

pub async fn register(server: Option<&str>, args: CredentialArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = password(&args).await?;
    let ctx = CliContext::connect(server, output_format).await?;
    let session = ctx.console.gate().register_with_password(&args.email, &password).await?;

    save_session(&ctx.stored_session()?)?;
    output_success(
        &ctx.output_format,
        &format!("Registered {}", session.email.as_deref().unwrap_or(&session.uid)),
        Some(json!({ "uid": session.uid, "server": ctx.server_url })),
    )
}

pub async fn logout(server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect(server, output_format).await?;
    ctx.console.gate().sign_out().await?;
    let removed = clear_session()?;
    let message = if removed { "Signed out" } else { "No stored session" };
    output_success(&ctx.output_format, message, None)
}

pub async fn whoami(server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect(server, output_format).await?;
    let state = ctx.session_state();
    let body = json!({
        "server": ctx.server_url,
        "authenticated": state.is_authenticated(),
        "session": state.session,
    });

    output_value(&ctx.output_format, &body, || {
        match &state.session {
            Some(session) => {
                println!("Signed in as {}", session.email.as_deref().unwrap_or("(no email)"));
                println!("UID: {}", session.uid);
            }
            None => println!("Not signed in"),
        }
        println!("Server: {}", ctx.server_url);
        Ok(())
    })
}
