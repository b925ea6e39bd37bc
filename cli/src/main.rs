use std::process::ExitCode;

use clap::Parser;

mod commands;
mod error;
mod logging;

use commands::cli;
use error::CliError;
use s3lens_core::api as core_api;
use s3lens_core::config;

#[tokio::main]
async fn main() -> ExitCode {
    match run(cli::Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("s3lens: {}", error::report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args) -> Result<(), CliError> {
    let (mut cfg, source) = config::load_with_source(args.config.as_deref())?;
    if let Some(profile) = args.profile.clone() {
        cfg.profile = profile;
    }
    if let Some(region) = args.region.clone() {
        cfg.region = region;
    }
    config::validate(&cfg)?;
    ensure_stdout_reserved(&cfg, &args.command)?;

    let _log_guard = logging::init(&cfg.logging)?;
    let source = source.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());
    tracing::debug!(target: "s3lens.config", source = %source, "configuration loaded");
    tracing::info!(
        target: "s3lens.cli",
        profile = %cfg.profile,
        region = %cfg.region,
        "using credentials profile"
    );

    let ctx = core_api::AppContext::new(cfg).await?;
    let result = dispatch(args.command, &ctx).await;
    ctx.shutdown().await;
    result
}

/// `invoke` and `serve` own stdout; an audit trail there would interleave
/// with their replies.
fn ensure_stdout_reserved(
    cfg: &core_api::AppConfig,
    cmd: &cli::Commands,
) -> Result<(), CliError> {
    let owns_stdout = matches!(cmd, cli::Commands::Invoke(_) | cli::Commands::Serve);
    if owns_stdout && cfg.audit.writes_to_stdout() {
        return Err(core_api::ConfigError::Validation(format!(
            "audit.path `{}` would mix audit events into command output; use `{}` or a file",
            core_api::AUDIT_STDOUT_SINK,
            core_api::AUDIT_STDERR_SINK
        ))
        .into());
    }
    Ok(())
}

async fn dispatch(cmd: cli::Commands, ctx: &core_api::AppContext) -> Result<(), CliError> {
    let dispatcher = s3lens_plugins::services::build_dispatcher(ctx).await?;
    match cmd {
        cli::Commands::Invoke(invoke_args) => {
            commands::invoke::handle_invoke(invoke_args, &dispatcher).await
        }
        cli::Commands::Operations => {
            commands::invoke::handle_operations(&dispatcher);
            Ok(())
        }
        cli::Commands::Tool => commands::invoke::handle_tool(&dispatcher),
        cli::Commands::Serve => commands::serve::handle_serve(&dispatcher).await,
    }
}
