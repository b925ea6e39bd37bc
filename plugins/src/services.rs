//! Wires config, session provider and policy into a ready dispatcher for the CLI.
use anyhow::{Context, Result};

use s3lens_core::api::{AppContext, CommandDispatcher};

use crate::factory;

pub async fn build_dispatcher(ctx: &AppContext) -> Result<CommandDispatcher> {
    let cfg = ctx.cfg();
    let provider = factory::build_session_provider(cfg)?;
    let handle = provider
        .create_session_handle(&cfg.profile, &cfg.region)
        .await
        .with_context(|| {
            format!(
                "failed to open {} session for profile `{}` in {}",
                provider.name(),
                cfg.profile,
                cfg.region
            )
        })?;
    Ok(ctx.build_dispatcher(handle)?)
}
