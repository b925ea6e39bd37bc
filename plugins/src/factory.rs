use std::path::Path;

use anyhow::Result;

use s3lens_core::api::{AppConfig, SessionConfig, SessionProvider};

use crate::session::{FixtureSessionProvider, GatewaySessionProvider};

pub fn build_session_provider(cfg: &AppConfig) -> Result<Box<dyn SessionProvider>> {
    match &cfg.session {
        SessionConfig::Gateway(gw_cfg) => Ok(Box::new(GatewaySessionProvider::new(gw_cfg)?)),
        SessionConfig::Fixture(fx_cfg) => Ok(Box::new(FixtureSessionProvider::from_path(
            Path::new(&fx_cfg.path),
        )?)),
    }
}
