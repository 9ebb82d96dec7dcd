use anyhow::Result;
use std::sync::Arc;

use crate::{config::Config, pvgis::PvgisClient};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub upstream: PvgisClient,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.check_timeouts()?;
        let upstream = PvgisClient::new(&cfg.upstream)?;
        Ok(Self {
            cfg: Arc::new(cfg),
            upstream,
        })
    }
}
