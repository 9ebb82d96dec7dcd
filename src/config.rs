use anyhow::{ensure, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub upstream: UpstreamConfig,
    #[validate(nested)]
    pub estimate: EstimateConfig,
    #[validate(nested)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Origin allowed to call the service from a browser.
    pub cors_origin: String,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Where and how the forwarding service reaches PVGIS.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpstreamConfig {
    #[validate(url)]
    pub base_url: String,
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://re.jrc.ec.europa.eu/api/v5_2/PVcalc".to_string(),
            timeout_seconds: 10,
            user_agent: "Solar-Data-Tool/1.0".to_string(),
        }
    }
}

/// Fixed PVcalc parameters the client attaches to every estimate request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateConfig {
    #[validate(range(min = 0.0, max = 100.0))]
    pub loss_percent: f64,
    pub radiation_database: String,
    pub optimal_angles: bool,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            loss_percent: 14.0,
            radiation_database: "PVGIS-SARAH2".to_string(),
            optimal_angles: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Selects `production_base_url` over `development_base_url`.
    pub production: bool,
    pub development_base_url: String,
    pub production_base_url: String,
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
    pub default_size: String,
}

impl ClientConfig {
    pub fn api_base_url(&self) -> &str {
        if self.production {
            &self.production_base_url
        } else {
            &self.development_base_url
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            production: false,
            development_base_url: "http://localhost:3001".to_string(),
            production_base_url: "http://127.0.0.1:3001".to_string(),
            timeout_seconds: 15,
            default_size: "10".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml")),
        )
    }

    /// Applies the environment layers on top of `base` and validates the result.
    pub fn from_figment(base: Figment) -> Result<Self> {
        let figment = base
            .merge(Env::prefixed("SOLAR__").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(
                Env::raw()
                    .only(&["CORS_ORIGIN"])
                    .map(|_| "server.cors_origin".into()),
            );
        let cfg: Config = figment.extract().context("invalid configuration")?;
        cfg.validate().context("configuration out of range")?;
        cfg.check_timeouts()?;
        Ok(cfg)
    }

    /// The inbound request timeout has to outlast the PVGIS call, otherwise a
    /// slow upstream is cut off by the router before it can be reported.
    pub fn check_timeouts(&self) -> Result<()> {
        ensure!(
            self.server.request_timeout_secs > self.upstream.timeout_seconds,
            "server.request_timeout_secs ({}) must be greater than upstream.timeout_seconds ({})",
            self.server.request_timeout_secs,
            self.upstream.timeout_seconds
        );
        Ok(())
    }
}
