use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::UpstreamConfig;

/// Envelope code for a 2xx upstream answer whose body is not JSON.
pub const INVALID_BODY_CODE: &str = "ERR_INVALID_BODY";

/// Why a forwarded PVGIS call produced no usable body.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("PVGIS returned HTTP {status}")]
    Rejected { status: StatusCode, body: Value },

    #[error("PVGIS request timed out: {0}")]
    Timeout(String),

    #[error("could not connect to PVGIS: {0}")]
    Connect(String),

    #[error("PVGIS request failed: {0}")]
    Transport(String),

    #[error("PVGIS returned a body that is not JSON: {0}")]
    InvalidBody(String),
}

impl UpstreamError {
    /// Status the forwarding service answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Rejected { status, .. } => *status,
            UpstreamError::InvalidBody(_) => StatusCode::BAD_GATEWAY,
            UpstreamError::Timeout(_) | UpstreamError::Connect(_) | UpstreamError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable failure code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Rejected { status, .. } if status.is_client_error() => {
                "ERR_BAD_REQUEST"
            }
            UpstreamError::Rejected { .. } => "ERR_BAD_RESPONSE",
            UpstreamError::InvalidBody(_) => INVALID_BODY_CODE,
            UpstreamError::Timeout(_) => "ECONNABORTED",
            UpstreamError::Connect(_) => "ECONNREFUSED",
            UpstreamError::Transport(_) => "ERR_NETWORK",
        }
    }

    /// Upstream body when there was one, otherwise the error message.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Rejected { body, .. } if !is_blank(body) => body.clone(),
            other => Value::String(other.to_string()),
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            UpstreamError::Timeout(message)
        } else if err.is_connect() {
            UpstreamError::Connect(message)
        } else {
            UpstreamError::Transport(message)
        }
    }
}

fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// HTTP client for the PVGIS `PVcalc` endpoint.
#[derive(Clone)]
pub struct PvgisClient {
    base_url: String,
    client: reqwest::Client,
}

impl PvgisClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("invalid upstream user agent")?,
        );
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one GET with `params` attached verbatim. No retries.
    ///
    /// A success body is returned as the exact text PVGIS sent, once it is
    /// known to be JSON.
    pub async fn forward(&self, params: &[(String, String)]) -> Result<String, UpstreamError> {
        debug!(url = %self.base_url, ?params, "forwarding request to PVGIS");

        let resp = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;
        let status = resp.status();
        info!(status = status.as_u16(), "PVGIS response");

        let body = resp.text().await.map_err(UpstreamError::from_reqwest)?;
        if !status.is_success() {
            let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
            return Err(UpstreamError::Rejected { status, body });
        }

        serde_json::from_str::<IgnoredAny>(&body)
            .map_err(|e| UpstreamError::InvalidBody(e.to_string()))?;
        Ok(body)
    }
}
