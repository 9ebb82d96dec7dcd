use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    api::ErrorEnvelope,
    config::ClientConfig,
    pvgis::{SolarEstimate, INVALID_BODY_CODE},
};

use super::{request::SolarEstimateRequest, state::FetchError};

/// Envelope codes meaning the forwarding service never got an answer.
const NETWORK_CODES: [&str; 3] = ["ECONNABORTED", "ECONNREFUSED", "ERR_NETWORK"];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SolarFetcher: Send + Sync {
    async fn fetch(&self, request: &SolarEstimateRequest) -> Result<SolarEstimate, FetchError>;
}

/// Fetches estimates through the forwarding service's `/api/solar-data`.
#[derive(Clone)]
pub struct ForwardingClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ForwardingClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        Self::with_base_url(cfg.api_base_url(), cfg.timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            endpoint: format!("{}/api/solar-data", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SolarFetcher for ForwardingClient {
    async fn fetch(&self, request: &SolarEstimateRequest) -> Result<SolarEstimate, FetchError> {
        debug!(endpoint = %self.endpoint, ?request, "fetching solar estimate");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(unreachable_service)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(unreachable_service)?;

        if !status.is_success() {
            return Err(rejected(status, &body));
        }

        let value: Value = serde_json::from_slice(&body).map_err(|e| FetchError::InvalidData {
            reason: format!("body is not JSON: {e}"),
        })?;
        serde_json::from_value(value).map_err(|e| FetchError::InvalidData {
            reason: format!("unexpected structure: {e}"),
        })
    }
}

fn unreachable_service(err: reqwest::Error) -> FetchError {
    warn!(error = %err, "solar data service unreachable");
    if err.is_timeout() {
        FetchError::Network("the solar data service did not respond in time".to_string())
    } else {
        FetchError::Network("could not reach the solar data service".to_string())
    }
}

fn rejected(status: StatusCode, body: &[u8]) -> FetchError {
    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) else {
        return FetchError::Api(format!("the solar data service answered HTTP {status}"));
    };
    match envelope.code.as_deref() {
        Some("ECONNABORTED") => {
            FetchError::Network("the solar data provider did not respond in time".to_string())
        }
        Some(code) if NETWORK_CODES.contains(&code) => {
            FetchError::Network("could not reach the solar data provider".to_string())
        }
        Some(INVALID_BODY_CODE) => FetchError::InvalidData {
            reason: envelope_message(&envelope),
        },
        _ => FetchError::Api(envelope_message(&envelope)),
    }
}

/// Most specific human-readable text in an error envelope.
fn envelope_message(envelope: &ErrorEnvelope) -> String {
    let from_details = match &envelope.details {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => ["message", "error"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    };
    from_details.unwrap_or_else(|| envelope.error.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::location::Location;
    use crate::config::EstimateConfig;
    use crate::pvgis::response::fixtures;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(kw: f64) -> SolarEstimateRequest {
        SolarEstimateRequest::new(
            Location::new(56.0, 10.0).unwrap(),
            kw,
            &EstimateConfig::default(),
        )
    }

    fn client_for(server: &MockServer) -> ForwardingClient {
        ForwardingClient::with_base_url(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_from_config() {
        let client = ForwardingClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3001/api/solar-data");

        let client =
            ForwardingClient::with_base_url("https://solar.example.dk/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.endpoint(), "https://solar.example.dk/api/solar-data");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/solar-data"))
            .and(query_param("lat", "56"))
            .and(query_param("lon", "10"))
            .and(query_param("peakpower", "10"))
            .and(query_param("loss", "14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::pvcalc_value()))
            .expect(1)
            .mount(&server)
            .await;

        let estimate = client_for(&server).fetch(&request(10.0)).await.unwrap();
        assert_eq!(estimate.total("E_y"), Some(&json!(8775.162)));
    }

    #[tokio::test]
    async fn test_upstream_rejection_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to fetch solar data",
                "details": { "message": "bad" },
                "code": "ERR_BAD_RESPONSE"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert_eq!(err, FetchError::Api("bad".into()));
    }

    #[tokio::test]
    async fn test_network_code_becomes_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to fetch solar data",
                "details": "could not connect to PVGIS: connection refused",
                "code": "ECONNREFUSED"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert!(err.to_string().starts_with("Network error"));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Api("the solar data service answered HTTP 503 Service Unavailable".into())
        );
    }

    #[tokio::test]
    async fn test_non_json_success_is_invalid_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_relayed_non_json_success_is_invalid_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({
                "error": "Failed to fetch solar data",
                "details": "PVGIS returned a body that is not JSON: expected value at line 1 column 1",
                "code": "ERR_INVALID_BODY"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidData { .. }), "{err:?}");
        assert_eq!(
            err.to_string(),
            "Received invalid solar data. Please try again."
        );
    }

    #[tokio::test]
    async fn test_missing_outputs_is_invalid_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inputs": {} })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&request(10.0)).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client =
            ForwardingClient::with_base_url(&format!("http://{addr}"), Duration::from_secs(1))
                .unwrap();

        let err = client.fetch(&request(10.0)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Network("could not reach the solar data service".into())
        );
    }

    #[test]
    fn test_envelope_message_preference() {
        let envelope = |details: Value| ErrorEnvelope {
            error: "Failed to fetch solar data".into(),
            details,
            code: None,
        };
        assert_eq!(envelope_message(&envelope(json!({ "message": "bad" }))), "bad");
        assert_eq!(envelope_message(&envelope(json!({ "error": "lat" }))), "lat");
        assert_eq!(envelope_message(&envelope(json!("plain text"))), "plain text");
        assert_eq!(
            envelope_message(&envelope(json!(42))),
            "Failed to fetch solar data"
        );
    }
}
