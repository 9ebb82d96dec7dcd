use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::pvgis::UpstreamError;

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON body of every failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(e) => e.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            ApiError::Upstream(e) => ErrorEnvelope {
                error: "Failed to fetch solar data".to_string(),
                details: e.details(),
                code: Some(e.code().to_string()),
            },
            ApiError::Internal(message) => ErrorEnvelope {
                error: "Internal server error".to_string(),
                details: Value::String(message.clone()),
                code: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope = self.envelope();

        match &self {
            ApiError::Upstream(UpstreamError::Rejected { status, body }) => {
                tracing::error!(
                    error = %self,
                    code = envelope.code.as_deref(),
                    upstream_status = status.as_u16(),
                    upstream_body = %body,
                    "PVGIS rejected request"
                );
            }
            ApiError::Upstream(UpstreamError::InvalidBody(_)) => {
                tracing::error!(
                    error = %self,
                    code = envelope.code.as_deref(),
                    "PVGIS answered with a body that is not JSON"
                );
            }
            ApiError::Upstream(_) => {
                tracing::error!(
                    error = %self,
                    code = envelope.code.as_deref(),
                    "no response received from PVGIS"
                );
            }
            ApiError::Internal(_) => tracing::error!(error = %self, "unhandled error"),
        }

        (status, Json(envelope)).into_response()
    }
}
