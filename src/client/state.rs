use thiserror::Error;

use crate::pvgis::SolarEstimate;

use super::request::SolarEstimateRequest;

/// Why a fetch produced no estimate. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}. Please try again.")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Received invalid solar data. Please try again.")]
    InvalidData { reason: String },
}

/// An estimate together with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedEstimate {
    pub request: SolarEstimateRequest,
    pub estimate: SolarEstimate,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(Box<CompletedEstimate>),
    Failed(FetchError),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn estimate(&self) -> Option<&CompletedEstimate> {
        match self {
            Self::Success(completed) => Some(completed),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
