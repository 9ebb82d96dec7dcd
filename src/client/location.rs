use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::Validate;

/// A point picked on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid location ({latitude}, {longitude}): {reason}")]
pub struct InvalidLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub reason: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLocation> {
        let invalid = |reason: String| InvalidLocation {
            latitude,
            longitude,
            reason,
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("coordinates must be finite".to_string()));
        }
        let location = Self {
            latitude,
            longitude,
        };
        location.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}
