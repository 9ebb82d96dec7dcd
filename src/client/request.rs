use crate::config::EstimateConfig;

use super::location::Location;

pub const PV_TECHNOLOGY: &str = "crystSi";
pub const MOUNTING_PLACE: &str = "free";
pub const OUTPUT_FORMAT: &str = "json";

/// Query parameters for one `PVcalc` estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarEstimateRequest {
    pub location: Location,
    pub peak_power_kw: f64,
    pub loss_percent: f64,
    pub radiation_database: String,
    pub optimal_angles: bool,
}

impl SolarEstimateRequest {
    pub fn new(location: Location, peak_power_kw: f64, settings: &EstimateConfig) -> Self {
        Self {
            location,
            peak_power_kw,
            loss_percent: settings.loss_percent,
            radiation_database: settings.radiation_database.clone(),
            optimal_angles: settings.optimal_angles,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lat", self.location.latitude.to_string()),
            ("lon", self.location.longitude.to_string()),
            ("peakpower", self.peak_power_kw.to_string()),
            ("loss", self.loss_percent.to_string()),
            ("raddatabase", self.radiation_database.clone()),
            ("pvtechchoice", PV_TECHNOLOGY.to_string()),
            ("mountingplace", MOUNTING_PLACE.to_string()),
            ("components", "1".to_string()),
            ("outputformat", OUTPUT_FORMAT.to_string()),
            ("optimalangles", u8::from(self.optimal_angles).to_string()),
        ]
    }
}
