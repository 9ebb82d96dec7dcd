use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `PVcalc` response body, as far as the client needs to understand it.
///
/// `inputs` and `meta` stay opaque JSON. Inside `outputs` only the structure is
/// enforced: a body without `outputs.totals.fixed` or `outputs.monthly.fixed`
/// fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarEstimate {
    #[serde(default)]
    pub inputs: Value,
    pub outputs: EstimateOutputs,
    #[serde(default)]
    pub meta: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateOutputs {
    pub totals: Totals,
    pub monthly: Monthly,
}

/// Yearly totals keyed by PVGIS field name (`E_d`, `E_y`, `l_aoi`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub fixed: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monthly {
    pub fixed: Vec<MonthlyEnergy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEnergy {
    /// 1-based month index.
    pub month: u32,
    #[serde(rename = "E_m")]
    pub energy_kwh: f64,
}

/// Tilt and azimuth PVGIS computed for the location.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalAngles {
    pub slope: Value,
    pub azimuth: Value,
}

impl SolarEstimate {
    /// A totals field by its PVGIS name.
    pub fn total(&self, key: &str) -> Option<&Value> {
        self.outputs.totals.fixed.get(key)
    }

    /// Present only when PVGIS flags the mounting angles as optimised.
    pub fn optimal_angles(&self) -> Option<OptimalAngles> {
        let fixed = self.inputs.pointer("/mounting_system/fixed")?;
        let optimal = |name: &str| {
            fixed
                .pointer(&format!("/{name}/optimal"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        if !optimal("slope") && !optimal("azimuth") {
            return None;
        }
        Some(OptimalAngles {
            slope: fixed.pointer("/slope/value")?.clone(),
            azimuth: fixed.pointer("/azimuth/value")?.clone(),
        })
    }
}
