//! Turns the request state into something a UI can draw
//!
//! A [`View`] is plain data. Its `Display` impl is the text front end used by
//! the terminal client; a graphical front end reads the same fields.

use chrono::Month;
use serde_json::Value;
use std::fmt;

use crate::pvgis::SolarEstimate;

use super::{
    size::SystemSizeInput,
    state::{CompletedEstimate, RequestState},
};

const BAR_WIDTH: usize = 40;

const TOTALS: [(&str, &str, &str); 3] = [
    ("Daily energy", "E_d", "kWh"),
    ("Monthly energy", "E_m", "kWh"),
    ("Yearly energy", "E_y", "kWh"),
];

const LOSSES: [(&str, &str, &str); 4] = [
    ("Angle of incidence", "l_aoi", "%"),
    ("Spectral", "l_spec", "%"),
    ("Temperature and irradiance", "l_tg", "%"),
    ("Total", "l_total", "%"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Idle { hint: String },
    Loading,
    Error { message: String },
    Results(ResultsPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub coordinates: String,
    pub peak_power: String,
    pub optimal_angles: Option<AnglesRow>,
    pub totals: Vec<Row>,
    pub losses: Vec<Row>,
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnglesRow {
    pub slope: String,
    pub azimuth: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub energy_kwh: f64,
}

/// Numbers get two decimals, strings pass through, missing fields read `n/a`.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "n/a".to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format!("{f:.2}"),
            None => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Short month name for a 1-based index; out-of-range indices stay numeric.
pub fn month_label(index: u32) -> String {
    u8::try_from(index)
        .ok()
        .and_then(|i| Month::try_from(i).ok())
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_else(|| index.to_string())
}

/// A usable size with a marker always has a request behind it, so `Idle`
/// only needs a hint for a bad size or a missing click.
pub fn render(state: &RequestState, size: &SystemSizeInput) -> View {
    match state {
        RequestState::Idle => View::Idle {
            hint: size
                .parsed()
                .hint()
                .unwrap_or("Click on your location to get solar data")
                .to_string(),
        },
        RequestState::Loading => View::Loading,
        RequestState::Failed(err) => View::Error {
            message: err.to_string(),
        },
        RequestState::Success(completed) => View::Results(ResultsPanel::new(completed)),
    }
}

impl ResultsPanel {
    pub fn new(completed: &CompletedEstimate) -> Self {
        let estimate = &completed.estimate;
        Self {
            coordinates: completed.request.location.to_string(),
            peak_power: format!("{:.2}", completed.request.peak_power_kw),
            optimal_angles: estimate.optimal_angles().map(|a| AnglesRow {
                slope: format_value(Some(&a.slope)),
                azimuth: format_value(Some(&a.azimuth)),
            }),
            totals: rows(estimate, &TOTALS),
            losses: rows(estimate, &LOSSES),
            chart: estimate
                .outputs
                .monthly
                .fixed
                .iter()
                .map(|m| ChartBar {
                    label: month_label(m.month),
                    energy_kwh: m.energy_kwh,
                })
                .collect(),
        }
    }

    /// Row value for a totals label, e.g. `"Yearly energy"`.
    pub fn total(&self, label: &str) -> Option<&str> {
        self.totals
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

fn rows(estimate: &SolarEstimate, fields: &[(&'static str, &str, &'static str)]) -> Vec<Row> {
    fields
        .iter()
        .map(|&(label, key, unit)| Row {
            label,
            value: format_value(estimate.total(key)),
            unit,
        })
        .collect()
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Idle { hint } => writeln!(f, "{hint}"),
            View::Loading => writeln!(f, "Loading solar data..."),
            View::Error { message } => writeln!(f, "[error] {message}"),
            View::Results(panel) => write!(f, "{panel}"),
        }
    }
}

impl fmt::Display for ResultsPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solar Data Results")?;
        writeln!(f, "Location: {}", self.coordinates)?;
        writeln!(f, "System size: {} kWp", self.peak_power)?;
        if let Some(angles) = &self.optimal_angles {
            writeln!(
                f,
                "Optimal angles: slope {}°, azimuth {}°",
                angles.slope, angles.azimuth
            )?;
        }

        writeln!(f, "\nEnergy production")?;
        for row in &self.totals {
            writeln!(f, "  {:<28} {:>10} {}", row.label, row.value, row.unit)?;
        }
        writeln!(f, "\nLosses")?;
        for row in &self.losses {
            writeln!(f, "  {:<28} {:>10} {}", row.label, row.value, row.unit)?;
        }

        writeln!(f, "\nMonthly energy (kWh)")?;
        let max = self
            .chart
            .iter()
            .map(|b| b.energy_kwh)
            .fold(0.0_f64, f64::max);
        for bar in &self.chart {
            let len = if max > 0.0 && bar.energy_kwh > 0.0 {
                ((bar.energy_kwh / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                f,
                "  {:>3} {:<width$} {:.2}",
                bar.label,
                "#".repeat(len),
                bar.energy_kwh,
                width = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}
