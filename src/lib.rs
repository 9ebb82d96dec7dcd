pub mod api;
pub mod client;
pub mod config;
pub mod pvgis;
pub mod state;
pub mod telemetry;
