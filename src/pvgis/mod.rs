//! PVGIS `PVcalc` integration
//!
//! The forwarding service relays requests to PVGIS untouched; the client reads
//! the handful of response fields it displays through [`SolarEstimate`].

pub mod client;
pub mod response;

pub use client::*;
pub use response::*;
