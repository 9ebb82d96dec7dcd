//! Map widget configuration and marker state
//!
//! The widget itself (tiles, panning, drawing) lives outside this crate. It is
//! handed a [`MapViewConfig`] at construction, including the marker icon, and
//! reports clicks back through [`MapView::click`].

use serde::{Deserialize, Serialize};

use super::location::{InvalidLocation, Location};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub shadow_url: String,
    /// Width and height in pixels.
    pub size: [u32; 2],
    /// Pixel of the image that sits on the clicked point.
    pub anchor: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_url: "images/marker-icon.png".to_string(),
            shadow_url: "images/marker-shadow.png".to_string(),
            size: [25, 41],
            anchor: [12, 41],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewConfig {
    pub center: Location,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub marker: MarkerIcon,
}

impl MapViewConfig {
    /// Whole of Denmark in view.
    pub fn denmark() -> Self {
        Self {
            center: Location {
                latitude: 56.26392,
                longitude: 9.501785,
            },
            zoom: 7,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            marker: MarkerIcon::default(),
        }
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self::denmark()
    }
}

#[derive(Debug, Clone)]
pub struct MapView {
    config: MapViewConfig,
    marker: Option<Location>,
}

impl MapView {
    pub fn new(config: MapViewConfig) -> Self {
        Self {
            config,
            marker: None,
        }
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    /// Position of the marker, if a location was ever picked.
    pub fn marker(&self) -> Option<Location> {
        self.marker
    }

    /// Moves the marker to the clicked point. A rejected click leaves the
    /// previous marker in place.
    pub fn click(&mut self, latitude: f64, longitude: f64) -> Result<Location, InvalidLocation> {
        let location = Location::new(latitude, longitude)?;
        self.marker = Some(location);
        Ok(location)
    }
}
