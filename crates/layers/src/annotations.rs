use foundation::color::Color;
use foundation::coords::LatLon;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEARCH_LABEL: &str = "Search location";

/// Result of a place search, pinned with a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPoint {
    pub position: LatLon,
    #[serde(default)]
    pub label: Option<String>,
}

impl SearchPoint {
    pub fn new(position: LatLon, label: Option<String>) -> Self {
        Self { position, label }
    }

    pub fn popup_text(&self) -> &str {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_SEARCH_LABEL)
    }
}

/// Circle highlighting a location at risk.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBubble {
    pub center: LatLon,
    pub radius_m: f64,
    pub color: Color,
}
