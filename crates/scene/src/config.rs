use std::path::Path;

use foundation::bounds::BoundingBox;
use foundation::coords::LatLon;
use layers::risk::RiskThresholds;
use layers::stack::LayerConfig;
use serde::{Deserialize, Serialize};

/// Camera and masking constants of the operating region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_center: LatLon,
    pub default_zoom: u8,
    /// Zoom used when the camera snaps to an explicit center.
    pub override_zoom: u8,
    pub fit_padding_px: [u32; 2],
    /// Outer rectangle of the dimming mask. Must contain every expected AOI.
    pub mask_world: BoundingBox,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_center: LatLon::new(10.75, 106.7),
            default_zoom: 10,
            override_zoom: 13,
            fit_padding_px: [20, 20],
            mask_world: BoundingBox::new(3.0, 95.0, 25.0, 115.0),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub layers: LayerConfig,
    pub risk: RiskThresholds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: MapConfig =
            serde_json::from_str(payload).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.base_layers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one base layer is required".to_string(),
            ));
        }
        if !self.view.mask_world.is_valid() {
            return Err(ConfigError::Invalid(
                "mask_world must have a positive, finite extent".to_string(),
            ));
        }
        if !self.view.default_center.is_finite() {
            return Err(ConfigError::Invalid(
                "default_center must be finite".to_string(),
            ));
        }
        let (medium, high) = (self.risk.rain_3d_medium_mm, self.risk.rain_3d_high_mm);
        if medium.is_nan() || high.is_nan() || medium > high {
            return Err(ConfigError::Invalid(format!(
                "risk thresholds out of order: medium {medium} > high {high}"
            )));
        }
        Ok(())
    }
}
