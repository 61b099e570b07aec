use foundation::color::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn color(self) -> Color {
        match self {
            RiskLevel::Low => Color::from_hex(0x22c55e),
            RiskLevel::Medium => Color::from_hex(0xf97316),
            RiskLevel::High => Color::from_hex(0xef4444),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Three-day accumulated rainfall thresholds, in millimetres. Both bounds
/// are inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub rain_3d_medium_mm: f64,
    pub rain_3d_high_mm: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            rain_3d_medium_mm: 40.0,
            rain_3d_high_mm: 80.0,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, rain_3d_mm: f64) -> RiskLevel {
        if rain_3d_mm >= self.rain_3d_high_mm {
            RiskLevel::High
        } else if rain_3d_mm >= self.rain_3d_medium_mm {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RiskLevel, RiskThresholds};

    #[test]
    fn thresholds_are_inclusive() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0.0), RiskLevel::Low);
        assert_eq!(t.classify(39.99), RiskLevel::Low);
        assert_eq!(t.classify(40.0), RiskLevel::Medium);
        assert_eq!(t.classify(79.9), RiskLevel::Medium);
        assert_eq!(t.classify(80.0), RiskLevel::High);
        assert_eq!(t.classify(250.0), RiskLevel::High);
    }

    #[test]
    fn nan_rain_is_low() {
        assert_eq!(RiskThresholds::default().classify(f64::NAN), RiskLevel::Low);
    }

    #[test]
    fn colors_follow_level() {
        assert_eq!(RiskLevel::High.color().to_string(), "#ef4444");
        assert_eq!(RiskLevel::Medium.color().to_string(), "#f97316");
        assert_eq!(RiskLevel::Low.color().to_string(), "#22c55e");
    }
}
