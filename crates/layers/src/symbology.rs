use foundation::color::Color;
use serde::Serialize;

pub const MASK_COLOR: Color = Color::from_hex(0x020617);
pub const AOI_STROKE: Color = Color::from_hex(0xfacc15);
pub const AOI_FILL: Color = Color::from_hex(0xfde047);
pub const RESULT_STROKE: Color = Color::from_hex(0x0ea5e9);
pub const RESULT_FILL: Color = Color::from_hex(0x22c1f1);
pub const REGION_COLORS: [Color; 3] = [
    Color::from_hex(0x22c55e),
    Color::from_hex(0x3b82f6),
    Color::from_hex(0xec4899),
];

const AOI_FILL_OPACITY: f32 = 0.08;
const AOI_RISK_FILL_OPACITY: f32 = 0.18;

/// Paint options handed to the renderer. Fields a layer kind does not use
/// stay at their defaults.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    pub stroke_weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    pub fill_opacity: f32,
}

impl LayerStyle {
    pub const fn new(
        opacity: f32,
        stroke: Option<Color>,
        stroke_weight: f32,
        fill: Option<Color>,
        fill_opacity: f32,
    ) -> Self {
        Self {
            opacity,
            stroke,
            stroke_weight,
            fill,
            fill_opacity,
        }
    }

    pub const fn image(opacity: f32) -> Self {
        Self::new(opacity, None, 0.0, None, 0.0)
    }

    pub const fn outline(stroke: Color, weight: f32) -> Self {
        Self::new(1.0, Some(stroke), weight, None, 0.0)
    }

    pub const fn area(stroke: Color, weight: f32, fill: Color, fill_opacity: f32) -> Self {
        Self::new(1.0, Some(stroke), weight, Some(fill), fill_opacity)
    }

    pub const fn mask() -> Self {
        Self::new(1.0, Some(MASK_COLOR), 0.0, Some(MASK_COLOR), 0.6)
    }

    /// A risk color, when given, replaces the AOI fill and makes it stronger.
    pub fn aoi(fill_override: Option<Color>) -> Self {
        match fill_override {
            Some(fill) => Self::area(AOI_STROKE, 3.0, fill, AOI_RISK_FILL_OPACITY),
            None => Self::area(AOI_STROKE, 3.0, AOI_FILL, AOI_FILL_OPACITY),
        }
    }

    pub const fn result() -> Self {
        Self::area(RESULT_STROKE, 1.6, RESULT_FILL, 0.75)
    }

    pub const fn bubble(color: Color) -> Self {
        Self::area(color, 3.0, color, 0.25)
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::image(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{AOI_FILL, LayerStyle};
    use foundation::color::Color;

    #[test]
    fn aoi_fill_override() {
        let plain = LayerStyle::aoi(None);
        assert_eq!(plain.fill, Some(AOI_FILL));
        assert_eq!(plain.fill_opacity, 0.08);

        let red = Color::from_hex(0xef4444);
        let risky = LayerStyle::aoi(Some(red));
        assert_eq!(risky.fill, Some(red));
        assert_eq!(risky.fill_opacity, 0.18);
        assert_eq!(risky.stroke, plain.stroke);
    }
}
