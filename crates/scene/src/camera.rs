use formats::envelope::geometry_envelope;
use formats::geojson::GeoJson;
use foundation::bounds::{BoundingBox, Envelope};
use foundation::coords::{LatLon, LonLat};
use serde::Serialize;

use crate::config::ViewConfig;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CameraState {
    Center {
        center: LatLon,
        zoom: u8,
    },
    FitBounds {
        bounds: BoundingBox,
        padding_px: [u32; 2],
    },
}

/// Which rule produced the camera, highest priority first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    Override,
    FitToContent,
    Default,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Framing {
    pub mode: FramingMode,
    pub camera: CameraState,
}

/// Instructions for the map surface after a camera change.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    Camera(CameraState),
    /// The viewport may have been resized by layout; re-measure it.
    /// Safe to repeat.
    InvalidateSize,
}

impl Framing {
    pub fn commands(&self) -> Vec<SurfaceCommand> {
        vec![
            SurfaceCommand::Camera(self.camera),
            SurfaceCommand::InvalidateSize,
        ]
    }
}

/// Picks the camera for the current inputs.
///
/// 1. an explicit center wins, at the override zoom;
/// 2. otherwise fit the union of the AOI bounds and the result geometry;
/// 3. otherwise the configured default view.
///
/// A non-finite override is treated as absent.
pub fn frame_view(
    config: &ViewConfig,
    center_override: Option<LatLon>,
    aoi_bounds: Option<BoundingBox>,
    result: Option<&GeoJson>,
) -> Framing {
    if let Some(center) = center_override.filter(LatLon::is_finite) {
        return Framing {
            mode: FramingMode::Override,
            camera: CameraState::Center {
                center,
                zoom: config.override_zoom,
            },
        };
    }

    if let Some(bounds) = content_bounds(aoi_bounds, result) {
        return Framing {
            mode: FramingMode::FitToContent,
            camera: CameraState::FitBounds {
                bounds,
                padding_px: config.fit_padding_px,
            },
        };
    }

    Framing {
        mode: FramingMode::Default,
        camera: CameraState::Center {
            center: config.default_center,
            zoom: config.default_zoom,
        },
    }
}

fn content_bounds(aoi_bounds: Option<BoundingBox>, result: Option<&GeoJson>) -> Option<BoundingBox> {
    let mut env = Envelope::new();
    if let Some(b) = aoi_bounds {
        env.extend(LonLat::new(b.west, b.south));
        env.extend(LonLat::new(b.east, b.north));
    }
    if let Some(result) = result {
        env.merge(&geometry_envelope(result));
    }
    env.finish()
}

#[cfg(test)]
mod tests {
    use super::{CameraState, FramingMode, SurfaceCommand, frame_view};
    use crate::config::ViewConfig;
    use formats::geojson::GeoJson;
    use foundation::bounds::BoundingBox;
    use foundation::coords::LatLon;
    use serde_json::json;

    const AOI: BoundingBox = BoundingBox::new(10.70, 106.60, 10.80, 106.70);

    fn result_polygons() -> GeoJson {
        GeoJson::from_value(&json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[106.65, 10.60], [106.90, 10.60], [106.90, 10.75], [106.65, 10.60]]]
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn override_wins_over_everything() {
        let config = ViewConfig::default();
        let center = LatLon::new(10.82, 106.63);
        let result = result_polygons();
        let framing = frame_view(&config, Some(center), Some(AOI), Some(&result));
        assert_eq!(framing.mode, FramingMode::Override);
        assert_eq!(
            framing.camera,
            CameraState::Center {
                center,
                zoom: config.override_zoom
            }
        );
    }

    #[test]
    fn fits_aoi_with_padding() {
        let config = ViewConfig::default();
        let framing = frame_view(&config, None, Some(AOI), None);
        assert_eq!(framing.mode, FramingMode::FitToContent);
        assert_eq!(
            framing.camera,
            CameraState::FitBounds {
                bounds: AOI,
                padding_px: [20, 20]
            }
        );
    }

    #[test]
    fn fits_union_of_aoi_and_result() {
        let result = result_polygons();
        let framing = frame_view(&ViewConfig::default(), None, Some(AOI), Some(&result));
        assert_eq!(
            framing.camera,
            CameraState::FitBounds {
                bounds: BoundingBox::new(10.60, 106.60, 10.80, 106.90),
                padding_px: [20, 20]
            }
        );
    }

    #[test]
    fn result_alone_is_enough() {
        let result = result_polygons();
        let framing = frame_view(&ViewConfig::default(), None, None, Some(&result));
        assert_eq!(framing.mode, FramingMode::FitToContent);
    }

    #[test]
    fn falls_back_to_default() {
        let config = ViewConfig::default();
        let point = GeoJson::from_value(&json!({ "type": "Point", "coordinates": [106.7, 10.8] }))
            .unwrap();
        for result in [None, Some(&point)] {
            let framing = frame_view(&config, None, None, result);
            assert_eq!(framing.mode, FramingMode::Default);
            assert_eq!(
                framing.camera,
                CameraState::Center {
                    center: LatLon::new(10.75, 106.7),
                    zoom: 10
                }
            );
        }

        let bad = LatLon::new(f64::NAN, 106.0);
        assert_eq!(
            frame_view(&config, Some(bad), None, None).mode,
            FramingMode::Default
        );
    }

    #[test]
    fn alternate_region_config() {
        let config = ViewConfig {
            default_center: LatLon::new(21.03, 105.85),
            default_zoom: 9,
            override_zoom: 15,
            ..ViewConfig::default()
        };
        let framing = frame_view(&config, Some(LatLon::new(21.0, 105.8)), None, None);
        assert_eq!(
            framing.camera,
            CameraState::Center {
                center: LatLon::new(21.0, 105.8),
                zoom: 15
            }
        );
    }

    #[test]
    fn every_framing_ends_with_invalidate() {
        let framing = frame_view(&ViewConfig::default(), None, Some(AOI), None);
        let cmds = framing.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1], SurfaceCommand::InvalidateSize);
    }
}
