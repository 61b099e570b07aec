use std::sync::Arc;

use formats::envelope::aoi_bounds;
use formats::geojson::GeoJson;
use formats::key::ContentKey;
use foundation::bounds::BoundingBox;
use foundation::color::Color;
use foundation::coords::LatLon;
use layers::annotations::{RiskBubble, SearchPoint};
use layers::mask::{MaskPolygon, build_mask};
use layers::raster::RasterSources;
use layers::LayerSlot;
use layers::stack::{NamedRegion, StackInputs, build_layer_stack};
use layers::toggles::{LayerStack, LayerToggles};
use serde::Serialize;
use tracing::debug;

use crate::camera::{CameraState, Framing, SurfaceCommand, frame_view};
use crate::config::MapConfig;

/// Everything the map is drawn from. Any field may be absent.
#[derive(Debug, Default, Clone)]
pub struct MapInputs {
    pub aoi: Option<Arc<GeoJson>>,
    pub result: Option<Arc<GeoJson>>,
    pub rasters: RasterSources,
    pub regions: Vec<NamedRegion>,
    pub search_point: Option<SearchPoint>,
    pub risk_bubble: Option<RiskBubble>,
    pub aoi_fill: Option<Color>,
    pub center_override: Option<LatLon>,
}

/// One composed frame: the resolved layer stack, the camera and whatever the
/// surface must do to get there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub layers: LayerStack,
    pub camera: CameraState,
    pub framing: Framing,
    /// Empty when the camera inputs did not change since the last compose.
    pub commands: Vec<SurfaceCommand>,
}

#[derive(Debug)]
struct DerivedGeometry {
    aoi_key: Option<ContentKey>,
    aoi_ptr: Option<Arc<GeoJson>>,
    mask: Option<Arc<MaskPolygon>>,
    bounds: Option<BoundingBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CameraKey {
    aoi: Option<ContentKey>,
    result: Option<ContentKey>,
    center: Option<(u64, u64)>,
}

/// Owns toggle state and memoized geometry across recompositions.
#[derive(Debug)]
pub struct MapComposer {
    config: MapConfig,
    toggles: LayerToggles,
    derived: Option<DerivedGeometry>,
    last_camera: Option<(CameraKey, Framing)>,
    last_result: Option<(Arc<GeoJson>, ContentKey)>,
    geometry_recomputations: u64,
    content_hashes: u64,
}

impl MapComposer {
    pub fn new(config: MapConfig) -> Self {
        let toggles = LayerToggles::new(config.layers.base_count());
        Self {
            config,
            toggles,
            derived: None,
            last_camera: None,
            last_result: None,
            geometry_recomputations: 0,
            content_hashes: 0,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn toggles(&self) -> &LayerToggles {
        &self.toggles
    }

    pub fn toggles_mut(&mut self) -> &mut LayerToggles {
        &mut self.toggles
    }

    /// Flips one layer; see [`LayerToggles::toggle`].
    pub fn toggle(&mut self, slot: LayerSlot) -> bool {
        self.toggles.toggle(slot)
    }

    pub fn select_base(&mut self, index: u8) -> bool {
        self.toggles.select_base(index)
    }

    /// How many times mask and bounds were rebuilt.
    pub fn geometry_recomputations(&self) -> u64 {
        self.geometry_recomputations
    }

    /// How many times an input was hashed for its content key.
    pub fn content_hashes(&self) -> u64 {
        self.content_hashes
    }

    pub fn compose(&mut self, inputs: &MapInputs) -> MapView {
        let aoi_key = self.refresh_derived(inputs.aoi.as_ref());
        let (mask, bounds) = match &self.derived {
            Some(d) => (d.mask.clone(), d.bounds),
            None => (None, None),
        };

        let descriptors = build_layer_stack(
            &self.config.layers,
            &StackInputs {
                aoi: inputs.aoi.as_ref(),
                result: inputs.result.as_ref(),
                rasters: &inputs.rasters,
                regions: &inputs.regions,
                search_point: inputs.search_point.as_ref(),
                risk_bubble: inputs.risk_bubble.as_ref(),
                aoi_fill: inputs.aoi_fill,
                mask: mask.as_ref(),
                overlay_bounds: bounds,
            },
        );
        let layers = self.toggles.resolve(descriptors);

        let camera_key = CameraKey {
            aoi: aoi_key,
            result: self.result_key(inputs.result.as_ref()),
            center: inputs
                .center_override
                .filter(LatLon::is_finite)
                .map(|c| (c.lat.to_bits(), c.lon.to_bits())),
        };
        let (framing, commands) = match &self.last_camera {
            Some((key, framing)) if *key == camera_key => (*framing, Vec::new()),
            _ => {
                let framing = frame_view(
                    &self.config.view,
                    inputs.center_override,
                    bounds,
                    inputs.result.as_deref(),
                );
                debug!(mode = ?framing.mode, "camera reframed");
                self.last_camera = Some((camera_key, framing));
                (framing, framing.commands())
            }
        };

        MapView {
            layers,
            camera: framing.camera,
            framing,
            commands,
        }
    }

    fn result_key(&mut self, result: Option<&Arc<GeoJson>>) -> Option<ContentKey> {
        let result = result?;
        if let Some((last, key)) = &self.last_result
            && Arc::ptr_eq(last, result)
        {
            return Some(*key);
        }
        let key = ContentKey::of(result);
        self.content_hashes += 1;
        self.last_result = Some((Arc::clone(result), key));
        Some(key)
    }

    /// Rebuilds mask and bounds when the AOI content changed. Returns the
    /// current AOI key.
    fn refresh_derived(&mut self, aoi: Option<&Arc<GeoJson>>) -> Option<ContentKey> {
        if let Some(d) = &self.derived {
            let same_ptr = match (aoi, &d.aoi_ptr) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same_ptr {
                return d.aoi_key;
            }
        }

        let aoi_key = ContentKey::of_optional(aoi.map(|a| &**a));
        if aoi_key.is_some() {
            self.content_hashes += 1;
        }
        if let Some(d) = &mut self.derived
            && d.aoi_key == aoi_key
        {
            d.aoi_ptr = aoi.cloned();
            return aoi_key;
        }

        let geo = aoi.map(|a| &**a);
        let mask = build_mask(geo, &self.config.view.mask_world).map(Arc::new);
        let bounds = aoi_bounds(geo);
        self.geometry_recomputations += 1;
        debug!(
            key = ?aoi_key,
            holes = mask.as_ref().map_or(0, |m| m.holes().len()),
            has_bounds = bounds.is_some(),
            "derived geometry rebuilt"
        );
        self.derived = Some(DerivedGeometry {
            aoi_key,
            aoi_ptr: aoi.cloned(),
            mask,
            bounds,
        });
        aoi_key
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{MapComposer, MapInputs};
    use crate::camera::{CameraState, FramingMode, SurfaceCommand};
    use crate::config::MapConfig;
    use formats::geojson::GeoJson;
    use foundation::coords::LatLon;
    use layers::{LayerSlot, RasterKind};
    use serde_json::json;

    fn square(west: f64) -> Arc<GeoJson> {
        let e = west + 0.1;
        Arc::new(
            GeoJson::from_value(&json!({
                "type": "Polygon",
                "coordinates": [[[west, 10.7], [e, 10.7], [e, 10.8], [west, 10.8], [west, 10.7]]]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn empty_inputs_give_bases_and_default_camera() {
        let mut composer = MapComposer::new(MapConfig::default());
        let view = composer.compose(&MapInputs::default());
        assert_eq!(
            view.layers.slots(),
            vec![LayerSlot::Base(0), LayerSlot::Base(1)]
        );
        assert_eq!(view.framing.mode, FramingMode::Default);
        assert_eq!(view.commands.len(), 2);
        assert_eq!(view.layers.active_bases(), 1);
    }

    #[test]
    fn equal_aoi_content_is_not_recomputed() {
        let mut composer = MapComposer::new(MapConfig::default());
        let mut inputs = MapInputs {
            aoi: Some(square(106.6)),
            ..MapInputs::default()
        };
        let first = composer.compose(&inputs);
        assert_eq!(composer.geometry_recomputations(), 1);
        assert!(!first.commands.is_empty());

        // Same Arc, then a fresh Arc with equal content.
        let again = composer.compose(&inputs);
        inputs.aoi = Some(square(106.6));
        let copy = composer.compose(&inputs);
        assert_eq!(composer.geometry_recomputations(), 1);
        assert!(again.commands.is_empty());
        assert!(copy.commands.is_empty());
        assert_eq!(copy.camera, first.camera);

        inputs.aoi = Some(square(106.8));
        let moved = composer.compose(&inputs);
        assert_eq!(composer.geometry_recomputations(), 2);
        assert_eq!(moved.commands.len(), 2);
        assert_ne!(moved.camera, first.camera);
    }

    #[test]
    fn unchanged_allocations_are_not_rehashed() {
        let mut composer = MapComposer::new(MapConfig::default());
        let mut inputs = MapInputs {
            aoi: Some(square(106.6)),
            result: Some(square(106.65)),
            ..MapInputs::default()
        };
        composer.compose(&inputs);
        assert_eq!(composer.content_hashes(), 2);

        for _ in 0..3 {
            assert!(composer.compose(&inputs).commands.is_empty());
        }
        assert_eq!(composer.content_hashes(), 2);

        // A new allocation with equal content is hashed once, then reused.
        inputs.result = Some(square(106.65));
        assert!(composer.compose(&inputs).commands.is_empty());
        assert!(composer.compose(&inputs).commands.is_empty());
        assert_eq!(composer.content_hashes(), 3);

        inputs.result = None;
        assert_eq!(composer.compose(&inputs).commands.len(), 2);
        assert_eq!(composer.content_hashes(), 3);
    }

    #[test]
    fn toggles_survive_recomposition() {
        let mut composer = MapComposer::new(MapConfig::default());
        let mut inputs = MapInputs {
            aoi: Some(square(106.6)),
            ..MapInputs::default()
        };
        inputs.rasters.flood = Some("flood.png".into());
        inputs.rasters.event = Some("event.png".into());

        composer.compose(&inputs);
        assert!(composer.select_base(1));
        assert!(!composer.toggle(LayerSlot::Mask));
        assert!(composer.toggle(LayerSlot::Raster(RasterKind::Event)));

        inputs.aoi = Some(square(106.8));
        let view = composer.compose(&inputs);
        let visible = |slot| view.layers.get(slot).map(|l| l.visible);
        assert_eq!(visible(LayerSlot::Base(0)), Some(false));
        assert_eq!(visible(LayerSlot::Base(1)), Some(true));
        assert_eq!(visible(LayerSlot::Mask), Some(false));
        assert_eq!(visible(LayerSlot::Raster(RasterKind::Event)), Some(true));
        assert_eq!(
            visible(LayerSlot::Raster(RasterKind::FloodComposite)),
            Some(true)
        );
        assert_eq!(view.layers.active_bases(), 1);
    }

    #[test]
    fn override_change_reemits_commands() {
        let mut composer = MapComposer::new(MapConfig::default());
        let mut inputs = MapInputs {
            aoi: Some(square(106.6)),
            ..MapInputs::default()
        };
        let fit = composer.compose(&inputs);
        assert_eq!(fit.framing.mode, FramingMode::FitToContent);

        let center = LatLon::new(10.76, 106.66);
        inputs.center_override = Some(center);
        let snapped = composer.compose(&inputs);
        assert_eq!(
            snapped.commands,
            vec![
                SurfaceCommand::Camera(CameraState::Center { center, zoom: 13 }),
                SurfaceCommand::InvalidateSize
            ]
        );
        assert!(composer.compose(&inputs).commands.is_empty());

        inputs.center_override = None;
        let back = composer.compose(&inputs);
        assert_eq!(back.camera, fit.camera);
        assert_eq!(back.commands.len(), 2);
    }

    #[test]
    fn removing_the_aoi_drops_derived_layers() {
        let mut composer = MapComposer::new(MapConfig::default());
        let mut inputs = MapInputs {
            aoi: Some(square(106.6)),
            ..MapInputs::default()
        };
        inputs.rasters.flood = Some("flood.png".into());
        let with = composer.compose(&inputs);
        assert!(with.layers.get(LayerSlot::Mask).is_some());
        assert!(with.layers.get(LayerSlot::Raster(RasterKind::FloodComposite)).is_some());

        inputs.aoi = None;
        let without = composer.compose(&inputs);
        assert!(without.layers.get(LayerSlot::Mask).is_none());
        assert!(without.layers.get(LayerSlot::Aoi).is_none());
        assert!(without.layers.get(LayerSlot::Raster(RasterKind::FloodComposite)).is_none());
        assert_eq!(without.framing.mode, FramingMode::Default);
    }
}
