use std::sync::Arc;

use formats::geojson::GeoJson;
use foundation::bounds::BoundingBox;
use foundation::color::Color;
use foundation::coords::LatLon;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::annotations::{RiskBubble, SearchPoint};
use crate::layer::{LayerId, LayerKind, LayerSlot, MAX_BASE_LAYERS, MAX_REGIONS, Pane};
use crate::mask::MaskPolygon;
use crate::raster::{RasterSources, raster_opacity};
use crate::symbology::{LayerStyle, REGION_COLORS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTileSource {
    pub name: String,
    pub url_template: String,
    #[serde(default)]
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// The first entry is the base shown initially.
    pub base_layers: Vec<BaseTileSource>,
    pub region_colors: [Color; 3],
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            base_layers: vec![
                BaseTileSource {
                    name: "Street map".to_string(),
                    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: "&copy; OpenStreetMap contributors".to_string(),
                },
                BaseTileSource {
                    name: "Satellite imagery".to_string(),
                    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                    attribution: "Tiles © Esri — Source: Esri, Maxar, Earthstar Geographics"
                        .to_string(),
                },
            ],
            region_colors: REGION_COLORS,
        }
    }
}

impl LayerConfig {
    pub fn base_count(&self) -> usize {
        self.base_layers.len().min(MAX_BASE_LAYERS as usize)
    }
}

/// Boundary of one administrative sub-region, drawn as an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRegion {
    pub name: String,
    pub geometry: Arc<GeoJson>,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, geometry: GeoJson) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSource {
    Tiles {
        url_template: String,
        attribution: String,
    },
    Image {
        url: String,
        bounds: BoundingBox,
    },
    Mask {
        polygon: Arc<MaskPolygon>,
    },
    Geometry {
        geojson: Arc<GeoJson>,
    },
    Marker {
        position: LatLon,
        popup: String,
    },
    Circle {
        center: LatLon,
        radius_m: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    pub id: LayerId,
    #[serde(skip)]
    pub slot: LayerSlot,
    pub kind: LayerKind,
    pub label: String,
    pub source: LayerSource,
    pub default_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_group: Option<&'static str>,
    pub render_order: u32,
    pub pane: Pane,
    pub interactive: bool,
    pub style: LayerStyle,
}

impl LayerDescriptor {
    pub fn new(
        slot: LayerSlot,
        label: impl Into<String>,
        source: LayerSource,
        style: LayerStyle,
    ) -> Self {
        Self {
            id: slot.id(),
            slot,
            kind: slot.kind(),
            label: label.into(),
            source,
            default_visible: slot.default_visible(),
            exclusive_group: slot.exclusive_group(),
            render_order: slot.render_order(),
            pane: slot.pane(),
            interactive: slot.interactive(),
            style,
        }
    }
}

/// Everything the stack is assembled from for one composition.
#[derive(Debug, Clone, Copy)]
pub struct StackInputs<'a> {
    pub aoi: Option<&'a Arc<GeoJson>>,
    pub result: Option<&'a Arc<GeoJson>>,
    pub rasters: &'a RasterSources,
    pub regions: &'a [NamedRegion],
    pub search_point: Option<&'a SearchPoint>,
    pub risk_bubble: Option<&'a RiskBubble>,
    pub aoi_fill: Option<Color>,
    pub mask: Option<&'a Arc<MaskPolygon>>,
    /// Anchor for every raster overlay; without it no raster is shown.
    pub overlay_bounds: Option<BoundingBox>,
}

/// Assembles the descriptors for every layer that has data, bottom first.
pub fn build_layer_stack(config: &LayerConfig, inputs: &StackInputs<'_>) -> Vec<LayerDescriptor> {
    let mut out = Vec::new();

    if config.base_layers.len() > MAX_BASE_LAYERS as usize {
        warn!(
            configured = config.base_layers.len(),
            max = MAX_BASE_LAYERS,
            "ignoring extra base layers"
        );
    }
    for (i, base) in config.base_layers.iter().take(config.base_count()).enumerate() {
        out.push(LayerDescriptor::new(
            LayerSlot::Base(i as u8),
            base.name.clone(),
            LayerSource::Tiles {
                url_template: base.url_template.clone(),
                attribution: base.attribution.clone(),
            },
            LayerStyle::default(),
        ));
    }

    if let Some(bounds) = inputs.overlay_bounds {
        for (kind, url) in inputs.rasters.iter() {
            out.push(LayerDescriptor::new(
                LayerSlot::Raster(kind),
                kind.label(),
                LayerSource::Image {
                    url: url.to_string(),
                    bounds,
                },
                LayerStyle::image(raster_opacity(kind)),
            ));
        }
    }

    if let Some(mask) = inputs.mask {
        out.push(LayerDescriptor::new(
            LayerSlot::Mask,
            "Outside AOI",
            LayerSource::Mask {
                polygon: Arc::clone(mask),
            },
            LayerStyle::mask(),
        ));
    }

    if inputs.regions.len() > MAX_REGIONS as usize {
        warn!(
            supplied = inputs.regions.len(),
            max = MAX_REGIONS,
            "ignoring extra sub-region boundaries"
        );
    }
    for (i, region) in inputs
        .regions
        .iter()
        .take(MAX_REGIONS as usize)
        .enumerate()
    {
        out.push(LayerDescriptor::new(
            LayerSlot::Region(i as u8),
            region.name.clone(),
            LayerSource::Geometry {
                geojson: Arc::clone(&region.geometry),
            },
            LayerStyle::outline(config.region_colors[i], 2.0),
        ));
    }

    if let Some(aoi) = inputs.aoi {
        out.push(LayerDescriptor::new(
            LayerSlot::Aoi,
            "Area of interest",
            LayerSource::Geometry {
                geojson: Arc::clone(aoi),
            },
            LayerStyle::aoi(inputs.aoi_fill),
        ));
    }

    if let Some(result) = inputs.result {
        out.push(LayerDescriptor::new(
            LayerSlot::Result,
            "Flooded area (vector)",
            LayerSource::Geometry {
                geojson: Arc::clone(result),
            },
            LayerStyle::result(),
        ));
    }

    if let Some(point) = inputs.search_point {
        out.push(LayerDescriptor::new(
            LayerSlot::Marker,
            "Search location",
            LayerSource::Marker {
                position: point.position,
                popup: point.popup_text().to_string(),
            },
            LayerStyle::default(),
        ));
    }

    if let Some(bubble) = inputs.risk_bubble {
        out.push(LayerDescriptor::new(
            LayerSlot::Bubble,
            "Risk zone",
            LayerSource::Circle {
                center: bubble.center,
                radius_m: bubble.radius_m,
            },
            LayerStyle::bubble(bubble.color),
        ));
    }

    out.sort_by_key(|layer| layer.render_order);
    out.dedup_by_key(|layer| layer.slot);
    out
}
