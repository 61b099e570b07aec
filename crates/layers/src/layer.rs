use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Base,
    RasterOverlay,
    Mask,
    VectorBoundary,
    VectorResult,
    Marker,
    Bubble,
}

/// Z-ordered rendering bucket on the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pane {
    Tiles,
    Rasters,
    /// Between rasters and vectors; holds the outside-AOI mask.
    Dim,
    Vectors,
    Markers,
}

impl Pane {
    pub fn name(self) -> &'static str {
        match self {
            Pane::Tiles => "tilePane",
            Pane::Rasters => "rasterPane",
            Pane::Dim => "dimPane",
            Pane::Vectors => "overlayPane",
            Pane::Markers => "markerPane",
        }
    }

    pub fn z_index(self) -> u32 {
        match self {
            Pane::Tiles => 200,
            Pane::Rasters => 300,
            Pane::Dim => 350,
            Pane::Vectors => 400,
            Pane::Markers => 600,
        }
    }
}

impl Serialize for Pane {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The four image products of one flood analysis, in stacking order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterKind {
    FloodComposite,
    PreEvent,
    Event,
    Delta,
}

impl RasterKind {
    pub const ALL: [RasterKind; 4] = [
        RasterKind::FloodComposite,
        RasterKind::PreEvent,
        RasterKind::Event,
        RasterKind::Delta,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RasterKind::FloodComposite => "flood",
            RasterKind::PreEvent => "pre",
            RasterKind::Event => "event",
            RasterKind::Delta => "delta",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RasterKind::FloodComposite => "Flood extent (composite)",
            RasterKind::PreEvent => "VV backscatter, pre-event",
            RasterKind::Event => "VV backscatter, event",
            RasterKind::Delta => "Backscatter change (dB)",
        }
    }
}

pub const MAX_BASE_LAYERS: u8 = 8;
pub const MAX_REGIONS: u8 = 3;

/// Every position a layer can occupy. The variant order is the stacking
/// order, bottom first, and never depends on which layers are present.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerSlot {
    Base(u8),
    Raster(RasterKind),
    Mask,
    Region(u8),
    Aoi,
    Result,
    Marker,
    Bubble,
}

impl LayerSlot {
    pub fn kind(self) -> LayerKind {
        match self {
            LayerSlot::Base(_) => LayerKind::Base,
            LayerSlot::Raster(_) => LayerKind::RasterOverlay,
            LayerSlot::Mask => LayerKind::Mask,
            LayerSlot::Region(_) | LayerSlot::Aoi => LayerKind::VectorBoundary,
            LayerSlot::Result => LayerKind::VectorResult,
            LayerSlot::Marker => LayerKind::Marker,
            LayerSlot::Bubble => LayerKind::Bubble,
        }
    }

    pub fn pane(self) -> Pane {
        match self {
            LayerSlot::Base(_) => Pane::Tiles,
            LayerSlot::Raster(_) => Pane::Rasters,
            LayerSlot::Mask => Pane::Dim,
            LayerSlot::Region(_) | LayerSlot::Aoi | LayerSlot::Result | LayerSlot::Bubble => {
                Pane::Vectors
            }
            LayerSlot::Marker => Pane::Markers,
        }
    }

    /// Overlay default. Bases are governed by the active-base selection
    /// instead, so this reports only whether the base is the first one.
    pub fn default_visible(self) -> bool {
        match self {
            LayerSlot::Base(i) => i == 0,
            LayerSlot::Raster(RasterKind::FloodComposite) => true,
            LayerSlot::Raster(_) => false,
            LayerSlot::Mask
            | LayerSlot::Region(_)
            | LayerSlot::Aoi
            | LayerSlot::Result
            | LayerSlot::Marker
            | LayerSlot::Bubble => true,
        }
    }

    pub fn exclusive_group(self) -> Option<&'static str> {
        match self {
            LayerSlot::Base(_) => Some("base"),
            _ => None,
        }
    }

    pub fn interactive(self) -> bool {
        !matches!(self, LayerSlot::Mask | LayerSlot::Base(_))
    }

    /// Dense rank consistent with the `Ord` impl.
    pub fn render_order(self) -> u32 {
        let bases = MAX_BASE_LAYERS as u32;
        let rasters = bases + RasterKind::ALL.len() as u32;
        let mask = rasters;
        let regions = mask + 1;
        let aoi = regions + MAX_REGIONS as u32;
        match self {
            LayerSlot::Base(i) => i as u32,
            LayerSlot::Raster(k) => bases + k as u32,
            LayerSlot::Mask => mask,
            LayerSlot::Region(i) => regions + i as u32,
            LayerSlot::Aoi => aoi,
            LayerSlot::Result => aoi + 1,
            LayerSlot::Marker => aoi + 2,
            LayerSlot::Bubble => aoi + 3,
        }
    }

    pub fn id(self) -> LayerId {
        LayerId(self)
    }
}

/// Stable, host-facing identifier of a layer, e.g. `raster.flood`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub LayerSlot);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            LayerSlot::Base(i) => write!(f, "base.{i}"),
            LayerSlot::Raster(k) => write!(f, "raster.{}", k.key()),
            LayerSlot::Mask => write!(f, "mask"),
            LayerSlot::Region(i) => write!(f, "region.{i}"),
            LayerSlot::Aoi => write!(f, "aoi"),
            LayerSlot::Result => write!(f, "result"),
            LayerSlot::Marker => write!(f, "marker"),
            LayerSlot::Bubble => write!(f, "bubble"),
        }
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerSlot, MAX_BASE_LAYERS, MAX_REGIONS, Pane, RasterKind};

    fn all_slots() -> Vec<LayerSlot> {
        let mut out: Vec<LayerSlot> = (0..MAX_BASE_LAYERS).map(LayerSlot::Base).collect();
        out.extend(RasterKind::ALL.map(LayerSlot::Raster));
        out.push(LayerSlot::Mask);
        out.extend((0..MAX_REGIONS).map(LayerSlot::Region));
        out.extend([
            LayerSlot::Aoi,
            LayerSlot::Result,
            LayerSlot::Marker,
            LayerSlot::Bubble,
        ]);
        out
    }

    #[test]
    fn render_order_matches_declaration_order() {
        let slots = all_slots();
        for pair in slots.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].render_order() + 1, pair[1].render_order());
        }
    }

    #[test]
    fn raw_rasters_default_hidden() {
        assert!(LayerSlot::Raster(RasterKind::FloodComposite).default_visible());
        assert!(!LayerSlot::Raster(RasterKind::PreEvent).default_visible());
        assert!(!LayerSlot::Raster(RasterKind::Event).default_visible());
        assert!(!LayerSlot::Raster(RasterKind::Delta).default_visible());
        assert!(LayerSlot::Mask.default_visible());
        assert!(LayerSlot::Aoi.default_visible());
    }

    #[test]
    fn mask_pane_sits_between_rasters_and_vectors() {
        let dim = LayerSlot::Mask.pane();
        assert_eq!(dim, Pane::Dim);
        assert!(dim.z_index() > Pane::Rasters.z_index());
        assert!(dim.z_index() < Pane::Vectors.z_index());
        assert!(!LayerSlot::Mask.interactive());
    }

    #[test]
    fn ids_are_readable() {
        assert_eq!(LayerSlot::Base(1).id().to_string(), "base.1");
        assert_eq!(
            LayerSlot::Raster(RasterKind::Delta).id().to_string(),
            "raster.delta"
        );
        assert_eq!(LayerSlot::Region(2).id().to_string(), "region.2");
    }
}
