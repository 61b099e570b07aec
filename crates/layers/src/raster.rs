use serde::{Deserialize, Serialize};

use crate::layer::RasterKind;

/// Image URLs produced by one flood analysis. Any of them may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSources {
    pub flood: Option<String>,
    pub pre_event: Option<String>,
    pub event: Option<String>,
    pub delta: Option<String>,
}

impl RasterSources {
    pub fn get(&self, kind: RasterKind) -> Option<&str> {
        let url = match kind {
            RasterKind::FloodComposite => &self.flood,
            RasterKind::PreEvent => &self.pre_event,
            RasterKind::Event => &self.event,
            RasterKind::Delta => &self.delta,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn set(&mut self, kind: RasterKind, url: Option<String>) {
        let slot = match kind {
            RasterKind::FloodComposite => &mut self.flood,
            RasterKind::PreEvent => &mut self.pre_event,
            RasterKind::Event => &mut self.event,
            RasterKind::Delta => &mut self.delta,
        };
        *slot = url;
    }

    /// Supplied sources in stacking order.
    pub fn iter(&self) -> impl Iterator<Item = (RasterKind, &str)> + '_ {
        RasterKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|url| (kind, url)))
    }
}

pub fn raster_opacity(kind: RasterKind) -> f32 {
    match kind {
        RasterKind::FloodComposite => 0.85,
        RasterKind::PreEvent | RasterKind::Event | RasterKind::Delta => 0.9,
    }
}
