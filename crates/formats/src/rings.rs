use foundation::coords::LonLat;
use serde_json::Value;

use crate::geojson::{GeoJson, Geometry};

/// One polygon boundary, positions in GeoJSON (lon, lat) order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring(pub Vec<LonLat>);

impl Ring {
    pub fn new(points: Vec<LonLat>) -> Self {
        Ring(points)
    }

    pub fn points(&self) -> &[LonLat] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Triangle plus closing point, at minimum.
    pub fn is_valid(&self) -> bool {
        self.0.len() >= 4 && self.is_closed()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|p| Value::Array(vec![Value::from(p.lon), Value::from(p.lat)]))
                .collect(),
        )
    }
}

/// Outer boundary rings of every polygonal geometry in `input`.
///
/// Polygons contribute their first ring, multi-polygons the first ring of each
/// member. Holes and non-polygonal geometry contribute nothing. Features are
/// visited in collection order.
pub fn extract_outer_rings(input: Option<&GeoJson>) -> Vec<Ring> {
    let mut out = Vec::new();
    let Some(input) = input else {
        return out;
    };

    match input {
        GeoJson::FeatureCollection(features) => {
            for feature in features {
                if let Some(geom) = &feature.geometry {
                    push_outer_rings(geom, &mut out);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geom) = &feature.geometry {
                push_outer_rings(geom, &mut out);
            }
        }
        GeoJson::Geometry(geom) => push_outer_rings(geom, &mut out),
    }

    out
}

fn push_outer_rings(geom: &Geometry, out: &mut Vec<Ring>) {
    match geom {
        Geometry::Polygon(rings) => {
            if let Some(outer) = rings.first() {
                out.push(outer.clone());
            }
        }
        Geometry::MultiPolygon(polys) => {
            for poly in polys {
                if let Some(outer) = poly.first() {
                    out.push(outer.clone());
                }
            }
        }
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_)
        | Geometry::GeometryCollection(_)
        | Geometry::Unknown(_) => {}
    }
}
