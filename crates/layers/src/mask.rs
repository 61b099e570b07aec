use earcutr::earcut;
use formats::geojson::{GeoJson, rings_to_value};
use formats::rings::{Ring, extract_outer_rings};
use foundation::bounds::BoundingBox;
use foundation::coords::LonLat;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Inverse mask: a world rectangle with every AOI outer ring punched out.
///
/// Drawn with an even-odd fill, everything outside the AOI is dimmed in a
/// single polygon. Overlapping or self-intersecting AOI rings show through as
/// fill-rule artifacts; they are not corrected here.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPolygon {
    rings: Vec<Ring>,
}

impl MaskPolygon {
    pub fn outer(&self) -> &Ring {
        &self.rings[0]
    }

    pub fn holes(&self) -> &[Ring] {
        &self.rings[1..]
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn to_feature_value(&self) -> Value {
        let mut geom = Map::new();
        geom.insert("type".to_string(), Value::String("Polygon".to_string()));
        geom.insert("coordinates".to_string(), rings_to_value(&self.rings));

        let mut feat = Map::new();
        feat.insert("type".to_string(), Value::String("Feature".to_string()));
        feat.insert("properties".to_string(), Value::Object(Map::new()));
        feat.insert("geometry".to_string(), Value::Object(geom));
        Value::Object(feat)
    }

    /// Flat triangle list (3 positions per triangle) covering the dimmed
    /// area, for surfaces that cannot fill with the even-odd rule.
    pub fn triangulate(&self) -> Vec<LonLat> {
        let mut vertices: Vec<LonLat> = Vec::new();
        let mut coords_2d: Vec<f64> = Vec::new();
        let mut hole_indices: Vec<usize> = Vec::new();

        for (ring_i, ring) in self.rings.iter().enumerate() {
            let mut pts = ring.points().to_vec();
            drop_closing_duplicate(&mut pts);
            if pts.len() < 3 {
                continue;
            }
            if ring_i > 0 {
                hole_indices.push(vertices.len());
            }
            for p in pts {
                coords_2d.push(p.lon);
                coords_2d.push(p.lat);
                vertices.push(p);
            }
        }

        let indices = match earcut(&coords_2d, &hole_indices, 2) {
            Ok(ix) => ix,
            Err(_) => return Vec::new(),
        };
        indices
            .into_iter()
            .filter_map(|idx| vertices.get(idx).copied())
            .collect()
    }
}

impl Serialize for MaskPolygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_feature_value().serialize(serializer)
    }
}

/// Builds the outside-AOI mask, or `None` when the AOI has no polygon rings.
pub fn build_mask(aoi: Option<&GeoJson>, world: &BoundingBox) -> Option<MaskPolygon> {
    let holes = extract_outer_rings(aoi);
    if holes.is_empty() {
        return None;
    }
    let mut rings = Vec::with_capacity(holes.len() + 1);
    rings.push(Ring::new(world.corner_ring()));
    rings.extend(holes);
    Some(MaskPolygon { rings })
}

fn drop_closing_duplicate(points: &mut Vec<LonLat>) {
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::build_mask;
    use formats::geojson::GeoJson;
    use formats::rings::extract_outer_rings;
    use foundation::bounds::BoundingBox;
    use foundation::coords::LonLat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const WORLD: BoundingBox = BoundingBox::new(3.0, 95.0, 25.0, 115.0);

    fn two_squares() -> GeoJson {
        GeoJson::from_value(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[106.0, 10.0], [107.0, 10.0], [107.0, 11.0], [106.0, 11.0], [106.0, 10.0]]],
                [[[100.0, 5.0], [101.0, 5.0], [101.0, 6.0], [100.0, 6.0], [100.0, 5.0]]]
            ]
        }))
        .unwrap()
    }

    #[test]
    fn absent_without_rings() {
        assert_eq!(build_mask(None, &WORLD), None);
        let line = GeoJson::from_value(&json!({
            "type": "LineString",
            "coordinates": [[100.0, 5.0], [101.0, 6.0]]
        }));
        assert_eq!(build_mask(line.as_ref(), &WORLD), None);
    }

    #[test]
    fn world_rectangle_then_aoi_rings_in_order() {
        let aoi = two_squares();
        let mask = build_mask(Some(&aoi), &WORLD).expect("mask");
        assert_eq!(mask.rings().len(), 3);
        assert_eq!(mask.outer().points(), WORLD.corner_ring().as_slice());
        assert_eq!(mask.holes(), extract_outer_rings(Some(&aoi)).as_slice());
    }

    #[test]
    fn feature_value_is_a_polygon_feature() {
        let mask = build_mask(Some(&two_squares()), &WORLD).unwrap();
        let value = mask.to_feature_value();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["geometry"]["coordinates"][0][0], json!([95.0, 3.0]));
        assert_eq!(
            value["geometry"]["coordinates"].as_array().map(Vec::len),
            Some(3)
        );
    }

    #[test]
    fn triangulation_leaves_holes_uncovered() {
        let mask = build_mask(Some(&two_squares()), &WORLD).unwrap();
        let tris = mask.triangulate();
        assert!(!tris.is_empty());
        assert_eq!(tris.len() % 3, 0);

        // Total covered area equals world minus the two unit holes.
        let area: f64 = tris
            .chunks(3)
            .map(|t| triangle_area(t[0], t[1], t[2]))
            .sum();
        let expected = WORLD.width() * WORLD.height() - 2.0;
        assert!((area - expected).abs() < 1e-6, "area {area} vs {expected}");
    }

    fn triangle_area(a: LonLat, b: LonLat, c: LonLat) -> f64 {
        ((b.lon - a.lon) * (c.lat - a.lat) - (c.lon - a.lon) * (b.lat - a.lat)).abs() * 0.5
    }
}
