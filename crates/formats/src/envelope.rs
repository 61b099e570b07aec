use foundation::bounds::{BoundingBox, Envelope};

use crate::geojson::GeoJson;
use crate::rings::{Ring, extract_outer_rings};

/// Bounding box of the AOI's outer rings.
///
/// Every raster overlay for an AOI is anchored to this box, so it must only
/// depend on the AOI. `None` when there are no rings or the extent is
/// degenerate.
pub fn aoi_bounds(aoi: Option<&GeoJson>) -> Option<BoundingBox> {
    rings_envelope(&extract_outer_rings(aoi)).finish()
}

pub fn rings_envelope(rings: &[Ring]) -> Envelope {
    let mut env = Envelope::new();
    for ring in rings {
        env.extend_all(ring.points());
    }
    env
}

/// Envelope of every position in `geo`, points and lines included.
pub fn geometry_envelope(geo: &GeoJson) -> Envelope {
    let mut env = Envelope::new();
    geo.for_each_position(&mut |p| env.extend(p));
    env
}
