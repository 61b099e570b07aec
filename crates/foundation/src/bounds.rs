use serde::{Deserialize, Serialize};

use crate::coords::LonLat;

/// Axis-aligned lon/lat box in degrees.
///
/// A `BoundingBox` is only handed out when it has finite corners and a
/// non-zero extent on both axes; see [`Envelope::finish`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn is_valid(&self) -> bool {
        let finite = self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite();
        finite && self.width() > 0.0 && self.height() > 0.0
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Closed ring around the box, counter-clockwise from the south-west corner.
    pub fn corner_ring(&self) -> Vec<LonLat> {
        vec![
            LonLat::new(self.west, self.south),
            LonLat::new(self.east, self.south),
            LonLat::new(self.east, self.north),
            LonLat::new(self.west, self.north),
            LonLat::new(self.west, self.south),
        ]
    }
}

/// Running min/max accumulator over lon/lat positions.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Envelope {
    min: Option<[f64; 2]>,
    max: Option<[f64; 2]>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, p: LonLat) {
        // Non-finite positions are skipped.
        if !p.lon.is_finite() || !p.lat.is_finite() {
            return;
        }
        match (&mut self.min, &mut self.max) {
            (Some(min), Some(max)) => {
                min[0] = min[0].min(p.lon);
                min[1] = min[1].min(p.lat);
                max[0] = max[0].max(p.lon);
                max[1] = max[1].max(p.lat);
            }
            _ => {
                self.min = Some([p.lon, p.lat]);
                self.max = Some([p.lon, p.lat]);
            }
        }
    }

    pub fn extend_all<'a>(&mut self, points: impl IntoIterator<Item = &'a LonLat>) {
        for p in points {
            self.extend(*p);
        }
    }

    pub fn merge(&mut self, other: &Envelope) {
        if let (Some(min), Some(max)) = (other.min, other.max) {
            self.extend(LonLat::new(min[0], min[1]));
            self.extend(LonLat::new(max[0], max[1]));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Raw extent, possibly degenerate.
    pub fn extent(&self) -> Option<BoundingBox> {
        let (min, max) = (self.min?, self.max?);
        Some(BoundingBox::new(min[1], min[0], max[1], max[0]))
    }

    /// The extent if it is usable as a bounding box.
    pub fn finish(&self) -> Option<BoundingBox> {
        self.extent().filter(BoundingBox::is_valid)
    }
}
