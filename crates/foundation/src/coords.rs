use serde::{Deserialize, Serialize};

/// GeoJSON position order: longitude first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_lat_lon(self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Map-surface order: latitude first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_lon_lat(self) -> LonLat {
        LonLat::new(self.lon, self.lat)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}
