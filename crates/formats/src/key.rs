use std::fmt;

use crate::geojson::GeoJson;

/// Content identity of a GeoJSON input.
///
/// Two inputs with the same key describe the same geometry, so derived values
/// computed from one can be reused for the other.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey([u8; 32]);

impl ContentKey {
    pub fn of(geo: &GeoJson) -> Self {
        Self::of_bytes(geo.to_value().to_string().as_bytes())
    }

    pub fn of_optional(geo: Option<&GeoJson>) -> Option<Self> {
        geo.map(Self::of)
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        ContentKey(*blake3::hash(bytes).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough to tell keys apart in logs.
        write!(f, "ContentKey({})", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::ContentKey;
    use crate::geojson::GeoJson;
    use serde_json::json;

    #[test]
    fn equal_content_gives_equal_keys() {
        let a = GeoJson::from_value(&json!({ "type": "Point", "coordinates": [1.0, 2.0] })).unwrap();
        let b = GeoJson::from_value(&json!({ "coordinates": [1.0, 2.0], "type": "Point" })).unwrap();
        let c = GeoJson::from_value(&json!({ "type": "Point", "coordinates": [1.0, 2.5] })).unwrap();
        assert_eq!(ContentKey::of(&a), ContentKey::of(&b));
        assert_ne!(ContentKey::of(&a), ContentKey::of(&c));
        assert_eq!(ContentKey::of_optional(None), None);
    }
}
