use foundation::coords::LonLat;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::rings::Ring;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    GeometryCollection(Vec<Geometry>),
    /// Any `type` tag outside the GeoJSON geometry set. Kept so that the
    /// object still round-trips; it contributes no positions.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// String or number, kept as given.
    pub id: Option<Value>,
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

#[derive(Debug)]
pub enum GeoJsonError {
    Json(String),
    NotGeoJson,
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            GeoJsonError::NotGeoJson => write!(f, "expected a GeoJSON object with a type"),
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl GeoJson {
    /// Parses GeoJSON text. `null` parses to `None`; anything that is valid
    /// JSON but not a typed object is rejected.
    pub fn from_geojson_str(payload: &str) -> Result<Option<Self>, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        if value.is_null() {
            return Ok(None);
        }
        Self::from_value(&value)
            .map(Some)
            .ok_or(GeoJsonError::NotGeoJson)
    }

    /// Lenient conversion. Returns `None` only when `value` is not an object
    /// carrying a string `type`; malformed members inside degrade to fewer
    /// rings/positions instead of failing the whole object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let ty = obj.get("type").and_then(|v| v.as_str())?;

        match ty {
            "FeatureCollection" => {
                let features = obj
                    .get("features")
                    .and_then(|v| v.as_array())
                    .map(|arr| arr.iter().filter_map(parse_feature).collect())
                    .unwrap_or_default();
                Some(GeoJson::FeatureCollection(features))
            }
            "Feature" => parse_feature(value).map(GeoJson::Feature),
            _ => parse_geometry(value).map(GeoJson::Geometry),
        }
    }

    pub fn features(&self) -> &[Feature] {
        match self {
            GeoJson::FeatureCollection(features) => features,
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::Geometry(_) => &[],
        }
    }

    /// Visits every coordinate, holes and non-polygonal members included.
    pub fn for_each_position(&self, f: &mut impl FnMut(LonLat)) {
        match self {
            GeoJson::Geometry(geom) => geom.for_each_position(f),
            GeoJson::Feature(feature) => {
                if let Some(geom) = &feature.geometry {
                    geom.for_each_position(f);
                }
            }
            GeoJson::FeatureCollection(features) => {
                for geom in features.iter().filter_map(|feat| feat.geometry.as_ref()) {
                    geom.for_each_position(f);
                }
            }
        }
    }

    /// Standard GeoJSON representation.
    pub fn to_value(&self) -> Value {
        match self {
            GeoJson::Geometry(geom) => geom.to_value(),
            GeoJson::Feature(feature) => feature.to_value(),
            GeoJson::FeatureCollection(features) => {
                let mut root = Map::new();
                root.insert(
                    "type".to_string(),
                    Value::String("FeatureCollection".to_string()),
                );
                root.insert(
                    "features".to_string(),
                    Value::Array(features.iter().map(Feature::to_value).collect()),
                );
                Value::Object(root)
            }
        }
    }
}

impl Serialize for GeoJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &self.id {
            fobj.insert("id".to_string(), id.clone());
        }
        fobj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        fobj.insert(
            "geometry".to_string(),
            self.geometry
                .as_ref()
                .map(Geometry::to_value)
                .unwrap_or(Value::Null),
        );
        Value::Object(fobj)
    }
}

impl Geometry {
    pub fn type_name(&self) -> &str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
            Geometry::Unknown(name) => name.as_str(),
        }
    }

    pub fn for_each_position(&self, f: &mut impl FnMut(LonLat)) {
        match self {
            Geometry::Point(p) => f(*p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().copied().for_each(f),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    line.iter().copied().for_each(&mut *f);
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    ring.points().iter().copied().for_each(&mut *f);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for ring in polys.iter().flatten() {
                    ring.points().iter().copied().for_each(&mut *f);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.for_each_position(f);
                }
            }
            Geometry::Unknown(_) => {}
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "type".to_string(),
            Value::String(self.type_name().to_string()),
        );
        match self {
            Geometry::Point(p) => {
                obj.insert("coordinates".to_string(), point_coords(p));
            }
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => {
                obj.insert(
                    "coordinates".to_string(),
                    Value::Array(ps.iter().map(point_coords).collect()),
                );
            }
            Geometry::MultiLineString(lines) => {
                let coords = lines
                    .iter()
                    .map(|line| Value::Array(line.iter().map(point_coords).collect()))
                    .collect();
                obj.insert("coordinates".to_string(), Value::Array(coords));
            }
            Geometry::Polygon(rings) => {
                obj.insert("coordinates".to_string(), rings_to_value(rings));
            }
            Geometry::MultiPolygon(polys) => {
                let coords = polys.iter().map(|poly| rings_to_value(poly)).collect();
                obj.insert("coordinates".to_string(), Value::Array(coords));
            }
            Geometry::GeometryCollection(members) => {
                obj.insert(
                    "geometries".to_string(),
                    Value::Array(members.iter().map(Geometry::to_value).collect()),
                );
            }
            Geometry::Unknown(_) => {}
        }
        Value::Object(obj)
    }
}

pub fn rings_to_value(rings: &[Ring]) -> Value {
    Value::Array(rings.iter().map(Ring::to_value).collect())
}

fn point_coords(p: &LonLat) -> Value {
    Value::Array(vec![Value::from(p.lon), Value::from(p.lat)])
}

fn parse_feature(value: &Value) -> Option<Feature> {
    let obj = value.as_object()?;

    let id = obj
        .get("id")
        .filter(|v| v.is_string() || v.is_number())
        .cloned();

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = obj.get("geometry").and_then(parse_geometry);

    Some(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(value: &Value) -> Option<Geometry> {
    let obj = value.as_object()?;
    let ty = obj.get("type").and_then(|v| v.as_str())?;
    let coords = obj.get("coordinates").unwrap_or(&Value::Null);

    let geom = match ty {
        "Point" => match parse_position(coords) {
            Some(p) => Geometry::Point(p),
            None => {
                debug!("Point without a usable position, kept as an empty point set");
                Geometry::MultiPoint(Vec::new())
            }
        },
        "MultiPoint" => Geometry::MultiPoint(parse_positions(coords).unwrap_or_default()),
        "LineString" => Geometry::LineString(parse_positions(coords).unwrap_or_default()),
        "MultiLineString" => Geometry::MultiLineString(
            coords
                .as_array()
                .map(|lines| lines.iter().filter_map(parse_positions).collect())
                .unwrap_or_default(),
        ),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)),
        "MultiPolygon" => Geometry::MultiPolygon(
            coords
                .as_array()
                .map(|polys| polys.iter().map(parse_polygon).collect())
                .unwrap_or_default(),
        ),
        "GeometryCollection" => Geometry::GeometryCollection(
            obj.get("geometries")
                .and_then(|v| v.as_array())
                .map(|members| members.iter().filter_map(parse_geometry).collect())
                .unwrap_or_default(),
        ),
        other => {
            debug!(geometry_type = other, "unrecognized GeoJSON geometry type");
            Geometry::Unknown(other.to_string())
        }
    };
    Some(geom)
}

fn parse_position(coords: &Value) -> Option<LonLat> {
    let arr = coords.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    // Altitude, if present, is ignored.
    let lon = arr[0].as_f64()?;
    let lat = arr[1].as_f64()?;
    Some(LonLat::new(lon, lat))
}

/// All-or-nothing: one bad position invalidates the whole sequence.
fn parse_positions(coords: &Value) -> Option<Vec<LonLat>> {
    let arr = coords.as_array()?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_position(item)?);
    }
    Some(out)
}

fn parse_ring(coords: &Value) -> Option<Ring> {
    parse_positions(coords)
        .filter(|points| !points.is_empty())
        .map(Ring::new)
}

fn parse_polygon(coords: &Value) -> Vec<Ring> {
    let Some(rings) = coords.as_array() else {
        return Vec::new();
    };
    let mut iter = rings.iter();
    // Losing the outer ring must not promote a hole into its place.
    let Some(outer) = iter.next().and_then(parse_ring) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(rings.len());
    out.push(outer);
    out.extend(iter.filter_map(parse_ring));
    out
}
