use foundation::LonLatBounds;
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Shape payload of a drawn feature, in GeoJSON coordinate order (lon, lat).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        parse_geometry(&value).map_err(GeoJsonError::InvalidGeometry)
    }

    pub fn to_geojson_value(&self) -> Value {
        geometry_to_geojson_value(self)
    }

    /// Bounding box of every vertex; `None` for geometries without vertices.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        let mut acc: Option<LonLatBounds> = None;
        self.for_each_point(&mut |p: &GeoPoint| {
            let b = acc.get_or_insert(LonLatBounds::new(p.lat_deg, p.lon_deg, p.lat_deg, p.lon_deg));
            b.south = b.south.min(p.lat_deg);
            b.north = b.north.max(p.lat_deg);
            b.west = b.west.min(p.lon_deg);
            b.east = b.east.max(p.lon_deg);
        });
        acc
    }

    fn for_each_point(&self, f: &mut impl FnMut(&GeoPoint)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(f),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(f),
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let Value::Object(mut root) = value else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };
        if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let Some(Value::Array(entries)) = root.remove("features") else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };

        let features = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                parse_feature(entry)
                    .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }

    /// Emits a GeoJSON FeatureCollection. Feature order is preserved.
    pub fn to_geojson_value(&self) -> Value {
        let features: Vec<Value> = self.features.iter().map(Feature::to_geojson_value).collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, GeoJsonError> {
        Ok(serde_json::to_string(&self.to_geojson_value())?)
    }

    pub fn to_geojson_string_pretty(&self) -> Result<String, GeoJsonError> {
        Ok(serde_json::to_string_pretty(&self.to_geojson_value())?)
    }

    /// Union of the bounds of every feature geometry.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounds())
            .reduce(|a, b| {
                LonLatBounds::new(
                    a.south.min(b.south),
                    a.west.min(b.west),
                    a.north.max(b.north),
                    a.east.max(b.east),
                )
            })
    }
}

impl Feature {
    pub fn to_geojson_value(&self) -> Value {
        let mut out = json!({
            "type": "Feature",
            "properties": self.properties,
            "geometry": self.geometry.to_geojson_value(),
        });
        if let Some(id) = &self.id {
            out["id"] = Value::String(id.clone());
        }
        out
    }
}

/// One entry of a collection's `features` array. Numeric ids are kept as text,
/// and a `null` or absent `properties` member becomes an empty map.
fn parse_feature(entry: Value) -> Result<Feature, String> {
    let Value::Object(mut obj) = entry else {
        return Err("feature must be an object".to_string());
    };
    match obj.get("type").and_then(Value::as_str) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }

    let id = match obj.remove("id") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let properties = match obj.remove("properties") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(props)) => props,
        Some(_) => return Err("feature properties must be an object".to_string()),
    };
    let geometry = obj
        .get("geometry")
        .ok_or_else(|| "feature missing geometry".to_string())
        .and_then(parse_geometry)?;

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn geometry_to_geojson_value(geom: &Geometry) -> Value {
    let coords = match geom {
        Geometry::Point(p) => point_coords(p),
        Geometry::MultiPoint(ps) | Geometry::LineString(ps) => line_coords(ps),
        Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
            Value::Array(lines.iter().map(|l| line_coords(l)).collect())
        }
        Geometry::MultiPolygon(polys) => Value::Array(
            polys
                .iter()
                .map(|poly| Value::Array(poly.iter().map(|ring| line_coords(ring)).collect()))
                .collect(),
        ),
    };

    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(geom.kind().to_string()));
    obj.insert("coordinates".to_string(), coords);
    Value::Object(obj)
}

fn point_coords(p: &GeoPoint) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn line_coords(ps: &[GeoPoint]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "geometry missing type".to_string())?;
    let coords = value
        .get("coordinates")
        .ok_or_else(|| format!("{kind} missing coordinates"))?;

    let geometry = match kind {
        "Point" => Geometry::Point(parse_position(coords)?),
        "MultiPoint" => Geometry::MultiPoint(parse_nested(coords, parse_position)?),
        "LineString" => Geometry::LineString(parse_nested(coords, parse_position)?),
        "MultiLineString" => Geometry::MultiLineString(parse_nested(coords, |line| {
            parse_nested(line, parse_position)
        })?),
        "Polygon" => Geometry::Polygon(parse_nested(coords, |ring| {
            parse_nested(ring, parse_position)
        })?),
        "MultiPolygon" => Geometry::MultiPolygon(parse_nested(coords, |poly| {
            parse_nested(poly, |ring| parse_nested(ring, parse_position))
        })?),
        other => return Err(format!("unsupported geometry type: {other}")),
    };
    Ok(geometry)
}

/// `[lon, lat]`, optionally followed by an altitude that is ignored.
fn parse_position(value: &Value) -> Result<GeoPoint, String> {
    match value.as_array().map(Vec::as_slice) {
        Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
            _ => Err(format!("position {value} must hold numbers")),
        },
        _ => Err(format!("position {value} must be [lon, lat]")),
    }
}

fn parse_nested<T>(
    value: &Value,
    item: impl Fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("expected coordinate array, got {value}"))?
        .iter()
        .map(item)
        .collect()
}
