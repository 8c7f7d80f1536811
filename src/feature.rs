//! GeoJSON representation of shapes as they are stored and listed.
//!
//! A stored feature looks like
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "Point", "coordinates": [90.41, 23.81] },
//!   "properties": { "shapeType": "circle", "strokeColor": "#ff0000",
//!                   "fillColor": "#ff6666", "radius": 150 },
//!   "ShapeId": 1,
//!   "customGeometryType": "circle"
//! }
//! ```

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};

use crate::error::FeatureError;
use crate::id_generator::{IdCounter, ShapeId};
use crate::shape::ShapeKind;
use crate::state::{PersistenceError, PersistenceResult};

pub const SHAPE_ID_MEMBER: &str = "ShapeId";
pub const CUSTOM_GEOMETRY_TYPE_MEMBER: &str = "customGeometryType";

const SHAPE_TYPE_KEY: &str = "shapeType";
const STROKE_COLOR_KEY: &str = "strokeColor";
const FILL_COLOR_KEY: &str = "fillColor";
const RADIUS_KEY: &str = "radius";

/// The property bag of a shape feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeProperties {
    /// Raw `shapeType`; may hold a value no [`ShapeKind`] matches.
    pub shape_type: Option<String>,
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub radius: Option<f64>,
    /// Properties this tool does not interpret, carried through untouched.
    pub extra: JsonObject,
}

impl ShapeProperties {
    pub fn from_json_object(object: &JsonObject) -> Self {
        let string = |key: &str| object.get(key).and_then(JsonValue::as_str).map(str::to_owned);
        let extra = object
            .iter()
            .filter(|(key, _)| {
                ![SHAPE_TYPE_KEY, STROKE_COLOR_KEY, FILL_COLOR_KEY, RADIUS_KEY].contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            shape_type: string(SHAPE_TYPE_KEY),
            stroke_color: string(STROKE_COLOR_KEY),
            fill_color: string(FILL_COLOR_KEY),
            radius: object
                .get(RADIUS_KEY)
                .and_then(JsonValue::as_f64)
                .filter(|r| r.is_finite() && *r > 0.0),
            extra,
        }
    }

    pub fn to_json_object(&self) -> JsonObject {
        let mut object = self.extra.clone();
        if let Some(shape_type) = &self.shape_type {
            object.insert(SHAPE_TYPE_KEY.to_string(), JsonValue::from(shape_type.as_str()));
        }
        if let Some(stroke) = &self.stroke_color {
            object.insert(STROKE_COLOR_KEY.to_string(), JsonValue::from(stroke.as_str()));
        }
        if let Some(fill) = &self.fill_color {
            object.insert(FILL_COLOR_KEY.to_string(), JsonValue::from(fill.as_str()));
        }
        if let Some(radius) = self.radius {
            object.insert(RADIUS_KEY.to_string(), JsonValue::from(radius));
        }
        object
    }

    /// The recognized shape kind, if `shapeType` names one.
    pub fn kind(&self) -> Option<ShapeKind> {
        self.shape_type.as_deref().and_then(ShapeKind::parse)
    }
}

/// One entry of the shape list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFeature {
    pub shape_id: Option<ShapeId>,
    pub geometry: Geometry,
    pub properties: ShapeProperties,
    pub custom_geometry_type: Option<String>,
}

impl ShapeFeature {
    pub fn new(shape_id: ShapeId, geometry: Geometry, properties: ShapeProperties) -> Self {
        Self {
            shape_id: Some(shape_id),
            geometry,
            properties,
            custom_geometry_type: None,
        }
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.properties.kind()
    }

    /// GeoJSON type name of the geometry (`Point`, `Polygon`, ...).
    pub fn geometry_type(&self) -> &'static str {
        match &self.geometry.value {
            Value::Point(_) => "Point",
            Value::MultiPoint(_) => "MultiPoint",
            Value::LineString(_) => "LineString",
            Value::MultiLineString(_) => "MultiLineString",
            Value::Polygon(_) => "Polygon",
            Value::MultiPolygon(_) => "MultiPolygon",
            Value::GeometryCollection(_) => "GeometryCollection",
        }
    }

    pub fn from_geojson(feature: Feature) -> Result<Self, FeatureError> {
        let geometry = feature.geometry.ok_or(FeatureError::MissingGeometry)?;
        let properties = feature
            .properties
            .as_ref()
            .map(ShapeProperties::from_json_object)
            .unwrap_or_default();

        let members = feature.foreign_members.unwrap_or_default();
        let shape_id = members.get(SHAPE_ID_MEMBER).and_then(parse_shape_id);
        let custom_geometry_type = members
            .get(CUSTOM_GEOMETRY_TYPE_MEMBER)
            .and_then(JsonValue::as_str)
            .map(str::to_owned);

        Ok(Self {
            shape_id,
            geometry,
            properties,
            custom_geometry_type,
        })
    }

    pub fn to_geojson(&self) -> Feature {
        let mut members = JsonObject::new();
        if let Some(id) = self.shape_id {
            members.insert(SHAPE_ID_MEMBER.to_string(), JsonValue::from(id));
        }
        if let Some(custom) = &self.custom_geometry_type {
            members.insert(CUSTOM_GEOMETRY_TYPE_MEMBER.to_string(), JsonValue::from(custom.as_str()));
        }

        Feature {
            bbox: None,
            geometry: Some(self.geometry.clone()),
            id: None,
            properties: Some(self.properties.to_json_object()),
            foreign_members: (!members.is_empty()).then_some(members),
        }
    }
}

/// Identifiers were written as numbers or numeric strings depending on age.
fn parse_shape_id(value: &JsonValue) -> Option<ShapeId> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 1.0).map(|f| f as ShapeId)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| (IdCounter::FIRST_ID..=IdCounter::MAX_ID).contains(id))
}

/// Decode a stored `FeatureCollection`.
///
/// Features that cannot be decoded are logged and skipped; a document that is
/// not a feature collection at all is an error.
pub fn decode_collection(json: &str) -> PersistenceResult<Vec<ShapeFeature>> {
    let mut value: JsonValue = serde_json::from_str(json)?;
    if value.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return Err(PersistenceError::InvalidState("stored shapes are not a FeatureCollection".to_string()));
    }

    let raw_features = match value.get_mut("features").map(JsonValue::take) {
        Some(JsonValue::Array(features)) => features,
        _ => return Err(PersistenceError::InvalidState("FeatureCollection has no features array".to_string())),
    };

    let mut features = Vec::with_capacity(raw_features.len());
    for (index, mut raw) in raw_features.into_iter().enumerate() {
        normalize_geometry_type(&mut raw);
        let decoded = Feature::from_json_value(raw)
            .map_err(|e| e.to_string())
            .and_then(|feature| ShapeFeature::from_geojson(feature).map_err(|e| e.to_string()));
        match decoded {
            Ok(feature) => features.push(feature),
            Err(e) => log::warn!("Skipping stored feature {}: {}", index, e),
        }
    }
    Ok(features)
}

pub fn encode_collection(features: &[ShapeFeature]) -> PersistenceResult<String> {
    let collection = FeatureCollection {
        bbox: None,
        features: features.iter().map(ShapeFeature::to_geojson).collect(),
        foreign_members: None,
    };
    Ok(serde_json::to_string(&GeoJson::FeatureCollection(collection))?)
}

/// Older saves wrote the shape name (`"circle"`, `"rectangle"`, ...) into
/// `geometry.type`. Restore a real GeoJSON type from the coordinate nesting.
fn normalize_geometry_type(feature: &mut JsonValue) {
    let Some(geometry) = feature.get_mut("geometry").and_then(JsonValue::as_object_mut) else {
        return;
    };
    let declared = geometry.get("type").and_then(JsonValue::as_str);
    if declared.is_some_and(is_geometry_type) {
        return;
    }

    let inferred = match geometry.get("coordinates").map(coordinate_depth) {
        Some(1) => "Point",
        Some(2) => "LineString",
        Some(3) => "Polygon",
        Some(4) => "MultiPolygon",
        _ => return,
    };
    log::debug!("Normalizing geometry type {:?} to {}", declared, inferred);
    geometry.insert("type".to_string(), JsonValue::from(inferred));
}

fn is_geometry_type(name: &str) -> bool {
    matches!(
        name,
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon" | "GeometryCollection"
    )
}

fn coordinate_depth(value: &JsonValue) -> usize {
    match value {
        JsonValue::Array(items) => 1 + items.first().map_or(0, coordinate_depth),
        _ => 0,
    }
}
