//! Rebuilding live shape layers from stored features.

use geojson::Value;

use super::{Circle, Marker, Polygon, Polyline, Rectangle, ShapeKind, ShapeLayer};
use crate::error::FeatureError;
use crate::feature::ShapeFeature;
use crate::map::{LatLng, LatLngBounds};
use crate::style::{self, ShapeStyle, StyleState};

/// Values used when a stored feature leaves something out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreDefaults {
    pub style: StyleState,
    pub fill_opacity: f32,
    pub circle_radius: f64,
}

/// Decide which kind of layer a feature becomes.
///
/// A recognized `shapeType` wins. Otherwise a point is a circle, a line string
/// is a polyline, and a polygon ring is a rectangle when `shapeType` is absent
/// or a generic polygon when it holds something unrecognized.
pub fn resolve_kind(feature: &ShapeFeature) -> Result<ShapeKind, FeatureError> {
    if let Some(kind) = feature.shape_kind() {
        return Ok(kind);
    }

    match &feature.geometry.value {
        Value::Point(_) => Ok(ShapeKind::Circle),
        Value::LineString(_) => Ok(ShapeKind::Polyline),
        Value::Polygon(_) if feature.properties.shape_type.is_none() => Ok(ShapeKind::Rectangle),
        Value::Polygon(_) => Ok(ShapeKind::Polygon),
        _ => Err(FeatureError::UnsupportedGeometry(feature.geometry_type().to_string())),
    }
}

/// Build the layer for a stored feature, taking colors from its properties.
pub fn layer_from_feature(feature: &ShapeFeature, defaults: &RestoreDefaults) -> Result<ShapeLayer, FeatureError> {
    let style = restored_style(feature, defaults);
    let kind = resolve_kind(feature)?;
    let value = &feature.geometry.value;

    let layer = match kind {
        ShapeKind::Circle => {
            let center = point(value, feature)?;
            let radius = feature.properties.radius.unwrap_or(defaults.circle_radius);
            Circle::new(center, radius, style).into()
        }
        ShapeKind::Marker => Marker::new(point(value, feature)?, style).into(),
        ShapeKind::Rectangle => {
            let ring = outer_ring(value, feature)?;
            let bounds = LatLngBounds::from_points(ring.iter().copied()).ok_or(FeatureError::TooFewPositions {
                expected: 2,
                actual: 0,
            })?;
            Rectangle::new(bounds, style).into()
        }
        ShapeKind::Polygon => {
            let ring = outer_ring(value, feature)?;
            require(&ring, 3)?;
            Polygon::new(ring, style).into()
        }
        ShapeKind::Polyline => {
            let Value::LineString(positions) = value else {
                return Err(unsupported(feature));
            };
            let vertices = positions
                .iter()
                .map(|p| LatLng::from_position(p))
                .collect::<Result<Vec<_>, _>>()?;
            require(&vertices, 2)?;
            Polyline::new(vertices, style).into()
        }
    };
    Ok(layer)
}

fn restored_style(feature: &ShapeFeature, defaults: &RestoreDefaults) -> ShapeStyle {
    let color = |value: &Option<String>, fallback| {
        value
            .as_deref()
            .and_then(|hex| style::parse_hex_color(hex).ok())
            .unwrap_or(fallback)
    };
    StyleState::new(
        color(&feature.properties.stroke_color, defaults.style.stroke_color),
        color(&feature.properties.fill_color, defaults.style.fill_color),
    )
    .shape_style(defaults.fill_opacity)
}

fn point(value: &Value, feature: &ShapeFeature) -> Result<LatLng, FeatureError> {
    match value {
        Value::Point(position) => LatLng::from_position(position),
        _ => Err(unsupported(feature)),
    }
}

/// The outer ring of a polygon without its closing position.
fn outer_ring(value: &Value, feature: &ShapeFeature) -> Result<Vec<LatLng>, FeatureError> {
    let Value::Polygon(rings) = value else {
        return Err(unsupported(feature));
    };
    let ring = rings.first().ok_or(FeatureError::TooFewPositions { expected: 3, actual: 0 })?;
    let mut vertices = ring
        .iter()
        .map(|p| LatLng::from_position(p))
        .collect::<Result<Vec<_>, _>>()?;
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    Ok(vertices)
}

fn require(vertices: &[LatLng], expected: usize) -> Result<(), FeatureError> {
    if vertices.len() < expected {
        return Err(FeatureError::TooFewPositions {
            expected,
            actual: vertices.len(),
        });
    }
    Ok(())
}

fn unsupported(feature: &ShapeFeature) -> FeatureError {
    FeatureError::UnsupportedGeometry(format!(
        "{} geometry for shapeType {:?}",
        feature.geometry_type(),
        feature.properties.shape_type
    ))
}
