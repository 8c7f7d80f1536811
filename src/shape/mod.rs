use egui::{Painter, Pos2};
use serde::{Deserialize, Serialize};

use crate::map::{LatLng, MapView};
use crate::style::ShapeStyle;

mod circle;
pub mod factory;
mod marker;
mod polygon;
mod polyline;
mod rectangle;

pub use circle::Circle;
pub use marker::Marker;
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use rectangle::Rectangle;

/// The five kinds of shape the draw tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Polygon,
    Marker,
    Polyline,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Polygon,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Polyline,
        ShapeKind::Marker,
    ];

    /// The `shapeType` property value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Marker => "marker",
            ShapeKind::Polyline => "polyline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "circle" => Some(ShapeKind::Circle),
            "rectangle" => Some(ShapeKind::Rectangle),
            "polygon" => Some(ShapeKind::Polygon),
            "marker" => Some(ShapeKind::Marker),
            "polyline" => Some(ShapeKind::Polyline),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Marker => "Marker",
            ShapeKind::Polyline => "Polyline",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "◯",
            ShapeKind::Rectangle => "▭",
            ShapeKind::Polygon => "⬠",
            ShapeKind::Marker => "📍",
            ShapeKind::Polyline => "〰",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a layer currently shows edit handles and/or can be dragged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub editing: bool,
    pub dragging: bool,
}

impl Interaction {
    pub fn is_active(&self) -> bool {
        self.editing || self.dragging
    }
}

/// Capabilities shared by every shape layer on the map.
pub trait Shape {
    fn kind(&self) -> ShapeKind;

    fn style(&self) -> &ShapeStyle;

    fn set_style(&mut self, style: ShapeStyle);

    fn interaction(&self) -> Interaction;

    fn interaction_mut(&mut self) -> &mut Interaction;

    /// Current geometry with coordinates rounded for output.
    fn geometry(&self) -> geojson::Geometry;

    /// Radius in meters, for shapes that have one.
    fn radius(&self) -> Option<f64> {
        None
    }

    /// False for shapes that can only be dragged.
    fn supports_editing(&self) -> bool {
        true
    }

    fn enable_editing(&mut self) {
        if self.supports_editing() {
            self.interaction_mut().editing = true;
        }
    }

    fn disable_editing(&mut self) {
        self.interaction_mut().editing = false;
    }

    fn enable_dragging(&mut self) {
        self.interaction_mut().dragging = true;
    }

    fn disable_dragging(&mut self) {
        self.interaction_mut().dragging = false;
    }

    /// Positions of the edit handles, in the order [`Shape::move_handle`] expects.
    fn handles(&self) -> Vec<LatLng>;

    fn move_handle(&mut self, index: usize, to: LatLng);

    fn translate(&mut self, d_lat: f64, d_lng: f64);

    /// Whether a screen position falls on this shape.
    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool;

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle);

    fn draw(&self, painter: &Painter, view: &MapView) {
        self.draw_with(painter, view, self.style());
    }
}

/// A live shape layer: one of the closed set of shape variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeLayer {
    Circle(Circle),
    Rectangle(Rectangle),
    Polygon(Polygon),
    Marker(Marker),
    Polyline(Polyline),
}

macro_rules! dispatch {
    ($self:expr, $shape:ident => $body:expr) => {
        match $self {
            ShapeLayer::Circle($shape) => $body,
            ShapeLayer::Rectangle($shape) => $body,
            ShapeLayer::Polygon($shape) => $body,
            ShapeLayer::Marker($shape) => $body,
            ShapeLayer::Polyline($shape) => $body,
        }
    };
}

impl Shape for ShapeLayer {
    fn kind(&self) -> ShapeKind {
        dispatch!(self, s => s.kind())
    }

    fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    fn set_style(&mut self, style: ShapeStyle) {
        dispatch!(self, s => s.set_style(style))
    }

    fn interaction(&self) -> Interaction {
        dispatch!(self, s => s.interaction())
    }

    fn interaction_mut(&mut self) -> &mut Interaction {
        dispatch!(self, s => s.interaction_mut())
    }

    fn geometry(&self) -> geojson::Geometry {
        dispatch!(self, s => s.geometry())
    }

    fn radius(&self) -> Option<f64> {
        dispatch!(self, s => s.radius())
    }

    fn supports_editing(&self) -> bool {
        dispatch!(self, s => s.supports_editing())
    }

    fn enable_editing(&mut self) {
        dispatch!(self, s => s.enable_editing())
    }

    fn handles(&self) -> Vec<LatLng> {
        dispatch!(self, s => s.handles())
    }

    fn move_handle(&mut self, index: usize, to: LatLng) {
        dispatch!(self, s => s.move_handle(index, to))
    }

    fn translate(&mut self, d_lat: f64, d_lng: f64) {
        dispatch!(self, s => s.translate(d_lat, d_lng))
    }

    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool {
        dispatch!(self, s => s.hit_test(pos, view))
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        dispatch!(self, s => s.draw_with(painter, view, style))
    }
}

impl From<Circle> for ShapeLayer {
    fn from(shape: Circle) -> Self {
        ShapeLayer::Circle(shape)
    }
}

impl From<Rectangle> for ShapeLayer {
    fn from(shape: Rectangle) -> Self {
        ShapeLayer::Rectangle(shape)
    }
}

impl From<Polygon> for ShapeLayer {
    fn from(shape: Polygon) -> Self {
        ShapeLayer::Polygon(shape)
    }
}

impl From<Marker> for ShapeLayer {
    fn from(shape: Marker) -> Self {
        ShapeLayer::Marker(shape)
    }
}

impl From<Polyline> for ShapeLayer {
    fn from(shape: Polyline) -> Self {
        ShapeLayer::Polyline(shape)
    }
}

/// Project positions into screen space.
pub(crate) fn to_screen_points(view: &MapView, positions: &[LatLng]) -> Vec<Pos2> {
    positions.iter().map(|p| view.to_screen(*p)).collect()
}

/// GeoJSON position list for a set of vertices.
pub(crate) fn to_positions(vertices: &[LatLng]) -> Vec<Vec<f64>> {
    vertices.iter().map(|v| v.to_position()).collect()
}

/// Closed GeoJSON ring (first position repeated at the end).
pub(crate) fn to_ring(vertices: &[LatLng]) -> Vec<Vec<f64>> {
    let mut ring = to_positions(vertices);
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ShapeKind::parse("hexagon"), None);
    }

    #[test]
    fn test_marker_is_drag_only() {
        let mut layer = ShapeLayer::from(Marker::new(LatLng::new(1.0, 2.0), ShapeStyle::default()));
        layer.enable_editing();
        layer.enable_dragging();
        assert_eq!(
            layer.interaction(),
            Interaction {
                editing: false,
                dragging: true
            }
        );
    }

    #[test]
    fn test_ring_is_closed() {
        let ring = to_ring(&[LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0)]);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }
}
