use egui::{Painter, Pos2, Vec2};

use super::{Interaction, Shape, ShapeKind};
use crate::map::{LatLng, MapView};
use crate::style::ShapeStyle;

/// Radius of the pin head in pixels.
const PIN_RADIUS: f32 = 8.0;
/// Distance from the anchor point up to the pin head center.
const PIN_HEIGHT: f32 = 20.0;

/// A point marker. Markers can be dragged but have no edit handles.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: LatLng,
    style: ShapeStyle,
    interaction: Interaction,
}

impl Marker {
    pub fn new(position: LatLng, style: ShapeStyle) -> Self {
        Self {
            position,
            style,
            interaction: Interaction::default(),
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    fn head(&self, view: &MapView) -> Pos2 {
        view.to_screen(self.position) - Vec2::new(0.0, PIN_HEIGHT)
    }
}

impl Shape for Marker {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Marker
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    fn interaction(&self) -> Interaction {
        self.interaction
    }

    fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    fn geometry(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Point(self.position.to_position()))
    }

    fn supports_editing(&self) -> bool {
        false
    }

    fn handles(&self) -> Vec<LatLng> {
        Vec::new()
    }

    fn move_handle(&mut self, _index: usize, _to: LatLng) {}

    fn translate(&mut self, d_lat: f64, d_lng: f64) {
        self.position = self.position.offset(d_lat, d_lng);
    }

    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool {
        let anchor = view.to_screen(self.position);
        let head = self.head(view);
        pos.distance(head) <= PIN_RADIUS + 2.0
            || ((pos.x - anchor.x).abs() <= PIN_RADIUS / 2.0 && pos.y <= anchor.y && pos.y >= head.y)
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        let anchor = view.to_screen(self.position);
        let head = self.head(view);
        let outline = egui::Stroke::new(1.5, style.stroke_color);

        painter.add(egui::Shape::convex_polygon(
            vec![
                head + Vec2::new(-PIN_RADIUS * 0.7, PIN_RADIUS * 0.5),
                head + Vec2::new(PIN_RADIUS * 0.7, PIN_RADIUS * 0.5),
                anchor,
            ],
            style.fill_color,
            outline,
        ));
        painter.circle(head, PIN_RADIUS, style.fill_color, outline);
        painter.circle_filled(head, PIN_RADIUS * 0.35, egui::Color32::WHITE);
    }
}
