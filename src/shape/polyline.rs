use egui::{Painter, Pos2};

use super::{to_positions, to_screen_points, Interaction, Shape, ShapeKind};
use crate::geometry::{distance_to_polyline, HIT_TOLERANCE};
use crate::map::{LatLng, MapView};
use crate::style::ShapeStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    vertices: Vec<LatLng>,
    style: ShapeStyle,
    interaction: Interaction,
}

impl Polyline {
    pub fn new(vertices: Vec<LatLng>, style: ShapeStyle) -> Self {
        Self {
            vertices,
            style,
            interaction: Interaction::default(),
        }
    }

    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }
}

impl Shape for Polyline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polyline
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
        geojson::Geometry::new(geojson::Value::LineString(to_positions(&self.vertices)))
    }

    fn handles(&self) -> Vec<LatLng> {
        self.vertices.clone()
    }

    fn move_handle(&mut self, index: usize, to: LatLng) {
        if let Some(vertex) = self.vertices.get_mut(index) {
            *vertex = to;
        }
    }

    fn translate(&mut self, d_lat: f64, d_lng: f64) {
        for vertex in &mut self.vertices {
            *vertex = vertex.offset(d_lat, d_lng);
        }
    }

    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool {
        let points = to_screen_points(view, &self.vertices);
        distance_to_polyline(pos, &points) <= self.style.weight / 2.0 + HIT_TOLERANCE
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        let points = to_screen_points(view, &self.vertices);
        painter.add(egui::Shape::line(points, style.stroke()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_is_open_line() {
        let line = Polyline::new(
            vec![LatLng::new(23.80, 90.40), LatLng::new(23.81, 90.41)],
            ShapeStyle::default(),
        );
        assert_eq!(
            line.geometry().value,
            geojson::Value::LineString(vec![vec![90.40, 23.80], vec![90.41, 23.81]])
        );
    }
}
