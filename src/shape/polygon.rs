use egui::epaint::{Mesh, Vertex, WHITE_UV};
use egui::{Painter, Pos2};

use super::{to_ring, to_screen_points, Interaction, Shape, ShapeKind};
use crate::geometry::{distance_to_polyline, point_in_polygon, triangulate, HIT_TOLERANCE};
use crate::map::{LatLng, MapView};
use crate::style::ShapeStyle;

/// A free-form polygon; `vertices` is an open ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<LatLng>,
    style: ShapeStyle,
    interaction: Interaction,
}

impl Polygon {
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

impl Shape for Polygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
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
        geojson::Geometry::new(geojson::Value::Polygon(vec![to_ring(&self.vertices)]))
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
        let mut outline = to_screen_points(view, &self.vertices);
        if point_in_polygon(pos, &outline) {
            return true;
        }
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        distance_to_polyline(pos, &outline) <= self.style.weight / 2.0 + HIT_TOLERANCE
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        let points = to_screen_points(view, &self.vertices);

        // egui only fills convex paths, so concave rings go through a mesh.
        let fill = style.fill();
        let mut mesh = Mesh::default();
        mesh.vertices.extend(points.iter().map(|&pos| Vertex {
            pos,
            uv: WHITE_UV,
            color: fill,
        }));
        for [a, b, c] in triangulate(&points) {
            mesh.add_triangle(a, b, c);
        }
        painter.add(egui::Shape::mesh(mesh));
        painter.add(egui::Shape::closed_line(points, style.stroke()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_vertex() {
        let mut polygon = Polygon::new(
            vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0)],
            ShapeStyle::default(),
        );
        polygon.move_handle(1, LatLng::new(0.5, 2.0));
        assert_eq!(polygon.vertices()[1], LatLng::new(0.5, 2.0));

        // out-of-range handles are ignored
        polygon.move_handle(7, LatLng::new(9.0, 9.0));
        assert_eq!(polygon.vertices().len(), 3);
    }

    #[test]
    fn test_translate_shifts_every_vertex() {
        let mut polygon = Polygon::new(
            vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0)],
            ShapeStyle::default(),
        );
        polygon.translate(1.0, -1.0);
        assert_eq!(polygon.vertices()[2], LatLng::new(2.0, 0.0));
    }
}
