use egui::{Painter, Pos2};

use super::{to_ring, to_screen_points, Interaction, Shape, ShapeKind};
use crate::geometry::{distance_to_polyline, point_in_polygon, HIT_TOLERANCE};
use crate::map::{LatLng, LatLngBounds, MapView};
use crate::style::ShapeStyle;

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    bounds: LatLngBounds,
    style: ShapeStyle,
    interaction: Interaction,
}

impl Rectangle {
    pub fn new(bounds: LatLngBounds, style: ShapeStyle) -> Self {
        Self {
            bounds,
            style,
            interaction: Interaction::default(),
        }
    }

    pub fn bounds(&self) -> LatLngBounds {
        self.bounds
    }
}

impl Shape for Rectangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
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
        let ring = to_ring(&self.bounds.corners());
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }

    fn handles(&self) -> Vec<LatLng> {
        self.bounds.corners().to_vec()
    }

    /// Dragging a corner keeps the opposite corner where it is.
    fn move_handle(&mut self, index: usize, to: LatLng) {
        let corners = self.bounds.corners();
        if index < corners.len() {
            let opposite = corners[(index + 2) % corners.len()];
            self.bounds = LatLngBounds::from_corners(opposite, to);
        }
    }

    fn translate(&mut self, d_lat: f64, d_lng: f64) {
        self.bounds = LatLngBounds::from_corners(
            self.bounds.south_west.offset(d_lat, d_lng),
            self.bounds.north_east.offset(d_lat, d_lng),
        );
    }

    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool {
        let mut outline = to_screen_points(view, &self.bounds.corners());
        if point_in_polygon(pos, &outline) {
            return true;
        }
        outline.push(outline[0]);
        distance_to_polyline(pos, &outline) <= self.style.weight / 2.0 + HIT_TOLERANCE
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        let points = to_screen_points(view, &self.bounds.corners());
        painter.add(egui::Shape::convex_polygon(points, style.fill(), style.stroke()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rectangle {
        Rectangle::new(
            LatLngBounds::from_corners(LatLng::new(23.80, 90.40), LatLng::new(23.82, 90.42)),
            ShapeStyle::default(),
        )
    }

    #[test]
    fn test_geometry_ring_order() {
        let geojson::Value::Polygon(rings) = rect().geometry().value else {
            panic!("rectangle should serialize as a polygon");
        };
        assert_eq!(
            rings[0],
            vec![
                vec![90.40, 23.80],
                vec![90.40, 23.82],
                vec![90.42, 23.82],
                vec![90.42, 23.80],
                vec![90.40, 23.80],
            ]
        );
    }

    #[test]
    fn test_corner_drag_keeps_opposite_corner() {
        let mut rect = rect();
        // drag the north-east corner further out
        rect.move_handle(2, LatLng::new(23.85, 90.45));
        assert_eq!(rect.bounds().south_west, LatLng::new(23.80, 90.40));
        assert_eq!(rect.bounds().north_east, LatLng::new(23.85, 90.45));
    }
}
