use egui::{Painter, Pos2};

use super::{Interaction, Shape, ShapeKind};
use crate::geometry::HIT_TOLERANCE;
use crate::map::{LatLng, MapView};
use crate::style::ShapeStyle;

/// A circle with a geographic radius in meters.
///
/// Serialized as a GeoJSON `Point`; the radius travels in the feature properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: LatLng,
    radius: f64,
    style: ShapeStyle,
    interaction: Interaction,
}

impl Circle {
    pub fn new(center: LatLng, radius: f64, style: ShapeStyle) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            style,
            interaction: Interaction::default(),
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }

    fn radius_px(&self, view: &MapView) -> f32 {
        (self.radius / view.meters_per_pixel(self.center.lat)) as f32
    }
}

impl Shape for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
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
        geojson::Geometry::new(geojson::Value::Point(self.center.to_position()))
    }

    fn radius(&self) -> Option<f64> {
        Some(self.radius)
    }

    /// Center handle moves the circle, the east handle sets the radius.
    fn handles(&self) -> Vec<LatLng> {
        vec![self.center, self.center.east_by(self.radius)]
    }

    fn move_handle(&mut self, index: usize, to: LatLng) {
        match index {
            0 => self.center = to,
            1 => self.set_radius(self.center.distance_to(to)),
            _ => {}
        }
    }

    fn translate(&mut self, d_lat: f64, d_lng: f64) {
        self.center = self.center.offset(d_lat, d_lng);
    }

    fn hit_test(&self, pos: Pos2, view: &MapView) -> bool {
        view.to_screen(self.center).distance(pos) <= self.radius_px(view) + HIT_TOLERANCE
    }

    fn draw_with(&self, painter: &Painter, view: &MapView, style: &ShapeStyle) {
        painter.circle(view.to_screen(self.center), self.radius_px(view), style.fill(), style.stroke());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_is_point() {
        let circle = Circle::new(LatLng::new(23.81, 90.41), 150.0, ShapeStyle::default());
        assert_eq!(
            circle.geometry().value,
            geojson::Value::Point(vec![90.41, 23.81])
        );
        assert_eq!(circle.radius(), Some(150.0));
    }

    #[test]
    fn test_radius_handle_resizes() {
        let mut circle = Circle::new(LatLng::new(23.81, 90.41), 150.0, ShapeStyle::default());
        let target = circle.center().east_by(400.0);
        circle.move_handle(1, target);
        assert!((circle.radius().unwrap() - 400.0).abs() < 0.01);
        assert_eq!(circle.center(), LatLng::new(23.81, 90.41));
    }
}
