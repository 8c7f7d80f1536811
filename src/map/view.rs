use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::coords::LatLng;
use super::projection::{self, WorldPoint};
use crate::config::MapConfig;

/// The part of the view worth remembering between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: LatLng,
    pub zoom: u8,
}

/// Maps between geographic positions and screen positions for one viewport.
#[derive(Debug, Clone)]
pub struct MapView {
    center: LatLng,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    viewport: Rect,
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            min_zoom: 1,
            max_zoom: 19,
            viewport: Rect::from_min_size(Pos2::ZERO, Vec2::splat(512.0)),
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        let mut view = Self::new(config.initial_center(), config.zoom);
        view.set_zoom_range(config.min_zoom, config.max_zoom);
        view
    }

    pub fn set_zoom_range(&mut self, min_zoom: u8, max_zoom: u8) {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Screen rectangle the map is painted into this frame.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            center: self.center,
            zoom: self.zoom,
        }
    }

    pub fn restore(&mut self, state: ViewState) {
        self.set_view(state.center, state.zoom);
    }

    /// World pixel coordinates of the viewport center.
    pub fn center_world(&self) -> WorldPoint {
        projection::project(self.center, self.zoom)
    }

    pub fn to_screen(&self, position: LatLng) -> Pos2 {
        let point = projection::project(position, self.zoom);
        let center = self.center_world();
        let origin = self.viewport.center();
        Pos2::new(
            origin.x + (point.x - center.x) as f32,
            origin.y + (point.y - center.y) as f32,
        )
    }

    pub fn to_lat_lng(&self, pos: Pos2) -> LatLng {
        let center = self.center_world();
        let offset = pos - self.viewport.center();
        projection::unproject(
            WorldPoint {
                x: center.x + f64::from(offset.x),
                y: center.y + f64::from(offset.y),
            },
            self.zoom,
        )
    }

    /// Move the map with the pointer: the content follows `delta`.
    pub fn pan_by(&mut self, delta: Vec2) {
        let center = self.center_world();
        self.center = projection::unproject(
            WorldPoint {
                x: center.x - f64::from(delta.x),
                y: center.y - f64::from(delta.y),
            },
            self.zoom,
        );
    }

    /// Change zoom by `steps` keeping the position under `anchor` fixed on screen.
    pub fn zoom_around(&mut self, anchor: Pos2, steps: i32) {
        let target = (i32::from(self.zoom) + steps).clamp(i32::from(self.min_zoom), i32::from(self.max_zoom));
        let target = target as u8;
        if target == self.zoom {
            return;
        }

        let fixed = self.to_lat_lng(anchor);
        self.zoom = target;
        let fixed_world = projection::project(fixed, self.zoom);
        let offset = anchor - self.viewport.center();
        self.center = projection::unproject(
            WorldPoint {
                x: fixed_world.x - f64::from(offset.x),
                y: fixed_world.y - f64::from(offset.y),
            },
            self.zoom,
        );
    }

    pub fn zoom_in(&mut self) {
        self.zoom_around(self.viewport.center(), 1);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_around(self.viewport.center(), -1);
    }

    pub fn meters_per_pixel(&self, lat: f64) -> f64 {
        projection::meters_per_pixel(lat, self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        let mut view = MapView::new(LatLng::new(23.8103, 90.4125), 13);
        view.set_viewport(Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0)));
        view
    }

    #[test]
    fn test_center_is_viewport_center() {
        let view = view();
        let pos = view.to_screen(view.center());
        assert!((pos - view.viewport().center()).length() < 1e-3);
    }

    #[test]
    fn test_screen_round_trip() {
        let view = view();
        let pos = Pos2::new(300.0, 200.0);
        let back = view.to_screen(view.to_lat_lng(pos));
        assert!((back - pos).length() < 1e-2);
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let mut view = view();
        let anchor = LatLng::new(23.80, 90.40);
        let before = view.to_screen(anchor);
        view.pan_by(Vec2::new(40.0, -25.0));
        let after = view.to_screen(anchor);
        assert!((after - before - Vec2::new(40.0, -25.0)).length() < 1e-2);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = view();
        let anchor = Pos2::new(250.0, 400.0);
        let under = view.to_lat_lng(anchor);
        view.zoom_around(anchor, 2);
        assert_eq!(view.zoom(), 15);
        assert!((view.to_screen(under) - anchor).length() < 1e-2);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = view();
        view.set_zoom_range(3, 14);
        view.zoom_around(view.viewport().center(), 10);
        assert_eq!(view.zoom(), 14);
        view.zoom_around(view.viewport().center(), -40);
        assert_eq!(view.zoom(), 3);
    }
}
