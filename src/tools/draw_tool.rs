use egui::{Color32, Painter, Stroke, Ui};

use super::{MapTool, ToolContext};
use crate::event::MapEvent;
use crate::geometry::{HANDLE_RADIUS, HIT_TOLERANCE};
use crate::input::InputLocation;
use crate::map::{LatLng, LatLngBounds};
use crate::shape::{Circle, Marker, Polygon, Polyline, Rectangle, Shape, ShapeKind, ShapeLayer};

/// Drags shorter than this (in pixels) do not produce a circle or rectangle.
const MIN_DRAG_PX: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawState {
    Idle,
    /// Circle or rectangle being dragged out.
    Dragging { start: LatLng, current: LatLng },
    /// Polygon or polyline vertices placed so far.
    Placing { vertices: Vec<LatLng> },
    Finished,
}

/// Draws one shape of a fixed kind, then finishes.
#[derive(Debug, Clone)]
pub struct DrawTool {
    kind: ShapeKind,
    state: DrawState,
}

impl DrawTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            state: DrawState::Idle,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn current_state_name(&self) -> &'static str {
        match self.state {
            DrawState::Idle => "Idle",
            DrawState::Dragging { .. } => "Dragging",
            DrawState::Placing { .. } => "Placing",
            DrawState::Finished => "Finished",
        }
    }

    fn is_drag_kind(&self) -> bool {
        matches!(self.kind, ShapeKind::Circle | ShapeKind::Rectangle)
    }

    fn is_vertex_kind(&self) -> bool {
        matches!(self.kind, ShapeKind::Polygon | ShapeKind::Polyline)
    }

    fn min_vertices(&self) -> usize {
        if self.kind == ShapeKind::Polygon { 3 } else { 2 }
    }

    fn finish(&mut self, layer: ShapeLayer) -> Option<MapEvent> {
        self.state = DrawState::Finished;
        log::debug!("Draw tool finished a {}", self.kind);
        Some(MapEvent::ShapeCreated {
            layer,
            layer_type: self.kind,
        })
    }

    /// The shape a drag from `start` to `end` describes.
    fn dragged_shape(&self, start: LatLng, end: LatLng, ctx: &ToolContext<'_>) -> Option<ShapeLayer> {
        let style = ctx.options.style_for(self.kind);
        match self.kind {
            ShapeKind::Circle => Some(Circle::new(start, start.distance_to(end), style).into()),
            ShapeKind::Rectangle => Some(Rectangle::new(LatLngBounds::from_corners(start, end), style).into()),
            _ => None,
        }
    }

    fn placed_shape(&self, vertices: Vec<LatLng>, ctx: &ToolContext<'_>) -> ShapeLayer {
        let style = ctx.options.style_for(self.kind);
        if self.kind == ShapeKind::Polygon {
            Polygon::new(vertices, style).into()
        } else {
            Polyline::new(vertices, style).into()
        }
    }
}

impl MapTool for DrawTool {
    fn name(&self) -> &'static str {
        self.kind.label()
    }

    fn activate(&mut self) {
        self.state = DrawState::Idle;
    }

    fn deactivate(&mut self) {
        self.state = DrawState::Idle;
    }

    fn captures_drag(&self) -> bool {
        self.is_drag_kind()
    }

    fn is_finished(&self) -> bool {
        self.state == DrawState::Finished
    }

    fn on_pointer_down(&mut self, at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        if self.is_drag_kind() && self.state == DrawState::Idle {
            self.state = DrawState::Dragging {
                start: at.lat_lng,
                current: at.lat_lng,
            };
        }
        None
    }

    fn on_pointer_move(&mut self, at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        if let DrawState::Dragging { current, .. } = &mut self.state {
            *current = at.lat_lng;
        }
        None
    }

    fn on_pointer_up(&mut self, at: InputLocation, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        let DrawState::Dragging { start, .. } = self.state else {
            return None;
        };
        if ctx.view.to_screen(start).distance(at.position) < MIN_DRAG_PX {
            self.state = DrawState::Idle;
            return None;
        }
        let layer = self.dragged_shape(start, at.lat_lng, ctx)?;
        self.finish(layer)
    }

    fn on_click(&mut self, at: InputLocation, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        if self.kind == ShapeKind::Marker && self.state == DrawState::Idle {
            let marker = Marker::new(at.lat_lng, ctx.options.style_for(ShapeKind::Marker));
            return self.finish(marker.into());
        }
        if !self.is_vertex_kind() {
            return None;
        }

        if self.state == DrawState::Idle {
            self.state = DrawState::Placing {
                vertices: vec![at.lat_lng],
            };
            return None;
        }
        let is_polygon = self.kind == ShapeKind::Polygon;
        let DrawState::Placing { vertices } = &mut self.state else {
            return None;
        };

        // Clicking the first vertex closes a polygon.
        let closes = is_polygon
            && vertices.len() >= 3
            && ctx.view.to_screen(vertices[0]).distance(at.position) <= HANDLE_RADIUS;
        if closes {
            let vertices = std::mem::take(vertices);
            let layer = self.placed_shape(vertices, ctx);
            return self.finish(layer);
        }
        vertices.push(at.lat_lng);
        None
    }

    fn on_double_click(&mut self, at: InputLocation, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        let min_vertices = self.min_vertices();
        let DrawState::Placing { vertices } = &mut self.state else {
            return None;
        };

        // Both clicks of a double click already placed a vertex; keep one.
        if vertices.len() >= 2 {
            let previous = ctx.view.to_screen(vertices[vertices.len() - 2]);
            if previous.distance(at.position) <= HIT_TOLERANCE * 2.0 {
                vertices.pop();
            }
        }
        if vertices.len() < min_vertices {
            log::debug!("Need {} vertices to finish, have {}", min_vertices, vertices.len());
            return None;
        }
        let vertices = std::mem::take(vertices);
        let layer = self.placed_shape(vertices, ctx);
        self.finish(layer)
    }

    fn cancel(&mut self) {
        if self.state != DrawState::Idle {
            log::debug!("Draw tool cancelled");
        }
        self.state = DrawState::Idle;
    }

    fn draw_preview(&self, painter: &Painter, ctx: &ToolContext<'_>) {
        let style = ctx.options.style_for(self.kind);
        match &self.state {
            DrawState::Dragging { start, current } => {
                if let Some(layer) = self.dragged_shape(*start, *current, ctx) {
                    layer.draw_with(painter, ctx.view, &style.faded());
                }
            }
            DrawState::Placing { vertices } => {
                let mut outline = vertices.clone();
                if let Some(hover) = ctx.hover {
                    outline.push(ctx.view.to_lat_lng(hover));
                }
                if self.kind == ShapeKind::Polygon && outline.len() >= 3 {
                    Polygon::new(outline.clone(), style.faded()).draw(painter, ctx.view);
                }

                let points: Vec<_> = outline.iter().map(|v| ctx.view.to_screen(*v)).collect();
                let stroke = Stroke::new(style.weight, style.stroke_color);
                painter.extend(egui::Shape::dashed_line(&points, stroke, 8.0, 4.0));
                for point in &points[..vertices.len()] {
                    painter.circle(*point, 4.0, Color32::WHITE, Stroke::new(1.0, style.stroke_color));
                }
            }
            DrawState::Idle | DrawState::Finished => {}
        }
    }

    fn ui(&mut self, ui: &mut Ui) -> Option<MapEvent> {
        let hint = match self.kind {
            ShapeKind::Marker => "Click the map to place a marker.",
            ShapeKind::Circle => "Press and drag from the center to set the radius.",
            ShapeKind::Rectangle => "Press and drag from one corner to the opposite one.",
            ShapeKind::Polygon => "Click to add vertices. Double-click or click the first vertex to finish.",
            ShapeKind::Polyline => "Click to add vertices. Double-click to finish.",
        };
        ui.label(hint);
        if ui.button("Cancel drawing").clicked() {
            self.cancel();
            self.state = DrawState::Finished;
        }
        None
    }
}
