use egui::{Color32, CursorIcon, Painter, Pos2, Stroke};

use crate::geometry::HANDLE_RADIUS;

/// Which edit handle of a shape this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRole {
    /// A polygon / polyline / rectangle vertex, or a circle's center
    Vertex,
    /// The east point of a circle, dragged to change the radius
    Radius,
}

impl HandleRole {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandleRole::Vertex => CursorIcon::Grab,
            HandleRole::Radius => CursorIcon::ResizeHorizontal,
        }
    }
}

/// A draggable point on the shape being edited. Interaction goes through the
/// map response; this only paints.
pub struct EditHandle {
    role: HandleRole,
    position: Pos2,
    hovered: bool,
}

impl EditHandle {
    pub fn new(role: HandleRole, position: Pos2, hovered: bool) -> Self {
        Self {
            role,
            position,
            hovered,
        }
    }

    pub fn role(&self) -> HandleRole {
        self.role
    }

    pub fn paint(&self, painter: &Painter) {
        let fill = if self.hovered {
            Color32::from_rgb(30, 120, 255) // Bright blue
        } else {
            Color32::WHITE
        };
        let radius = HANDLE_RADIUS * 0.75;
        match self.role {
            HandleRole::Vertex => {
                let rect = egui::Rect::from_center_size(self.position, egui::Vec2::splat(radius * 2.0));
                painter.rect_filled(rect, 2.0, fill);
                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::from_rgb(30, 120, 255)));
            }
            HandleRole::Radius => {
                painter.circle_filled(self.position, radius, fill);
                painter.circle_stroke(self.position, radius, Stroke::new(1.0, Color32::from_rgb(30, 120, 255)));
            }
        }
    }
}
