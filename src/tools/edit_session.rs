use egui::Pos2;

use crate::geometry::pick_handle;
use crate::input::InputLocation;
use crate::map::{LatLng, MapView};
use crate::shape::{Shape, ShapeLayer};

/// What a drag on the editing layer is moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditDrag {
    Handle { index: usize },
    /// The whole shape; `last` is where the previous move ended.
    Body { last: LatLng },
}

/// Pointer drags on the layer that is in edit mode.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    drag: Option<EditDrag>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> Option<EditDrag> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Screen positions of the layer's edit handles, empty when not editing.
    pub fn handle_positions(layer: &ShapeLayer, view: &MapView) -> Vec<Pos2> {
        if !layer.interaction().editing {
            return Vec::new();
        }
        layer.handles().into_iter().map(|h| view.to_screen(h)).collect()
    }

    /// Start a drag if `at` is on a handle or, with dragging enabled, on the
    /// shape itself. Returns whether the drag was taken.
    pub fn begin(&mut self, at: InputLocation, layer: &ShapeLayer, view: &MapView) -> bool {
        let handles = Self::handle_positions(layer, view);
        self.drag = if let Some(index) = pick_handle(at.position, &handles) {
            Some(EditDrag::Handle { index })
        } else if layer.interaction().dragging && layer.hit_test(at.position, view) {
            Some(EditDrag::Body { last: at.lat_lng })
        } else {
            None
        };
        self.drag.is_some()
    }

    pub fn update(&mut self, at: InputLocation, layer: &mut ShapeLayer) {
        match &mut self.drag {
            Some(EditDrag::Handle { index }) => layer.move_handle(*index, at.lat_lng),
            Some(EditDrag::Body { last }) => {
                layer.translate(at.lat_lng.lat - last.lat, at.lat_lng.lng - last.lng);
                *last = at.lat_lng;
            }
            None => {}
        }
    }

    pub fn end(&mut self) {
        self.drag = None;
    }
}
