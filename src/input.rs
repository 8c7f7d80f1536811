use egui::{Pos2, Response, Ui};

use crate::map::{LatLng, MapView};

/// Where on the map an input happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position in screen coordinates
    pub position: Pos2,
    pub lat_lng: LatLng,
}

impl InputLocation {
    pub fn new(position: Pos2, view: &MapView) -> Self {
        Self {
            position,
            lat_lng: view.to_lat_lng(position),
        }
    }
}

/// Pointer and keyboard input on the map, already resolved to map positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapInput {
    /// A drag started; the location is where the button went down
    PointerDown(InputLocation),
    /// The pointer moved while dragging
    PointerMove(InputLocation),
    /// The drag ended
    PointerUp(InputLocation),
    Click(InputLocation),
    DoubleClick(InputLocation),
    /// Escape was pressed
    Cancel,
}

impl MapInput {
    pub fn location(&self) -> Option<InputLocation> {
        match self {
            MapInput::PointerDown(l)
            | MapInput::PointerMove(l)
            | MapInput::PointerUp(l)
            | MapInput::Click(l)
            | MapInput::DoubleClick(l) => Some(*l),
            MapInput::Cancel => None,
        }
    }
}

/// Translate this frame's interaction with the map area into [`MapInput`]s.
pub fn collect_inputs(ui: &Ui, response: &Response, view: &MapView) -> Vec<MapInput> {
    let mut inputs = Vec::new();
    let current = response
        .interact_pointer_pos()
        .or_else(|| response.hover_pos())
        .or_else(|| ui.input(|i| i.pointer.latest_pos()));

    if response.drag_started() {
        // egui reports the drag once the pointer has moved; start from the press.
        let origin = ui.input(|i| i.pointer.press_origin()).or(current);
        if let Some(pos) = origin {
            inputs.push(MapInput::PointerDown(InputLocation::new(pos, view)));
        }
    }
    if response.dragged() {
        if let Some(pos) = current {
            inputs.push(MapInput::PointerMove(InputLocation::new(pos, view)));
        }
    }
    if response.drag_stopped() {
        if let Some(pos) = current {
            inputs.push(MapInput::PointerUp(InputLocation::new(pos, view)));
        }
    }
    if response.clicked() {
        if let Some(pos) = current {
            inputs.push(MapInput::Click(InputLocation::new(pos, view)));
        }
    }
    if response.double_clicked() {
        if let Some(pos) = current {
            inputs.push(MapInput::DoubleClick(InputLocation::new(pos, view)));
        }
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        inputs.push(MapInput::Cancel);
    }
    inputs
}
