use egui::{Color32, Painter, Pos2, Ui};

use crate::event::MapEvent;
use crate::input::{InputLocation, MapInput};
use crate::map::MapView;
use crate::shape::ShapeKind;
use crate::state::LayerGroup;
use crate::style::{ShapeStyle, StyleState};

mod delete_tool;
mod draw_tool;
mod edit_session;

pub use delete_tool::DeleteTool;
pub use draw_tool::{DrawState, DrawTool};
pub use edit_session::{EditDrag, EditSession};

/// Default shape options of the draw tool, rebuilt whenever the style changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub polygon: ShapeStyle,
    pub rectangle: ShapeStyle,
    pub circle: ShapeStyle,
    /// Polylines are never filled, so only the color matters.
    pub polyline: Color32,
    pub marker: bool,
}

impl DrawOptions {
    pub fn from_style(style: StyleState, fill_opacity: f32) -> Self {
        let shape_style = style.shape_style(fill_opacity);
        Self {
            polygon: shape_style,
            rectangle: shape_style,
            circle: shape_style,
            polyline: style.stroke_color,
            marker: true,
        }
    }

    /// Style a newly drawn shape of `kind` gets.
    pub fn style_for(&self, kind: ShapeKind) -> ShapeStyle {
        match kind {
            ShapeKind::Polygon | ShapeKind::Marker => self.polygon,
            ShapeKind::Rectangle => self.rectangle,
            ShapeKind::Circle => self.circle,
            ShapeKind::Polyline => ShapeStyle {
                stroke_color: self.polyline,
                fill_opacity: 0.0,
                ..self.polygon
            },
        }
    }

    /// Kinds offered in the draw toolbar.
    pub fn enabled_kinds(&self) -> Vec<ShapeKind> {
        ShapeKind::ALL
            .into_iter()
            .filter(|kind| *kind != ShapeKind::Marker || self.marker)
            .collect()
    }
}

/// What a tool can see of the map while handling input.
#[derive(Clone, Copy)]
pub struct ToolContext<'a> {
    pub view: &'a MapView,
    pub layers: &'a LayerGroup,
    pub options: &'a DrawOptions,
    /// Pointer position over the map, if it is hovering there
    pub hover: Option<Pos2>,
}

/// Tool trait defines the interface for the map tools
pub trait MapTool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool is selected.
    fn activate(&mut self) {
        // default: do nothing
    }

    /// Called when the tool is deselected. Drops any unfinished work.
    fn deactivate(&mut self);

    /// If true, map drags go to the tool instead of panning the map.
    fn captures_drag(&self) -> bool {
        false
    }

    /// A single-shot tool is done after it produced its event.
    fn is_finished(&self) -> bool {
        false
    }

    fn on_pointer_down(&mut self, _at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        None
    }

    fn on_pointer_move(&mut self, _at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        None
    }

    fn on_pointer_up(&mut self, _at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        None
    }

    fn on_click(&mut self, _at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        None
    }

    fn on_double_click(&mut self, _at: InputLocation, _ctx: &ToolContext<'_>) -> Option<MapEvent> {
        None
    }

    /// Escape pressed.
    fn cancel(&mut self);

    /// Route one input to the matching handler.
    fn handle_input(&mut self, input: MapInput, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        match input {
            MapInput::PointerDown(at) => self.on_pointer_down(at, ctx),
            MapInput::PointerMove(at) => self.on_pointer_move(at, ctx),
            MapInput::PointerUp(at) => self.on_pointer_up(at, ctx),
            MapInput::Click(at) => self.on_click(at, ctx),
            MapInput::DoubleClick(at) => self.on_double_click(at, ctx),
            MapInput::Cancel => {
                self.cancel();
                None
            }
        }
    }

    /// Paint the in-progress state over the map.
    fn draw_preview(&self, painter: &Painter, ctx: &ToolContext<'_>);

    /// Tool-specific controls in the side panel.
    fn ui(&mut self, ui: &mut Ui) -> Option<MapEvent>;
}

/// Enum representing all available tool types
#[derive(Debug, Clone)]
pub enum ToolType {
    Draw(DrawTool),
    Delete(DeleteTool),
}

impl MapTool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Draw(tool) => tool.name(),
            Self::Delete(tool) => tool.name(),
        }
    }

    fn activate(&mut self) {
        match self {
            Self::Draw(tool) => tool.activate(),
            Self::Delete(tool) => tool.activate(),
        }
    }

    fn deactivate(&mut self) {
        match self {
            Self::Draw(tool) => tool.deactivate(),
            Self::Delete(tool) => tool.deactivate(),
        }
    }

    fn captures_drag(&self) -> bool {
        match self {
            Self::Draw(tool) => tool.captures_drag(),
            Self::Delete(tool) => tool.captures_drag(),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Self::Draw(tool) => tool.is_finished(),
            Self::Delete(tool) => tool.is_finished(),
        }
    }

    fn cancel(&mut self) {
        match self {
            Self::Draw(tool) => tool.cancel(),
            Self::Delete(tool) => tool.cancel(),
        }
    }

    fn handle_input(&mut self, input: MapInput, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        match self {
            Self::Draw(tool) => tool.handle_input(input, ctx),
            Self::Delete(tool) => tool.handle_input(input, ctx),
        }
    }

    fn draw_preview(&self, painter: &Painter, ctx: &ToolContext<'_>) {
        match self {
            Self::Draw(tool) => tool.draw_preview(painter, ctx),
            Self::Delete(tool) => tool.draw_preview(painter, ctx),
        }
    }

    fn ui(&mut self, ui: &mut Ui) -> Option<MapEvent> {
        match self {
            Self::Draw(tool) => tool.ui(ui),
            Self::Delete(tool) => tool.ui(ui),
        }
    }
}

impl ToolType {
    pub fn draw(kind: ShapeKind) -> Self {
        Self::Draw(DrawTool::new(kind))
    }

    pub fn delete() -> Self {
        Self::Delete(DeleteTool::new())
    }

    /// Shape kind being drawn, for highlighting the toolbar.
    pub fn draw_kind(&self) -> Option<ShapeKind> {
        match self {
            Self::Draw(tool) => Some(tool.kind()),
            Self::Delete(_) => None,
        }
    }

    pub fn is_delete_tool(&self) -> bool {
        matches!(self, Self::Delete(_))
    }

    pub fn current_state_name(&self) -> &'static str {
        match self {
            Self::Draw(tool) => tool.current_state_name(),
            Self::Delete(tool) => tool.current_state_name(),
        }
    }
}
