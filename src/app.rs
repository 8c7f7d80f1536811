use egui::{Painter, Pos2, Response, Ui};

use crate::config::MapConfig;
use crate::controller::MapController;
use crate::event::{EventBus, MapEvent};
use crate::input::{self, MapInput};
use crate::map::{MapView, TileLayer, ViewState};
use crate::panels::{central_panel, tools_panel};
use crate::shape::{Shape, ShapeKind};
use crate::state::{KeyValueStore, MemoryStore};
use crate::tools::{EditSession, MapTool, ToolContext, ToolType};
use crate::widgets::{EditHandle, HandleRole};

/// Storage key of the last map center and zoom.
pub const VIEW_KEY: &str = "MapView";

/// Scroll distance (in points) that makes one zoom step.
const SCROLL_PER_ZOOM_STEP: f32 = 50.0;

pub struct MapAnnotatorApp {
    controller: MapController,
    view: MapView,
    tiles: TileLayer,
    active_tool: Option<ToolType>,
    edit_session: EditSession,
    event_bus: EventBus,
    /// Last outcome worth showing in the side panel.
    status: Option<String>,
    scroll_accum: f32,
    /// Used when eframe has no persistent storage (persistence disabled).
    fallback_store: MemoryStore,
}

impl MapAnnotatorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let config = MapConfig::load(cc.storage);
        let mut view = MapView::from_config(&config);
        if let Some(state) = cc.storage.and_then(|s| eframe::get_value::<ViewState>(s, VIEW_KEY)) {
            view.restore(state);
        }
        let tiles = TileLayer::from_config(&config);

        let controller = match cc.storage {
            Some(storage) => MapController::initialize(config, storage),
            None => {
                log::warn!("No persistent storage available; shapes will not survive a restart");
                MapController::initialize(config, &MemoryStore::new())
            }
        };

        Self::with_parts(controller, view, tiles)
    }

    /// Assemble the app around an already initialized controller.
    pub fn with_parts(controller: MapController, view: MapView, tiles: TileLayer) -> Self {
        Self {
            controller,
            view,
            tiles,
            active_tool: None,
            edit_session: EditSession::new(),
            event_bus: EventBus::new(),
            status: None,
            scroll_accum: 0.0,
            fallback_store: MemoryStore::new(),
        }
    }

    pub fn controller(&self) -> &MapController {
        &self.controller
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MapView {
        &mut self.view
    }

    pub fn tiles(&self) -> &TileLayer {
        &self.tiles
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn active_tool(&self) -> Option<&ToolType> {
        self.active_tool.as_ref()
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut ToolType> {
        self.active_tool.as_mut()
    }

    /// Swap tools; the outgoing tool drops any unfinished work.
    pub fn set_active_tool(&mut self, tool: Option<ToolType>) {
        if let Some(old) = &mut self.active_tool {
            old.deactivate();
        }
        self.active_tool = tool;
        if let Some(new) = &mut self.active_tool {
            log::info!("Tool selected: {}", new.name());
            new.activate();
            // Drawing and deleting happen outside edit mode.
            self.event_bus.emit(MapEvent::EditingStopped);
            self.edit_session.end();
        }
    }

    /// Turn this frame's pointer activity on the map into tool input, edit
    /// drags, panning and zooming.
    pub fn handle_map_input(&mut self, ui: &Ui, response: &Response) {
        let hover = response.hover_pos();
        for input in input::collect_inputs(ui, response, &self.view) {
            if let Some(tool) = &mut self.active_tool {
                let ctx = ToolContext {
                    view: &self.view,
                    layers: self.controller.layers(),
                    options: self.controller.draw_options(),
                    hover,
                };
                if let Some(event) = tool.handle_input(input, &ctx) {
                    self.event_bus.emit(event);
                }
            } else {
                self.handle_edit_input(input);
            }
        }

        let tool_has_drag = self.active_tool.as_ref().is_some_and(|t| t.captures_drag());
        if response.dragged() && !tool_has_drag && !self.edit_session.is_dragging() {
            self.view.pan_by(response.drag_delta());
        }

        if let Some(anchor) = hover {
            self.scroll_accum += ui.input(|i| i.raw_scroll_delta.y);
            let steps = (self.scroll_accum / SCROLL_PER_ZOOM_STEP).trunc();
            if steps != 0.0 {
                self.scroll_accum -= steps * SCROLL_PER_ZOOM_STEP;
                self.view.zoom_around(anchor, steps as i32);
            }
        } else {
            self.scroll_accum = 0.0;
        }
    }

    fn handle_edit_input(&mut self, input: MapInput) {
        let Some(id) = self.controller.editing_layer() else {
            self.edit_session.end();
            return;
        };
        match input {
            MapInput::PointerDown(at) => {
                if let Some(layer) = self.controller.layer(id) {
                    self.edit_session.begin(at, layer, &self.view);
                }
            }
            MapInput::PointerMove(at) => {
                if let Some(layer) = self.controller.layer_mut(id) {
                    self.edit_session.update(at, layer);
                }
            }
            MapInput::PointerUp(_) => self.edit_session.end(),
            MapInput::Cancel => self.event_bus.emit(MapEvent::EditingStopped),
            MapInput::Click(_) | MapInput::DoubleClick(_) => {}
        }
    }

    /// Shapes, edit handles and the active tool's preview, over the tiles.
    pub fn paint_map(&self, ui: &Ui, painter: &Painter, hover: Option<Pos2>) {
        self.tiles.paint(ui, &self.view);

        for (_, entry) in self.controller.layers().iter() {
            entry.layer.draw(painter, &self.view);
        }

        if let Some(layer) = self.controller.editing_layer().and_then(|id| self.controller.layer(id)) {
            let handles = EditSession::handle_positions(layer, &self.view);
            let hovered = hover.and_then(|pos| crate::geometry::pick_handle(pos, &handles));
            for (index, position) in handles.into_iter().enumerate() {
                let role = if layer.kind() == ShapeKind::Circle && index == 1 {
                    HandleRole::Radius
                } else {
                    HandleRole::Vertex
                };
                let handle = EditHandle::new(role, position, hovered == Some(index));
                if hovered == Some(index) {
                    ui.ctx().set_cursor_icon(handle.role().cursor_icon());
                }
                handle.paint(painter);
            }
        }

        if let Some(tool) = &self.active_tool {
            let ctx = ToolContext {
                view: &self.view,
                layers: self.controller.layers(),
                options: self.controller.draw_options(),
                hover,
            };
            tool.draw_preview(painter, &ctx);
        }
    }

    /// Hand every queued event to the controller.
    pub fn process_events(&mut self, frame: &mut eframe::Frame) {
        for event in self.event_bus.drain() {
            match frame.storage_mut() {
                Some(storage) => Self::apply_event(&mut self.controller, event, storage, &mut self.status),
                None => Self::apply_event(&mut self.controller, event, &mut self.fallback_store, &mut self.status),
            }
        }

        if self.controller.editing_layer().is_none() {
            self.edit_session.end();
        }
        if self.active_tool.as_ref().is_some_and(|t| t.is_finished()) {
            self.set_active_tool(None);
        }
    }

    fn apply_event<S: KeyValueStore + ?Sized>(
        controller: &mut MapController,
        event: MapEvent,
        store: &mut S,
        status: &mut Option<String>,
    ) {
        let message = match &event {
            MapEvent::ShapeCreated { layer_type, .. } => Some(format!("{} drawn; save to keep it", layer_type.label())),
            MapEvent::ShapesDeleted { ids } => Some(format!("Deleted {} shapes", ids.len())),
            MapEvent::SaveRequested => Some("Shapes saved".to_string()),
            MapEvent::DeleteRequested { .. } => Some("Shape removed; save to make it permanent".to_string()),
            _ => None,
        };

        match controller.dispatch(event, store) {
            Ok(()) if message.is_some() => *status = message,
            Ok(()) => {}
            Err(e) => {
                log::warn!("{}", e);
                *status = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for MapAnnotatorApp {
    /// Shapes are saved explicitly; only the view is kept here.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, VIEW_KEY, &self.view.state());
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.process_events(frame);
    }
}
