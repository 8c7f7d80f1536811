use egui::color_picker::{self, Alpha};

use crate::components::ToolButton;
use crate::event::MapEvent;
use crate::panels::shape_list_panel;
use crate::tools::{MapTool, ToolType};
use crate::MapAnnotatorApp;

pub fn tools_panel(app: &mut MapAnnotatorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Style");
            let current = app.controller().style();
            let mut style = current;
            egui::Grid::new("style_grid").num_columns(2).show(ui, |ui| {
                ui.label("Stroke");
                color_picker::color_edit_button_srgba(ui, &mut style.stroke_color, Alpha::Opaque);
                ui.end_row();
                ui.label("Fill");
                color_picker::color_edit_button_srgba(ui, &mut style.fill_color, Alpha::Opaque);
                ui.end_row();
            });
            if style != current {
                app.event_bus().emit(MapEvent::StyleChanged(style));
            }
            ui.separator();

            ui.heading("Draw");
            let active_kind = app.active_tool().and_then(|tool| tool.draw_kind());
            let deleting = app.active_tool().is_some_and(|tool| tool.is_delete_tool());
            let kinds = app.controller().draw_options().enabled_kinds();
            ui.horizontal_wrapped(|ui| {
                for kind in kinds {
                    let selected = active_kind == Some(kind);
                    if ToolButton::new(kind.icon(), kind.label(), selected).show(ui).clicked() {
                        let tool = if selected { None } else { Some(ToolType::draw(kind)) };
                        app.set_active_tool(tool);
                    }
                }
                ui.separator();
                if ToolButton::new("🗑", "Delete shapes", deleting).show(ui).clicked() {
                    let tool = if deleting { None } else { Some(ToolType::delete()) };
                    app.set_active_tool(tool);
                }
            });

            // Options of the active tool
            let mut tool_event = None;
            if let Some(tool) = app.active_tool_mut() {
                ui.horizontal(|ui| {
                    ui.strong(tool.name());
                    ui.label(format!("({})", tool.current_state_name()));
                });
                tool_event = tool.ui(ui);
            }
            if let Some(event) = tool_event {
                app.event_bus().emit(event);
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
            ui.separator();

            shape_list_panel(app, ui);
        });
}
