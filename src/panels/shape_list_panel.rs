use egui::{Color32, Ui};

use crate::event::MapEvent;
use crate::style;
use crate::MapAnnotatorApp;

/// The saved shapes, one row per list entry, with per-row actions.
pub fn shape_list_panel(app: &MapAnnotatorApp, ui: &mut Ui) {
    let controller = app.controller();
    let bus = app.event_bus();

    ui.horizontal(|ui| {
        ui.heading("Shapes");
        ui.label(format!("({})", controller.shapes().len()));
    });

    let pending = controller.pending_count();
    ui.horizontal(|ui| {
        if ui.button("💾 Save all").clicked() {
            bus.emit(MapEvent::SaveRequested);
        }
        if pending > 0 {
            ui.colored_label(Color32::from_rgb(230, 160, 40), format!("{} unsaved", pending));
        }
    });

    if controller.shapes().is_empty() {
        ui.label("No saved shapes yet.");
        return;
    }

    let editing = controller.editing_layer();
    egui::ScrollArea::vertical().auto_shrink([false, true]).show(ui, |ui| {
        egui::Grid::new("shape_list_grid")
            .num_columns(6)
            .spacing([8.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.strong("#");
                ui.strong("Type");
                ui.strong("Id");
                ui.strong("Colors");
                ui.strong("Radius");
                ui.strong("");
                ui.end_row();

                for (index, feature) in controller.shapes().iter().enumerate() {
                    let properties = &feature.properties;
                    ui.label(index.to_string());
                    ui.label(properties.shape_type.as_deref().unwrap_or("?"));
                    ui.label(feature.shape_id.map(|id| id.to_string()).unwrap_or_default());
                    ui.horizontal(|ui| {
                        swatch(ui, properties.stroke_color.as_deref());
                        swatch(ui, properties.fill_color.as_deref());
                    });
                    match properties.radius {
                        Some(radius) => ui.label(format!("{:.0} m", radius)),
                        None => ui.label("-"),
                    };

                    ui.horizontal(|ui| {
                        let is_editing = feature.shape_id.is_some() && feature.shape_id == editing;
                        if is_editing {
                            if ui.button("Done").clicked() {
                                bus.emit(MapEvent::EditingStopped);
                            }
                        } else if ui.button("Edit").clicked() {
                            bus.emit(MapEvent::EditRequested { index });
                        }
                        if ui.button("Save").clicked() {
                            bus.emit(MapEvent::SaveRequested);
                        }
                        if ui.button("Delete").clicked() {
                            bus.emit(MapEvent::DeleteRequested { index });
                        }
                    });
                    ui.end_row();
                }
            });
    });
}

fn swatch(ui: &mut Ui, hex: Option<&str>) {
    let color = hex.and_then(|h| style::parse_hex_color(h).ok());
    let (rect, response) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
    match color {
        Some(color) => {
            ui.painter().rect_filled(rect, 2.0, color);
        }
        None => {
            ui.painter().rect_stroke(rect, 2.0, egui::Stroke::new(1.0, Color32::GRAY));
        }
    }
    response.on_hover_text(hex.unwrap_or("none"));
}
