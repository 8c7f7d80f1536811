use crate::MapAnnotatorApp;

pub fn central_panel(app: &mut MapAnnotatorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            app.view_mut().set_viewport(response.rect);

            // Input first so this frame already paints the result.
            app.handle_map_input(ui, &response);
            app.paint_map(ui, &painter, response.hover_pos());

            egui::Area::new(egui::Id::new("zoom_controls"))
                .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        if ui.button("➕").on_hover_text("Zoom in").clicked() {
                            app.view_mut().zoom_in();
                        }
                        if ui.button("➖").on_hover_text("Zoom out").clicked() {
                            app.view_mut().zoom_out();
                        }
                        ui.label(format!("z{}", app.view().zoom()));
                    });
                });
        });
}
