use std::collections::BTreeSet;

use egui::{Painter, Ui};

use super::{MapTool, ToolContext};
use crate::event::MapEvent;
use crate::id_generator::ShapeId;
use crate::input::InputLocation;
use crate::shape::Shape;

/// Bulk removal mode: clicked shapes are marked, and applying removes them
/// all at once.
#[derive(Debug, Clone, Default)]
pub struct DeleteTool {
    marked: BTreeSet<ShapeId>,
}

impl DeleteTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marked(&self) -> &BTreeSet<ShapeId> {
        &self.marked
    }

    pub fn is_marked(&self, id: ShapeId) -> bool {
        self.marked.contains(&id)
    }

    pub fn current_state_name(&self) -> &'static str {
        if self.marked.is_empty() { "Idle" } else { "Marking" }
    }

    /// Emit the bulk delete for everything marked.
    pub fn apply(&mut self) -> Option<MapEvent> {
        if self.marked.is_empty() {
            return None;
        }
        let ids: Vec<ShapeId> = std::mem::take(&mut self.marked).into_iter().collect();
        log::debug!("Delete tool removing {:?}", ids);
        Some(MapEvent::ShapesDeleted { ids })
    }
}

impl MapTool for DeleteTool {
    fn name(&self) -> &'static str {
        "Delete"
    }

    fn deactivate(&mut self) {
        self.marked.clear();
    }

    fn on_click(&mut self, at: InputLocation, ctx: &ToolContext<'_>) -> Option<MapEvent> {
        let id = ctx.layers.hit_test(at.position, ctx.view)?;
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
        None
    }

    fn cancel(&mut self) {
        self.marked.clear();
    }

    fn draw_preview(&self, painter: &Painter, ctx: &ToolContext<'_>) {
        for id in &self.marked {
            if let Some(entry) = ctx.layers.get(*id) {
                let style = entry.layer.style().faded();
                entry.layer.draw_with(painter, ctx.view, &style);
            }
        }
    }

    fn ui(&mut self, ui: &mut Ui) -> Option<MapEvent> {
        ui.label("Click shapes to mark them for removal.");
        ui.label(format!("{} marked", self.marked.len()));

        let mut event = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.marked.is_empty(), egui::Button::new("Apply"))
                .clicked()
            {
                event = self.apply();
            }
            if ui.button("Cancel").clicked() {
                self.cancel();
            }
        });
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ShapeFeature;
    use crate::map::{LatLng, MapView};
    use crate::shape::{Circle, ShapeLayer};
    use crate::state::{LayerEntry, LayerGroup, LayerStatus};
    use crate::style::StyleState;
    use crate::tools::DrawOptions;
    use egui::{Pos2, Rect};

    fn entry(layer: ShapeLayer, id: ShapeId) -> LayerEntry {
        LayerEntry {
            feature: ShapeFeature::new(id, layer.geometry(), Default::default()),
            layer,
            status: LayerStatus::Saved,
        }
    }

    #[test]
    fn test_click_toggles_mark_and_apply_emits() {
        let mut view = MapView::new(LatLng::new(23.81, 90.41), 13);
        view.set_viewport(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)));
        let mut layers = LayerGroup::new();
        let circle = Circle::new(view.center(), 500.0, Default::default());
        layers.insert(7, entry(circle.into(), 7));
        let options = DrawOptions::from_style(StyleState::default(), 0.5);
        let ctx = ToolContext {
            view: &view,
            layers: &layers,
            options: &options,
            hover: None,
        };

        let mut tool = DeleteTool::new();
        let center = InputLocation::new(view.viewport().center(), &view);
        tool.on_click(center, &ctx);
        assert!(tool.is_marked(7));
        tool.on_click(center, &ctx);
        assert!(!tool.is_marked(7));

        // empty map area
        tool.on_click(InputLocation::new(Pos2::new(5.0, 5.0), &view), &ctx);
        assert!(tool.marked().is_empty());
        assert_eq!(tool.apply(), None);

        tool.on_click(center, &ctx);
        assert_eq!(tool.apply(), Some(MapEvent::ShapesDeleted { ids: vec![7] }));
        assert!(tool.marked().is_empty());
    }
}
