//! The map controller: owns the live layers and the shape list, and mediates
//! every create / edit / save / delete between them and the store.

use crate::config::MapConfig;
use crate::error::{AnnotatorError, ControllerError};
use crate::event::MapEvent;
use crate::feature::{ShapeFeature, ShapeProperties};
use crate::id_generator::{IdCounter, ShapeId};
use crate::shape::factory::{self, RestoreDefaults};
use crate::shape::{Shape, ShapeKind, ShapeLayer};
use crate::state::{persistence, KeyValueStore, LayerEntry, LayerGroup, LayerStatus, PersistenceResult};
use crate::style::{self, StyleState};
use crate::tools::DrawOptions;

#[derive(Debug, Clone)]
pub struct MapController {
    config: MapConfig,
    style: StyleState,
    draw_options: DrawOptions,
    ids: IdCounter,
    layers: LayerGroup,
    /// The shape list as last saved or loaded, minus list deletions since.
    shapes: Vec<ShapeFeature>,
}

impl MapController {
    /// Restore the counter and the saved shapes from `store`.
    ///
    /// Features that cannot be turned into a layer are logged and left out of
    /// both the map and the list.
    pub fn initialize<S: KeyValueStore + ?Sized>(config: MapConfig, store: &S) -> Self {
        let persisted = persistence::load(store);
        let defaults = RestoreDefaults {
            style: config.initial_style(),
            fill_opacity: config.fill_opacity,
            circle_radius: config.default_circle_radius,
        };

        let mut layers = LayerGroup::new();
        let mut shapes = Vec::with_capacity(persisted.features.len());
        for feature in persisted.features {
            let Some(id) = feature.shape_id else {
                continue;
            };
            match factory::layer_from_feature(&feature, &defaults) {
                Ok(layer) => {
                    layers.insert(
                        id,
                        LayerEntry {
                            layer,
                            feature: feature.clone(),
                            status: LayerStatus::Saved,
                        },
                    );
                    shapes.push(feature);
                }
                Err(e) => log::warn!("Skipping stored shape {}: {}", id, e),
            }
        }

        let style = shapes
            .first()
            .map(|first| restored_style(first, defaults.style))
            .unwrap_or(defaults.style);

        Self {
            draw_options: DrawOptions::from_style(style, config.fill_opacity),
            config,
            style,
            ids: persisted.ids,
            layers,
            shapes,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn style(&self) -> StyleState {
        self.style
    }

    pub fn draw_options(&self) -> &DrawOptions {
        &self.draw_options
    }

    /// Identifier the next created shape will get.
    pub fn next_id(&self) -> ShapeId {
        self.ids.peek()
    }

    pub fn shapes(&self) -> &[ShapeFeature] {
        &self.shapes
    }

    pub fn layers(&self) -> &LayerGroup {
        &self.layers
    }

    pub fn layer(&self, id: ShapeId) -> Option<&ShapeLayer> {
        self.layers.get(id).map(|entry| &entry.layer)
    }

    pub fn layer_mut(&mut self, id: ShapeId) -> Option<&mut ShapeLayer> {
        self.layers.get_mut(id).map(|entry| &mut entry.layer)
    }

    /// The layer in edit or drag mode, if any.
    pub fn editing_layer(&self) -> Option<ShapeId> {
        self.layers.editing()
    }

    /// Number of layers drawn since the last save.
    pub fn pending_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|(_, entry)| entry.status == LayerStatus::Pending)
            .count()
    }

    /// Adopt a layer the draw tool just finished: style it, describe it as a
    /// feature and give it the next identifier. It reaches the store and the
    /// shape list on the next save.
    pub fn on_shape_created(&mut self, mut layer: ShapeLayer, kind: ShapeKind) -> ShapeId {
        layer.set_style(self.draw_options.style_for(kind));
        let id = self.ids.next_id();
        let feature = describe_layer(id, &layer, None);
        log::info!("Created {} shape {}", kind, id);

        self.layers.insert(
            id,
            LayerEntry {
                layer,
                feature,
                status: LayerStatus::Pending,
            },
        );
        id
    }

    /// Remove the layers the delete tool collected and persist what remains.
    pub fn on_shapes_deleted<S: KeyValueStore + ?Sized>(
        &mut self,
        ids: &[ShapeId],
        store: &mut S,
    ) -> PersistenceResult<()> {
        for id in ids {
            if self.layers.remove(*id).is_none() {
                log::warn!("Delete tool named unknown shape {}", id);
            }
        }
        log::info!("Deleted {} shapes from the map", ids.len());
        self.save_shapes(store)
    }

    /// Put the shape at list position `index` into edit mode and every other
    /// layer out of it. Markers only become draggable.
    pub fn edit_shape(&mut self, index: usize) -> Result<ShapeId, ControllerError> {
        let id = self.lookup(index)?;
        if self.layers.get(id).is_none() {
            log::warn!("No layer for shape {} at list index {}", id, index);
            return Err(ControllerError::LayerNotFound(id));
        }

        for (other, entry) in self.layers.iter_mut() {
            if other != id {
                entry.layer.disable_editing();
                entry.layer.disable_dragging();
            }
        }

        let Some(entry) = self.layers.get_mut(id) else {
            return Err(ControllerError::LayerNotFound(id));
        };
        entry.layer.enable_editing();
        entry.layer.enable_dragging();
        log::debug!("Editing shape {} ({})", id, entry.layer.kind());
        Ok(id)
    }

    /// Leave edit mode on every layer.
    pub fn stop_editing(&mut self) {
        for (_, entry) in self.layers.iter_mut() {
            entry.layer.disable_editing();
            entry.layer.disable_dragging();
        }
    }

    /// Serialize every layer with its live style and radius, write the
    /// collection and the counter, then refresh the shape list.
    pub fn save_shapes<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> PersistenceResult<()> {
        let features: Vec<ShapeFeature> = self
            .layers
            .iter()
            .map(|(id, entry)| describe_layer(id, &entry.layer, Some(&entry.feature)))
            .collect();

        persistence::save(store, &features, &self.ids)?;

        for (id, entry) in self.layers.iter_mut() {
            if let Some(feature) = features.iter().find(|f| f.shape_id == Some(id)) {
                entry.feature = feature.clone();
            }
            entry.status = LayerStatus::Saved;
            entry.layer.disable_editing();
            entry.layer.disable_dragging();
        }
        self.shapes = features;
        Ok(())
    }

    /// Remove the shape at list position `index` from the map and the list.
    /// The store is untouched until the next save.
    pub fn delete_shape(&mut self, index: usize) -> Result<ShapeFeature, ControllerError> {
        let id = self.lookup(index)?;
        if self.layers.remove(id).is_none() {
            log::warn!("No layer for shape {} at list index {}", id, index);
            return Err(ControllerError::LayerNotFound(id));
        }
        log::info!("Deleted shape {} (unsaved)", id);
        Ok(self.shapes.remove(index))
    }

    /// New colors for shapes drawn from now on.
    pub fn update_style(&mut self, style: StyleState) {
        self.style = style;
        self.draw_options = DrawOptions::from_style(style, self.config.fill_opacity);
        log::debug!(
            "Draw style is now stroke {} fill {}",
            style::to_hex(style.stroke_color),
            style::to_hex(style.fill_color)
        );
    }

    /// Route one event to its handler.
    pub fn dispatch<S: KeyValueStore + ?Sized>(
        &mut self,
        event: MapEvent,
        store: &mut S,
    ) -> Result<(), AnnotatorError> {
        log::debug!("Dispatching {:?}", event.kind());
        match event {
            MapEvent::ShapeCreated { layer, layer_type } => {
                self.on_shape_created(layer, layer_type);
            }
            MapEvent::ShapesDeleted { ids } => self.on_shapes_deleted(&ids, store)?,
            MapEvent::EditRequested { index } => {
                self.edit_shape(index)?;
            }
            MapEvent::SaveRequested => self.save_shapes(store)?,
            MapEvent::DeleteRequested { index } => {
                self.delete_shape(index)?;
            }
            MapEvent::StyleChanged(style) => self.update_style(style),
            MapEvent::EditingStopped => self.stop_editing(),
        }
        Ok(())
    }

    /// Identifier of the list entry at `index`.
    fn lookup(&self, index: usize) -> Result<ShapeId, ControllerError> {
        let Some(feature) = self.shapes.get(index) else {
            log::warn!("No shape at list index {} (list has {})", index, self.shapes.len());
            return Err(ControllerError::IndexOutOfRange {
                index,
                len: self.shapes.len(),
            });
        };
        // Loaded and saved features always carry an id.
        feature.shape_id.ok_or_else(|| {
            log::warn!("Shape at list index {} has no identifier", index);
            ControllerError::IndexOutOfRange {
                index,
                len: self.shapes.len(),
            }
        })
    }
}

/// The feature describing `layer` as it is now. Properties this tool does not
/// interpret are carried over from `previous`.
fn describe_layer(id: ShapeId, layer: &ShapeLayer, previous: Option<&ShapeFeature>) -> ShapeFeature {
    let kind = layer.kind();
    let style = layer.style();
    let properties = ShapeProperties {
        shape_type: Some(kind.as_str().to_string()),
        stroke_color: Some(style::to_hex(style.stroke_color)),
        fill_color: Some(style::to_hex(style.fill_color)),
        radius: layer.radius(),
        extra: previous.map(|f| f.properties.extra.clone()).unwrap_or_default(),
    };

    let mut feature = ShapeFeature::new(id, layer.geometry(), properties);
    feature.custom_geometry_type = Some(kind.as_str().to_string());
    feature
}

fn restored_style(feature: &ShapeFeature, fallback: StyleState) -> StyleState {
    let color = |value: &Option<String>, default| {
        value
            .as_deref()
            .and_then(|hex| style::parse_hex_color(hex).ok())
            .unwrap_or(default)
    };
    StyleState::new(
        color(&feature.properties.stroke_color, fallback.stroke_color),
        color(&feature.properties.fill_color, fallback.fill_color),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LatLng;
    use crate::shape::{Circle, Marker};
    use crate::state::MemoryStore;

    fn circle() -> ShapeLayer {
        Circle::new(LatLng::new(23.81, 90.41), 150.0, Default::default()).into()
    }

    #[test]
    fn test_created_shape_waits_for_save() {
        let store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        let id = controller.on_shape_created(circle(), ShapeKind::Circle);

        assert_eq!(id, 1);
        assert_eq!(controller.layers().len(), 1);
        assert!(controller.shapes().is_empty());
        assert_eq!(controller.pending_count(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_marker_edit_is_drag_only() {
        let mut store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        let marker = Marker::new(LatLng::new(23.81, 90.41), Default::default());
        let id = controller.on_shape_created(marker.into(), ShapeKind::Marker);
        controller.save_shapes(&mut store).unwrap();

        assert_eq!(controller.edit_shape(0), Ok(id));
        let interaction = controller.layer(id).unwrap().interaction();
        assert!(!interaction.editing);
        assert!(interaction.dragging);
    }

    #[test]
    fn test_edit_without_layer_changes_nothing() {
        let mut store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        let first = controller.on_shape_created(circle(), ShapeKind::Circle);
        let second = controller.on_shape_created(circle(), ShapeKind::Circle);
        controller.save_shapes(&mut store).unwrap();
        controller.edit_shape(0).unwrap();

        controller.layers.remove(second);
        assert_eq!(controller.edit_shape(1), Err(ControllerError::LayerNotFound(second)));
        assert_eq!(controller.editing_layer(), Some(first));
        assert!(controller.layer(first).unwrap().interaction().editing);
    }

    #[test]
    fn test_save_ends_editing() {
        let mut store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        controller.on_shape_created(circle(), ShapeKind::Circle);
        controller.save_shapes(&mut store).unwrap();
        controller.edit_shape(0).unwrap();
        assert!(controller.editing_layer().is_some());

        controller.save_shapes(&mut store).unwrap();
        assert_eq!(controller.editing_layer(), None);
        assert_eq!(controller.pending_count(), 0);
    }

    #[test]
    fn test_dispatch_reports_lookup_miss() {
        let mut store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        let result = controller.dispatch(MapEvent::DeleteRequested { index: 3 }, &mut store);
        assert!(matches!(
            result,
            Err(AnnotatorError::Controller(ControllerError::IndexOutOfRange { index: 3, len: 0 }))
        ));
    }

    #[test]
    fn test_style_restored_from_first_shape() {
        let mut store = MemoryStore::new();
        let mut controller = MapController::initialize(MapConfig::default(), &store);
        let blue = StyleState::new(egui::Color32::from_rgb(0, 0, 255), egui::Color32::from_rgb(0, 255, 0));
        controller.update_style(blue);
        controller.on_shape_created(circle(), ShapeKind::Circle);
        controller.save_shapes(&mut store).unwrap();

        let restored = MapController::initialize(MapConfig::default(), &store);
        assert_eq!(restored.style(), blue);
    }
}
