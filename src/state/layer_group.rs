use std::collections::BTreeMap;

use egui::Pos2;

use crate::feature::ShapeFeature;
use crate::id_generator::ShapeId;
use crate::map::MapView;
use crate::shape::{Shape, ShapeLayer};

/// Where a layer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStatus {
    /// Drawn this session, not written to the store yet.
    Pending,
    Saved,
}

/// A live layer plus the feature data it was created or restored from.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    pub layer: ShapeLayer,
    pub feature: ShapeFeature,
    pub status: LayerStatus,
}

impl LayerEntry {
    pub fn is_editing(&self) -> bool {
        self.layer.interaction().is_active()
    }
}

/// The layers on the map, keyed by shape identifier.
///
/// Identifiers only grow, so iteration order is creation order.
#[derive(Debug, Clone, Default)]
pub struct LayerGroup {
    entries: BTreeMap<ShapeId, LayerEntry>,
}

impl LayerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a layer; an existing layer with the same id is replaced and returned.
    pub fn insert(&mut self, id: ShapeId, entry: LayerEntry) -> Option<LayerEntry> {
        self.entries.insert(id, entry)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<LayerEntry> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&LayerEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut LayerEntry> {
        self.entries.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &LayerEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ShapeId, &mut LayerEntry)> {
        self.entries.iter_mut().map(|(id, entry)| (*id, entry))
    }

    /// Topmost layer under a screen position. Later layers paint on top.
    pub fn hit_test(&self, pos: Pos2, view: &MapView) -> Option<ShapeId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, entry)| entry.layer.hit_test(pos, view))
            .map(|(id, _)| *id)
    }

    /// The layer currently in edit or drag mode, if any.
    pub fn editing(&self) -> Option<ShapeId> {
        self.iter().find(|(_, entry)| entry.is_editing()).map(|(id, _)| id)
    }
}
