use std::collections::HashSet;

use thiserror::Error;

use super::KeyValueStore;
use crate::feature::{self, ShapeFeature};
use crate::id_generator::IdCounter;

/// Store key of the next identifier to assign.
pub const ID_KEY: &str = "Id";
/// Store key of the saved shape collection.
pub const SHAPES_KEY: &str = "DrawnShapes";

/// Errors that can occur during shape persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to (de)serialize shapes: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid stored data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Everything the controller restores on startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedShapes {
    pub ids: IdCounter,
    pub features: Vec<ShapeFeature>,
}

impl PersistedShapes {
    /// Enforce identifier invariants on freshly loaded data: the counter ends
    /// up above every stored id, and features without a usable id (missing or
    /// duplicated) get a fresh one.
    pub fn reconcile_ids(&mut self) {
        for id in self.features.iter().filter_map(|f| f.shape_id) {
            self.ids.ensure_above(id);
        }

        let mut seen = HashSet::new();
        for feature in &mut self.features {
            let usable = feature.shape_id.is_some_and(|id| seen.insert(id));
            if !usable {
                let id = self.ids.next_id();
                log::debug!("Assigning id {} to stored feature with id {:?}", id, feature.shape_id);
                feature.shape_id = Some(id);
                seen.insert(id);
            }
        }
    }
}

/// Load shapes and the identifier counter from `store`.
///
/// Missing keys mean a fresh start. Malformed values are logged and replaced by
/// an empty collection or a counter of 1, so startup always succeeds.
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> PersistedShapes {
    let ids = match store.get_string(ID_KEY) {
        Some(raw) => IdCounter::parse(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring malformed identifier counter {:?}", raw);
            IdCounter::default()
        }),
        None => IdCounter::default(),
    };

    let features = match store.get_string(SHAPES_KEY) {
        Some(json) => feature::decode_collection(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed stored shapes: {}", e);
            Vec::new()
        }),
        None => Vec::new(),
    };

    let mut persisted = PersistedShapes { ids, features };
    persisted.reconcile_ids();
    log::info!(
        "Loaded {} shapes, next id {}",
        persisted.features.len(),
        persisted.ids.peek()
    );
    persisted
}

/// Overwrite the stored collection and counter.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    features: &[ShapeFeature],
    ids: &IdCounter,
) -> PersistenceResult<()> {
    let json = feature::encode_collection(features)?;
    store.set_string(SHAPES_KEY, json);
    store.set_string(ID_KEY, ids.encode());
    store.flush();
    log::info!("Saved {} shapes", features.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::ShapeProperties;
    use crate::state::MemoryStore;

    fn point_feature(id: Option<u64>) -> ShapeFeature {
        ShapeFeature {
            shape_id: id,
            geometry: geojson::Geometry::new(geojson::Value::Point(vec![90.41, 23.81])),
            properties: ShapeProperties::default(),
            custom_geometry_type: None,
        }
    }

    #[test]
    fn test_empty_store_starts_fresh() {
        let persisted = load(&MemoryStore::new());
        assert_eq!(persisted, PersistedShapes::default());
        assert_eq!(persisted.ids.peek(), 1);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set_string(ID_KEY, "NaN".to_string());
        store.set_string(SHAPES_KEY, "{ this is not json".to_string());

        let persisted = load(&store);
        assert!(persisted.features.is_empty());
        assert_eq!(persisted.ids.peek(), 1);
    }

    #[test]
    fn test_reconcile_fixes_missing_and_duplicate_ids() {
        let mut persisted = PersistedShapes {
            ids: IdCounter::starting_at(2),
            features: vec![point_feature(Some(5)), point_feature(None), point_feature(Some(5))],
        };
        persisted.reconcile_ids();

        let ids: Vec<_> = persisted.features.iter().map(|f| f.shape_id.unwrap()).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert_eq!(persisted.ids.peek(), 8);
    }

    #[test]
    fn test_save_writes_both_keys() {
        let mut store = MemoryStore::new();
        let ids = IdCounter::starting_at(4);
        save(&mut store, &[point_feature(Some(3))], &ids).unwrap();

        assert_eq!(store.get_string(ID_KEY).as_deref(), Some("4"));
        let reloaded = load(&store);
        assert_eq!(reloaded.features.len(), 1);
        assert_eq!(reloaded.features[0].shape_id, Some(3));
        assert_eq!(reloaded.ids.peek(), 4);
    }
}
