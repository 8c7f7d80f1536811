mod layer_group;
pub mod persistence;
mod storage;

pub use layer_group::{LayerEntry, LayerGroup, LayerStatus};
pub use persistence::{PersistedShapes, PersistenceError, PersistenceResult, ID_KEY, SHAPES_KEY};
pub use storage::{KeyValueStore, MemoryStore};
