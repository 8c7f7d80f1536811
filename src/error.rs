use thiserror::Error;

use crate::id_generator::ShapeId;
use crate::state::PersistenceError;

/// Errors raised while turning GeoJSON features into shapes and back
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid position: {0:?}")]
    InvalidPosition(Vec<f64>),

    #[error("Geometry needs at least {expected} positions, got {actual}")]
    TooFewPositions { expected: usize, actual: usize },

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
}

/// Errors from list-driven controller operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("No shape at list index {index} (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Layer not found for shape {0}")]
    LayerNotFound(ShapeId),
}

/// Anything a dispatched event can fail with
#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
