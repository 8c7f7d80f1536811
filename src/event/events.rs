use crate::id_generator::ShapeId;
use crate::shape::{ShapeKind, ShapeLayer};
use crate::style::StyleState;

/// Discriminant of [`MapEvent`], for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ShapeCreated,
    ShapesDeleted,
    EditRequested,
    SaveRequested,
    DeleteRequested,
    StyleChanged,
    EditingStopped,
}

/// Everything the map controller reacts to, whether it comes from the drawing
/// tools on the map or from the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The draw tool finished a shape.
    ShapeCreated {
        layer: ShapeLayer,
        layer_type: ShapeKind,
    },
    /// The delete tool removed shapes in bulk.
    ShapesDeleted {
        ids: Vec<ShapeId>,
    },
    EditRequested {
        index: usize,
    },
    SaveRequested,
    DeleteRequested {
        index: usize,
    },
    StyleChanged(StyleState),
    EditingStopped,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ShapeCreated { .. } => MapEventKind::ShapeCreated,
            MapEvent::ShapesDeleted { .. } => MapEventKind::ShapesDeleted,
            MapEvent::EditRequested { .. } => MapEventKind::EditRequested,
            MapEvent::SaveRequested => MapEventKind::SaveRequested,
            MapEvent::DeleteRequested { .. } => MapEventKind::DeleteRequested,
            MapEvent::StyleChanged(_) => MapEventKind::StyleChanged,
            MapEvent::EditingStopped => MapEventKind::EditingStopped,
        }
    }
}
