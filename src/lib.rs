#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod feature;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod map;
pub mod panels;
pub mod shape;
pub mod state;
pub mod style;
pub mod tools;
pub mod widgets;

pub use app::MapAnnotatorApp;
pub use config::MapConfig;
pub use controller::MapController;
pub use error::{AnnotatorError, ControllerError, FeatureError};
pub use event::{EventBus, MapEvent};
pub use feature::{ShapeFeature, ShapeProperties};
pub use id_generator::{IdCounter, ShapeId};
pub use shape::{Shape, ShapeKind, ShapeLayer};
pub use state::{KeyValueStore, MemoryStore};
pub use style::{ShapeStyle, StyleState};
pub use tools::{DrawOptions, MapTool, ToolType};
