use serde::{Deserialize, Serialize};

use crate::map::LatLng;
use crate::state::KeyValueStore;
use crate::style::{self, StyleState};

/// Environment variable naming a JSON config file (native builds only).
pub const CONFIG_ENV_VAR: &str = "MAP_ANNOTATOR_CONFIG";

/// Startup settings for the map and the drawing defaults.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view center as `[lat, lng]`.
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub stroke_color: String,
    pub fill_color: String,
    pub fill_opacity: f32,
    /// Radius in meters given to point features that carry none.
    pub default_circle_radius: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [23.8103, 90.4125],
            zoom: 13,
            min_zoom: 1,
            max_zoom: 19,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            stroke_color: style::to_hex(style::DEFAULT_STROKE_COLOR),
            fill_color: style::to_hex(style::DEFAULT_FILL_COLOR),
            fill_opacity: style::DEFAULT_FILL_OPACITY,
            default_circle_radius: 100.0,
        }
    }
}

impl MapConfig {
    /// Store key holding an optional JSON config.
    pub const STORAGE_KEY: &'static str = "MapConfig";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve the config: the file named by [`CONFIG_ENV_VAR`] wins, then the
    /// store entry, then defaults. Unreadable sources are logged and skipped.
    pub fn load<S: KeyValueStore + ?Sized>(store: Option<&S>) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            match std::fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded map config from {}", path);
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring malformed config file {}: {}", path, e),
                },
                Err(e) => log::warn!("Could not read config file {}: {}", path, e),
            }
        }

        if let Some(json) = store.and_then(|s| s.get_string(Self::STORAGE_KEY)) {
            match Self::from_json(&json) {
                Ok(config) => return config,
                Err(e) => log::warn!("Ignoring malformed stored config: {}", e),
            }
        }

        Self::default()
    }

    pub fn initial_center(&self) -> LatLng {
        LatLng::new(self.center[0], self.center[1])
    }

    /// Colors the style panel starts with; bad hex strings fall back to defaults.
    pub fn initial_style(&self) -> StyleState {
        let defaults = StyleState::default();
        let stroke_color = style::parse_hex_color(&self.stroke_color).unwrap_or_else(|e| {
            log::warn!("{}; using default stroke color", e);
            defaults.stroke_color
        });
        let fill_color = style::parse_hex_color(&self.fill_color).unwrap_or_else(|e| {
            log::warn!("{}; using default fill color", e);
            defaults.fill_color
        });
        StyleState::new(stroke_color, fill_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MapConfig::from_json(r##"{ "zoom": 10, "fill_color": "#00ff00" }"##).unwrap();
        assert_eq!(config.zoom, 10);
        assert_eq!(config.max_zoom, 19);
        assert_eq!(config.initial_style().fill_color, egui::Color32::from_rgb(0, 255, 0));
    }

    #[test]
    fn test_load_from_store() {
        let mut store = MemoryStore::default();
        store.set_string(MapConfig::STORAGE_KEY, r#"{ "default_circle_radius": 250.0 }"#.to_string());
        let config = MapConfig::load(Some(&store));
        assert_eq!(config.default_circle_radius, 250.0);
    }

    #[test]
    fn test_malformed_store_entry_falls_back() {
        let mut store = MemoryStore::default();
        store.set_string(MapConfig::STORAGE_KEY, "{ not json".to_string());
        assert_eq!(MapConfig::load(Some(&store)), MapConfig::default());
    }

    #[test]
    fn test_bad_color_falls_back() {
        let config = MapConfig {
            stroke_color: "red".to_string(),
            ..MapConfig::default()
        };
        assert_eq!(config.initial_style(), StyleState::default());
    }
}
