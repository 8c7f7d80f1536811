use egui::{Color32, Pos2, Rect, Ui, Vec2};

use super::projection::TILE_SIZE;
use super::view::MapView;
use crate::config::MapConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// A raster tile source addressed by a `{s}/{z}/{x}/{y}` URL template.
#[derive(Debug, Clone)]
pub struct TileLayer {
    url_template: String,
    subdomains: Vec<String>,
    attribution: String,
}

impl TileLayer {
    pub fn new(url_template: impl Into<String>, subdomains: Vec<String>, attribution: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains,
            attribution: attribution.into(),
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(
            config.tile_url.clone(),
            config.subdomains.clone(),
            config.attribution.clone(),
        )
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn tile_url(&self, tile: TileId) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (u64::from(tile.x) + u64::from(tile.y)) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Tiles covering the viewport with the screen rectangle each one fills.
    ///
    /// Columns wrap around the antimeridian; rows outside the world are skipped.
    pub fn visible_tiles(&self, view: &MapView) -> Vec<(TileId, Rect)> {
        let viewport = view.viewport();
        let center = view.center_world();
        let z = view.zoom();
        let tiles_per_axis = 1i64 << z;

        let left = center.x - f64::from(viewport.width()) / 2.0;
        let top = center.y - f64::from(viewport.height()) / 2.0;
        let right = left + f64::from(viewport.width());
        let bottom = top + f64::from(viewport.height());

        let x_range = (left / TILE_SIZE).floor() as i64..=(right / TILE_SIZE).floor() as i64;
        let y_range = (top / TILE_SIZE).floor() as i64..=(bottom / TILE_SIZE).floor() as i64;

        let mut tiles = Vec::new();
        for y in y_range {
            if y < 0 || y >= tiles_per_axis {
                continue;
            }
            for x in x_range.clone() {
                let min = Pos2::new(
                    viewport.center().x + (x as f64 * TILE_SIZE - center.x) as f32,
                    viewport.center().y + (y as f64 * TILE_SIZE - center.y) as f32,
                );
                let rect = Rect::from_min_size(min, Vec2::splat(TILE_SIZE as f32));
                let tile = TileId {
                    x: x.rem_euclid(tiles_per_axis) as u32,
                    y: y as u32,
                    z,
                };
                tiles.push((tile, rect));
            }
        }
        tiles
    }

    /// Paint the tile background; tiles that fail to load stay blank.
    pub fn paint(&self, ui: &Ui, view: &MapView) {
        let painter = ui.painter_at(view.viewport());
        painter.rect_filled(view.viewport(), 0.0, Color32::from_gray(221));

        for (tile, rect) in self.visible_tiles(view) {
            egui::Image::new(self.tile_url(tile)).paint_at(ui, rect);
        }

        let galley_pos = view.viewport().right_bottom() - Vec2::new(4.0, 2.0);
        painter.text(
            galley_pos,
            egui::Align2::RIGHT_BOTTOM,
            &self.attribution,
            egui::FontId::proportional(11.0),
            Color32::from_gray(60),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LatLng;

    fn osm() -> TileLayer {
        TileLayer::new(
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            vec!["a".into(), "b".into(), "c".into()],
            "© OpenStreetMap contributors",
        )
    }

    #[test]
    fn test_tile_url_template() {
        let url = osm().tile_url(TileId { x: 6101, y: 3555, z: 13 });
        // (6101 + 3555) % 3 == 2
        assert_eq!(url, "https://c.tile.openstreetmap.org/13/6101/3555.png");
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let mut view = MapView::new(LatLng::new(23.8103, 90.4125), 13);
        view.set_viewport(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));

        let tiles = osm().visible_tiles(&view);
        assert!(!tiles.is_empty());
        let covered = tiles.iter().fold(Rect::NOTHING, |acc, (_, r)| acc.union(*r));
        assert!(covered.contains_rect(view.viewport()));
        assert!(tiles.iter().all(|(t, _)| t.z == 13));
    }

    #[test]
    fn test_tiles_wrap_and_clip_at_low_zoom() {
        let mut view = MapView::new(LatLng::new(0.0, 179.0), 1);
        view.set_viewport(Rect::from_min_size(Pos2::ZERO, Vec2::new(1024.0, 1024.0)));

        let tiles = osm().visible_tiles(&view);
        assert!(tiles.iter().all(|(t, _)| t.x < 2 && t.y < 2));
        assert!(tiles.iter().any(|(t, _)| t.x == 0));
    }
}
