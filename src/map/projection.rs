//! Spherical (Web) Mercator, the projection used by slippy-map tile servers.

use std::f64::consts::PI;

use super::coords::LatLng;

pub const TILE_SIZE: f64 = 256.0;

/// Latitudes beyond this are clipped so the world is square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Radius of the spherical mercator datum, in meters.
const DATUM_RADIUS_M: f64 = 6_378_137.0;

/// A position in world pixels at a given zoom; origin is the north-west corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

/// Edge length of the whole world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(30))
}

pub fn project(position: LatLng, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (position.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    WorldPoint { x, y }
}

pub fn unproject(point: WorldPoint, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = point.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Ground resolution at a latitude, used to turn circle radii into pixels.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    2.0 * PI * DATUM_RADIUS_M * lat.to_radians().cos() / world_size(zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_world_center() {
        let p = project(LatLng::new(0.0, 0.0), 1);
        assert!((p.x - 256.0).abs() < 1e-9);
        assert!((p.y - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_unproject() {
        let dhaka = LatLng::new(23.8103, 90.4125);
        let back = unproject(project(dhaka, 13), 13);
        assert!((back.lat - dhaka.lat).abs() < 1e-9);
        assert!((back.lng - dhaka.lng).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_halves_per_zoom() {
        let z12 = meters_per_pixel(23.81, 12);
        let z13 = meters_per_pixel(23.81, 13);
        assert!((z12 / z13 - 2.0).abs() < 1e-9);
    }
}
