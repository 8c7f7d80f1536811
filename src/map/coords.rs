use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Mean earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Number of decimals kept when coordinates are written out as GeoJSON.
pub const GEOJSON_PRECISION: i32 = 6;

/// Round a coordinate to [`GEOJSON_PRECISION`] decimals.
pub fn format_num(value: f64) -> f64 {
    let factor = 10f64.powi(GEOJSON_PRECISION);
    (value * factor).round() / factor
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Read a GeoJSON position, which is ordered `[lng, lat, ...]`.
    pub fn from_position(position: &[f64]) -> Result<Self, FeatureError> {
        match position {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Ok(Self::new(*lat, *lng)),
            _ => Err(FeatureError::InvalidPosition(position.to_vec())),
        }
    }

    /// Write this position as a rounded GeoJSON `[lng, lat]` pair.
    pub fn to_position(self) -> Vec<f64> {
        vec![format_num(self.lng), format_num(self.lat)]
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_to(self, other: LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// The point `meters` due east of this one on the same parallel.
    pub fn east_by(self, meters: f64) -> Self {
        let cos_lat = self.lat.to_radians().cos().max(1e-12);
        let d_lng = (meters / (EARTH_RADIUS_M * cos_lat)).to_degrees();
        self.offset(0.0, d_lng)
    }
}

/// An axis-aligned box in latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Bounds spanning two arbitrary opposite corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Smallest bounds containing every point, `None` when there are no points.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_corners(first, first), |bounds, p| bounds.extend(p)))
    }

    pub fn extend(self, point: LatLng) -> Self {
        Self {
            south_west: LatLng::new(self.south_west.lat.min(point.lat), self.south_west.lng.min(point.lng)),
            north_east: LatLng::new(self.north_east.lat.max(point.lat), self.north_east.lng.max(point.lng)),
        }
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Corners in ring order: south-west, north-west, north-east, south-east.
    pub fn corners(&self) -> [LatLng; 4] {
        [self.south_west, self.north_west(), self.north_east, self.south_east()]
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// True when the box has zero width or height.
    pub fn is_degenerate(&self) -> bool {
        self.south_west.lat == self.north_east.lat || self.south_west.lng == self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_lng_lat() {
        let p = LatLng::from_position(&[90.41, 23.81]).unwrap();
        assert_eq!(p, LatLng::new(23.81, 90.41));
        assert_eq!(p.to_position(), vec![90.41, 23.81]);
    }

    #[test]
    fn test_invalid_position() {
        assert!(LatLng::from_position(&[1.0]).is_err());
        assert!(LatLng::from_position(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_distance_and_east_offset_agree() {
        let center = LatLng::new(23.81, 90.41);
        let east = center.east_by(150.0);
        assert!((center.distance_to(east) - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_bounds_normalize_corners() {
        let bounds = LatLngBounds::from_corners(LatLng::new(2.0, 5.0), LatLng::new(1.0, 6.0));
        assert_eq!(bounds.south_west, LatLng::new(1.0, 5.0));
        assert_eq!(bounds.north_east, LatLng::new(2.0, 6.0));
        assert_eq!(bounds.corners()[1], LatLng::new(2.0, 5.0));
    }
}
