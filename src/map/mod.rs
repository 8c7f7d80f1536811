mod coords;
pub mod projection;
mod tiles;
mod view;

pub use coords::{format_num, LatLng, LatLngBounds, EARTH_RADIUS_M, GEOJSON_PRECISION};
pub use tiles::{TileId, TileLayer};
pub use view::{MapView, ViewState};
