pub mod hit_testing;
mod triangulate;

pub use hit_testing::{distance_to_polyline, pick_handle, point_in_polygon, HANDLE_RADIUS, HIT_TOLERANCE};
pub use triangulate::triangulate;
