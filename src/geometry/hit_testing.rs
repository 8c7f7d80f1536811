use egui::Pos2;

/// Extra slack in pixels around strokes when picking shapes.
pub const HIT_TOLERANCE: f32 = 4.0;

/// Pick radius around edit handles, in pixels.
pub const HANDLE_RADIUS: f32 = 8.0;

pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let len_sq = segment.length_sq();
    if len_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Distance to an open polyline; infinite when there are no points.
pub fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Even-odd point-in-polygon test; the ring may be open or closed.
pub fn point_in_polygon(point: Pos2, ring: &[Pos2]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Index of the first handle within [`HANDLE_RADIUS`] of `point`.
pub fn pick_handle(point: Pos2, handles: &[Pos2]) -> Option<usize> {
    handles.iter().position(|h| h.distance(point) <= HANDLE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_segment_distance() {
        let d = distance_to_segment(pos2(5.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-6);
        let beyond = distance_to_segment(pos2(13.0, 4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((beyond - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape opening upwards
        let ring = [
            pos2(0.0, 0.0),
            pos2(3.0, 0.0),
            pos2(3.0, 3.0),
            pos2(2.0, 3.0),
            pos2(2.0, 1.0),
            pos2(1.0, 1.0),
            pos2(1.0, 3.0),
            pos2(0.0, 3.0),
        ];
        assert!(point_in_polygon(pos2(0.5, 2.0), &ring));
        assert!(!point_in_polygon(pos2(1.5, 2.0), &ring));
        assert!(!point_in_polygon(pos2(5.0, 1.0), &ring));
    }

    #[test]
    fn test_pick_handle() {
        let handles = [pos2(0.0, 0.0), pos2(20.0, 0.0)];
        assert_eq!(pick_handle(pos2(19.0, 2.0), &handles), Some(1));
        assert_eq!(pick_handle(pos2(10.0, 0.0), &handles), None);
    }
}
