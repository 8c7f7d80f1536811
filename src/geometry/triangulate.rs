use egui::Pos2;

/// Ear-clipping triangulation of a simple polygon given as an open ring.
///
/// Returns index triples into `ring`. Self-intersecting input yields a partial
/// result rather than looping forever.
pub fn triangulate(ring: &[Pos2]) -> Vec<[u32; 3]> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..n).collect();
    if signed_area(ring) < 0.0 {
        indices.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut guard = 0;
    while indices.len() > 3 && guard < n * n {
        guard += 1;
        let len = indices.len();
        let ear = (0..len).find(|&i| {
            let prev = indices[(i + len - 1) % len];
            let curr = indices[i];
            let next = indices[(i + 1) % len];
            is_ear(ring, &indices, prev, curr, next)
        });

        match ear {
            Some(i) => {
                let prev = indices[(i + len - 1) % len];
                let next = indices[(i + 1) % len];
                triangles.push([prev as u32, indices[i] as u32, next as u32]);
                indices.remove(i);
            }
            None => break,
        }
    }

    if indices.len() == 3 {
        triangles.push([indices[0] as u32, indices[1] as u32, indices[2] as u32]);
    }
    triangles
}

/// Shoelace area; positive when the ring winds counter-clockwise in y-up terms.
fn signed_area(ring: &[Pos2]) -> f32 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area / 2.0
}

fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn is_ear(ring: &[Pos2], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (ring[prev], ring[curr], ring[next]);
    if cross(a, b, c) <= 0.0 {
        return false;
    }

    remaining
        .iter()
        .filter(|&&i| i != prev && i != curr && i != next)
        .all(|&i| !in_triangle(ring[i], a, b, c))
}

fn in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}
