use geo_types::{Coord, Rect};

/// Drop the closing vertex of a ring if it repeats the first one
pub fn open_ring(ring: &[Coord<f64>]) -> &[Coord<f64>] {
    match ring {
        [first, .., last] if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Detect a ring that traces an axis-aligned rectangle.
///
/// The ring must have exactly four distinct corners (five points when closed),
/// every edge must be horizontal or vertical with non-zero length, and edge
/// orientation must alternate so each corner is a right angle.
pub fn as_axis_aligned_rectangle(ring: &[Coord<f64>], tolerance: f64) -> Option<Rect<f64>> {
    let corners = open_ring(ring);
    if corners.len() != 4 {
        return None;
    }

    let mut horizontal = Vec::with_capacity(4);
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();
        match (dx <= tolerance, dy <= tolerance) {
            (false, true) => horizontal.push(true),
            (true, false) => horizontal.push(false),
            _ => return None,
        }
    }

    if horizontal.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }

    Some(Rect::new(corners[0], corners[2]))
}
