use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use tracing::debug;

/// Merge overlapping parts of a multi-polygon into maximal connected pieces.
///
/// Each resulting polygon is simple apart from its holes, so its rings can be
/// written out independently and recombined later with XOR.
pub fn connected_parts(polygons: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    use geo::BooleanOps;

    let mut parts = polygons.iter().filter(|p| !p.exterior().0.is_empty());
    let Some(first) = parts.next() else {
        return MultiPolygon::new(vec![]);
    };
    if polygons.0.len() == 1 {
        return polygons.clone();
    }

    let merged = parts.fold(MultiPolygon::new(vec![first.clone()]), |acc, part| {
        acc.union(&MultiPolygon::new(vec![part.clone()]))
    });
    debug!(
        "Merged {} polygon parts into {} connected pieces",
        polygons.0.len(),
        merged.0.len()
    );
    merged
}

/// Split a multi-polygon into its rings: for every connected piece the
/// exterior comes first, followed by each hole. Rings are returned open
/// (without the repeated closing vertex); empty rings are skipped.
pub fn split_rings(polygons: &MultiPolygon<f64>) -> Vec<Vec<Coord<f64>>> {
    connected_parts(polygons)
        .iter()
        .flat_map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors().iter())
                .map(ring_vertices)
                .collect::<Vec<_>>()
        })
        .filter(|ring| !ring.is_empty())
        .collect()
}

fn ring_vertices(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    super::open_ring(&ring.0).to_vec()
}

/// Polygon approximation of the ellipse inscribed in a bounding box
pub fn ellipse_polygon(x: f64, y: f64, width: f64, height: f64, segments: usize) -> Polygon<f64> {
    let segments = segments.max(4);
    let (rx, ry) = (width / 2.0, height / 2.0);
    let (cx, cy) = (x + rx, y + ry);
    let coords = (0..segments)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / segments as f64;
            Coord {
                x: cx + rx * theta.cos(),
                y: cy + ry * theta.sin(),
            }
        })
        .collect::<Vec<_>>();
    Polygon::new(LineString::new(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::{polygon, Rect};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Rect::new(Coord { x, y }, Coord { x: x + size, y: y + size }).to_polygon()
    }

    #[test]
    fn test_split_donut_into_two_rings() {
        let donut = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 3.0, y: 3.0), (x: 7.0, y: 3.0), (x: 7.0, y: 7.0), (x: 3.0, y: 7.0)]]
        );
        let rings = split_rings(&MultiPolygon::new(vec![donut]));
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[1].len(), 4);
    }

    #[test]
    fn test_disjoint_parts_stay_separate() {
        let parts = MultiPolygon::new(vec![square(0.0, 0.0, 2.0), square(10.0, 10.0, 2.0)]);
        let merged = connected_parts(&parts);
        assert_eq!(merged.0.len(), 2);
        assert_eq!(split_rings(&parts).len(), 2);
    }

    #[test]
    fn test_overlapping_parts_merge() {
        let parts = MultiPolygon::new(vec![square(0.0, 0.0, 4.0), square(2.0, 2.0, 4.0)]);
        let merged = connected_parts(&parts);
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_rings(&MultiPolygon::new(vec![])).is_empty());
    }

    #[test]
    fn test_ellipse_polygon_area_converges() {
        let ellipse = ellipse_polygon(0.0, 0.0, 20.0, 10.0, 360);
        let exact = std::f64::consts::PI * 10.0 * 5.0;
        assert!((ellipse.unsigned_area() - exact).abs() / exact < 1e-3);
    }
}
