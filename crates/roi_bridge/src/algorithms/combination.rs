use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Point};

use crate::region::AreaRegion;

/// Reduce parts pairwise with symmetric difference, in the given order.
///
/// Rings exported from one holed region come back as independent parts;
/// XOR-ing them restores the holes. The result depends on part order when
/// parts overlap in more complex ways.
pub fn xor_reduce<I>(parts: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = MultiPolygon<f64>>,
{
    use geo::BooleanOps;

    let mut parts = parts.into_iter();
    let Some(first) = parts.next() else {
        return MultiPolygon::new(vec![]);
    };
    parts.fold(first, |acc, part| acc.xor(&part))
}

/// Union of an area with lines and points.
///
/// Points covered by the area (interior or boundary) are absorbed, the rest
/// stay as loose points. Lines crossing the area keep only their pieces
/// outside it; lines clear of it are kept as they are.
pub fn union_points(
    polygons: MultiPolygon<f64>,
    lines: Vec<LineString<f64>>,
    points: &[Coord<f64>],
) -> AreaRegion {
    use geo::{BooleanOps, Intersects};

    let mut kept = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|line| line.0.len() >= 2) {
        if polygons.intersects(&line) {
            let outside = polygons.clip(&MultiLineString::new(vec![line]), true);
            kept.extend(outside.0.into_iter().filter(|piece| piece.0.len() >= 2));
        } else {
            kept.push(line);
        }
    }

    let loose = points
        .iter()
        .filter(|&&c| !polygons.intersects(&Point::from(c)))
        .copied()
        .collect();
    AreaRegion {
        polygons,
        lines: MultiLineString::new(kept),
        points: loose,
    }
}
