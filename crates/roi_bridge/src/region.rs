use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use ts_rs::TS;

use crate::algorithms::ellipse_polygon;

/// Placement of a region inside a (c, z, t) image stack.
///
/// A negative index means "every plane along that axis"; downstream code only
/// ever honors the first plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, TS)]
pub struct ImagePlane {
    /// Channel index, -1 for all channels
    pub c: i32,
    /// Z-slice index
    pub z: i32,
    /// Time-frame index
    pub t: i32,
}

impl ImagePlane {
    pub fn new(c: i32, z: i32, t: i32) -> Self {
        Self { c, z, t }
    }

    /// Component-wise minimum of two planes
    pub fn min(self, other: ImagePlane) -> ImagePlane {
        ImagePlane {
            c: self.c.min(other.c),
            z: self.z.min(other.z),
            t: self.t.min(other.t),
        }
    }
}

impl Default for ImagePlane {
    fn default() -> Self {
        Self { c: -1, z: 0, t: 0 }
    }
}

/// Arbitrary (possibly multi-part, possibly holed) region, plus the lines and
/// loose points that were unioned into it and are not covered by any polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRegion {
    pub polygons: MultiPolygon<f64>,
    pub lines: MultiLineString<f64>,
    pub points: Vec<Coord<f64>>,
}

impl Default for AreaRegion {
    fn default() -> Self {
        Self {
            polygons: MultiPolygon::new(vec![]),
            lines: MultiLineString::new(vec![]),
            points: Vec::new(),
        }
    }
}

impl AreaRegion {
    pub fn from_polygons(polygons: MultiPolygon<f64>) -> Self {
        Self {
            polygons,
            ..Self::default()
        }
    }

    /// Total number of interior rings across all parts
    pub fn hole_count(&self) -> usize {
        self.polygons.iter().map(|p| p.interiors().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.0.is_empty() && self.lines.0.is_empty() && self.points.is_empty()
    }
}

/// The geometric part of a [`Region`].
///
/// Rectangles and ellipses are stored by their bounding box.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RegionShape {
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { x: f64, y: f64, width: f64, height: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline(Vec<Coord<f64>>),
    Polygon(Vec<Coord<f64>>),
    Points(Vec<Coord<f64>>),
    Area(AreaRegion),
}

/// A 2D region of interest placed on one image plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub shape: RegionShape,
    pub plane: ImagePlane,
}

impl Region {
    pub fn new(shape: RegionShape, plane: ImagePlane) -> Self {
        Self { shape, plane }
    }

    pub fn rectangle(x: f64, y: f64, width: f64, height: f64, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Rectangle { x, y, width, height }, plane)
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Ellipse { x, y, width, height }, plane)
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Line { x1, y1, x2, y2 }, plane)
    }

    pub fn polyline(points: Vec<Coord<f64>>, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Polyline(points), plane)
    }

    pub fn polygon(points: Vec<Coord<f64>>, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Polygon(points), plane)
    }

    pub fn points(points: Vec<Coord<f64>>, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Points(points), plane)
    }

    pub fn area(area: AreaRegion, plane: ImagePlane) -> Self {
        Self::new(RegionShape::Area(area), plane)
    }

    /// Short name of the shape kind, used in log messages
    pub fn kind_name(&self) -> &'static str {
        (&self.shape).into()
    }

    pub fn is_points(&self) -> bool {
        matches!(self.shape, RegionShape::Points(_))
    }

    /// Enclosed area in square pixels.
    ///
    /// Ellipses use the analytic formula rather than their polygon approximation.
    pub fn area_size(&self) -> f64 {
        use geo::Area;

        match &self.shape {
            RegionShape::Rectangle { width, height, .. } => (width * height).abs(),
            RegionShape::Ellipse { width, height, .. } => {
                (std::f64::consts::PI * width * height / 4.0).abs()
            }
            RegionShape::Polygon(points) => {
                Polygon::new(LineString::new(points.clone()), vec![]).unsigned_area()
            }
            RegionShape::Area(area) => area.polygons.unsigned_area(),
            RegionShape::Line { .. } | RegionShape::Polyline(_) | RegionShape::Points(_) => 0.0,
        }
    }

    /// Polygonal form of an area-bearing region; `None` for lines and points.
    pub fn to_multi_polygon(&self, ellipse_segments: usize) -> Option<MultiPolygon<f64>> {
        match &self.shape {
            RegionShape::Rectangle { x, y, width, height } => {
                let rect = Rect::new(
                    Coord { x: *x, y: *y },
                    Coord { x: x + width, y: y + height },
                );
                Some(MultiPolygon::new(vec![rect.to_polygon()]))
            }
            RegionShape::Ellipse { x, y, width, height } => Some(MultiPolygon::new(vec![
                ellipse_polygon(*x, *y, *width, *height, ellipse_segments),
            ])),
            RegionShape::Polygon(points) => Some(MultiPolygon::new(vec![Polygon::new(
                LineString::new(points.clone()),
                vec![],
            )])),
            RegionShape::Area(area) => Some(area.polygons.clone()),
            RegionShape::Line { .. } | RegionShape::Polyline(_) | RegionShape::Points(_) => None,
        }
    }

    /// Open path of a line or polyline; `None` for every other shape.
    pub fn to_line_string(&self) -> Option<LineString<f64>> {
        match &self.shape {
            RegionShape::Line { x1, y1, x2, y2 } => Some(LineString::new(vec![
                Coord { x: *x1, y: *y1 },
                Coord { x: *x2, y: *y2 },
            ])),
            RegionShape::Polyline(points) => Some(LineString::new(points.clone())),
            _ => None,
        }
    }

    /// Every vertex of the region, in no particular order
    pub fn vertices(&self) -> Vec<Coord<f64>> {
        match &self.shape {
            RegionShape::Rectangle { x, y, width, height }
            | RegionShape::Ellipse { x, y, width, height } => vec![
                Coord { x: *x, y: *y },
                Coord { x: x + width, y: y + height },
            ],
            RegionShape::Line { x1, y1, x2, y2 } => {
                vec![Coord { x: *x1, y: *y1 }, Coord { x: *x2, y: *y2 }]
            }
            RegionShape::Polyline(points)
            | RegionShape::Polygon(points)
            | RegionShape::Points(points) => points.clone(),
            RegionShape::Area(area) => area
                .polygons
                .iter()
                .flat_map(|p| {
                    p.exterior()
                        .coords()
                        .chain(p.interiors().iter().flat_map(|ring| ring.coords()))
                        .copied()
                        .collect::<Vec<_>>()
                })
                .chain(area.lines.iter().flat_map(|line| line.coords().copied()))
                .chain(area.points.iter().copied())
                .collect(),
        }
    }

    /// Axis-aligned bounding box, `None` for empty regions
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let vertices = self.vertices();
        let first = vertices.first()?;
        let (mut min, mut max) = (*first, *first);
        for c in &vertices[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some(Rect::new(min, max))
    }
}
