use geo_types::Coord;
use tracing::{debug, warn};

use crate::{
    algorithms::{as_axis_aligned_rectangle, open_ring, split_rings},
    comment::{encode_comment, NO_PARENT},
    converter::ShapeConverter,
    object::{AnnotationObject, Color, PathClass},
    region::{ImagePlane, Region, RegionShape},
    remote::{RemoteRoi, RemoteShape, ShapeGeometry},
};

impl ShapeConverter {
    /// Convert one object into server shapes.
    ///
    /// `object_id` and `parent_id` are opaque tokens written into every
    /// shape's comment; children are not visited. Area regions expand into one
    /// shape per ring and point sets into one shape per point, all sharing the
    /// same comment.
    pub fn to_remote_shapes(
        &self,
        object: &AnnotationObject,
        object_id: &str,
        parent_id: &str,
    ) -> Vec<RemoteShape> {
        let comment = encode_comment(
            object.kind,
            object.classification.as_ref(),
            object_id,
            parent_id,
        );
        let (stroke, fill) = self.shape_colors(object);

        let shapes: Vec<RemoteShape> = self
            .region_geometries(&object.region)
            .into_iter()
            .map(|(geometry, plane)| RemoteShape {
                geometry,
                plane,
                comment: Some(comment.clone()),
                stroke_color: Some(stroke),
                fill_color: Some(fill),
            })
            .collect();

        if shapes.is_empty() {
            warn!(
                "{} region of object '{}' has nothing to export",
                object.region.kind_name(),
                object_id
            );
        } else {
            debug!(
                "Exported {} region of object '{}' as {} shape(s)",
                object.region.kind_name(),
                object_id,
                shapes.len()
            );
        }
        shapes
    }

    /// Convert an object tree into ROIs, one per object.
    ///
    /// Objects are numbered 1, 2, ... depth-first; each ROI's comments carry
    /// the parent's number, or `NoParent` at the top level, so that
    /// [`to_local_objects`](Self::to_local_objects) rebuilds the same tree.
    pub fn to_remote_rois(&self, objects: &[AnnotationObject]) -> Vec<RemoteRoi> {
        let mut rois = Vec::new();
        let mut next_id: i64 = 1;
        for root in objects {
            let tree = root.preorder();
            for (index, (object, parent)) in tree.iter().enumerate() {
                let id = next_id + index as i64;
                let parent_token = parent.map_or_else(
                    || NO_PARENT.to_string(),
                    |p| (next_id + p as i64).to_string(),
                );
                let shapes = self.to_remote_shapes(object, &id.to_string(), &parent_token);
                if !shapes.is_empty() {
                    rois.push(RemoteRoi::new(shapes));
                }
            }
            next_id += tree.len() as i64;
        }
        rois
    }

    /// Stroke from the classification (yellow when unclassified); fill is a
    /// translucent variant of it only when filling is enabled.
    fn shape_colors(&self, object: &AnnotationObject) -> (Color, Color) {
        let stroke = object
            .classification
            .as_ref()
            .map(PathClass::color)
            .unwrap_or(Color::YELLOW);
        let fill = if self.options.fill_annotations {
            stroke.with_alpha(self.options.fill_alpha)
        } else {
            Color::TRANSPARENT
        };
        (stroke, fill)
    }

    fn region_geometries(&self, region: &Region) -> Vec<(ShapeGeometry, ImagePlane)> {
        let plane = region.plane;
        match &region.shape {
            RegionShape::Rectangle { x, y, width, height } => vec![(
                ShapeGeometry::Rectangle { x: *x, y: *y, width: *width, height: *height },
                plane,
            )],
            RegionShape::Ellipse { x, y, width, height } => vec![(
                ShapeGeometry::Ellipse {
                    x: x + width / 2.0,
                    y: y + height / 2.0,
                    radius_x: width / 2.0,
                    radius_y: height / 2.0,
                },
                plane,
            )],
            RegionShape::Line { x1, y1, x2, y2 } => vec![(
                ShapeGeometry::Line { x1: *x1, y1: *y1, x2: *x2, y2: *y2 },
                plane,
            )],
            RegionShape::Polyline(points) => vec![(
                ShapeGeometry::Polyline { points: to_pairs(points) },
                plane,
            )],
            RegionShape::Polygon(points) => vec![(
                ShapeGeometry::Polygon { points: to_pairs(open_ring(points)) },
                plane,
            )],
            RegionShape::Points(points) => points
                .iter()
                .map(|c| (ShapeGeometry::Point { x: c.x, y: c.y }, plane))
                .collect(),
            RegionShape::Area(area) => {
                // Every ring goes back through this function as its own region
                let mut geometries = Vec::new();
                for ring in split_rings(&area.polygons) {
                    let ring_region =
                        match as_axis_aligned_rectangle(&ring, self.options.rectangle_tolerance) {
                            Some(rect) => Region::rectangle(
                                rect.min().x,
                                rect.min().y,
                                rect.width(),
                                rect.height(),
                                plane,
                            ),
                            None => Region::polygon(ring, plane),
                        };
                    geometries.extend(self.region_geometries(&ring_region));
                }
                for line in area.lines.iter().filter(|line| line.0.len() >= 2) {
                    let line_region = match line.0.as_slice() {
                        [a, b] => Region::line(a.x, a.y, b.x, b.y, plane),
                        coords => Region::polyline(coords.to_vec(), plane),
                    };
                    geometries.extend(self.region_geometries(&line_region));
                }
                if !area.points.is_empty() {
                    geometries.extend(
                        self.region_geometries(&Region::points(area.points.clone(), plane)),
                    );
                }
                geometries
            }
        }
    }
}

fn to_pairs(points: &[Coord<f64>]) -> Vec<[f64; 2]> {
    points.iter().map(|c| [c.x, c.y]).collect()
}
