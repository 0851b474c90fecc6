use geo_types::Coord;
use tracing::{debug, warn};

use crate::{
    algorithms::{as_axis_aligned_rectangle, open_ring, union_points, xor_reduce},
    comment::ShapeComment,
    converter::{hierarchy::ImportedObject, ShapeConverter},
    object::{AnnotationObject, Color, PathClass},
    region::{ImagePlane, Region},
    remote::{RemoteRoi, RemoteShape, ShapeGeometry},
    traits::LabelRegistry,
};

impl ShapeConverter {
    /// Convert ROIs fetched from the server into local objects.
    ///
    /// Each ROI becomes at most one object; ROIs without any convertible shape
    /// are skipped. Objects whose comment names the id of another imported
    /// object are nested under it, everything else is returned at the top
    /// level. New classifications are offered to `registry`.
    pub fn to_local_objects(
        &self,
        rois: &[RemoteRoi],
        registry: &mut dyn LabelRegistry,
    ) -> Vec<AnnotationObject> {
        let imported = rois
            .iter()
            .filter_map(|roi| self.import_roi(roi, registry))
            .collect();
        super::hierarchy::link_objects(imported)
    }

    fn import_roi(
        &self,
        roi: &RemoteRoi,
        registry: &mut dyn LabelRegistry,
    ) -> Option<ImportedObject> {
        let comment = self.roi_comment(roi);

        let regions: Vec<Region> = roi
            .shapes
            .iter()
            .filter_map(|shape| self.shape_to_region(shape))
            .collect();
        let Some(region) = self.combine_regions(regions) else {
            warn!(roi = ?roi.id, "ROI has no convertible shapes, skipping");
            return None;
        };

        let classification = comment.classification();
        if let Some(class) = &classification {
            registry.register_if_absent(class.names());
        }
        let color = classification
            .as_ref()
            .map(PathClass::color)
            .unwrap_or(Color::RED);

        debug!(
            roi = ?roi.id,
            "Imported {} shape(s) as {} {} region",
            roi.shapes.len(),
            comment.kind(),
            region.kind_name()
        );

        let object = AnnotationObject::new(comment.kind(), region)
            .with_classification(classification)
            .with_color(color);
        Some(ImportedObject {
            object,
            object_id: comment.object_id,
            parent_id: comment.parent_id,
        })
    }

    /// The first non-blank comment of the ROI wins; siblings that disagree on
    /// type or class are reported.
    fn roi_comment(&self, roi: &RemoteRoi) -> ShapeComment {
        let mut comments = roi.shapes.iter().filter_map(RemoteShape::comment_text);
        let first = comments.next().unwrap_or_default();
        let parsed = ShapeComment::parse(first, self.ids.as_ref());

        for other in comments {
            if !parsed.agrees_with(other) {
                warn!(
                    roi = ?roi.id,
                    "Shapes of one ROI disagree: '{}' vs '{}', keeping the first",
                    first,
                    other
                );
            }
        }
        parsed
    }

    /// Convert one server shape into a primitive region; `None` for
    /// unsupported kinds.
    pub fn shape_to_region(&self, shape: &RemoteShape) -> Option<Region> {
        let plane = shape.plane;
        let region = match &shape.geometry {
            ShapeGeometry::Rectangle { x, y, width, height } => {
                Region::rectangle(*x, *y, *width, *height, plane)
            }
            ShapeGeometry::Ellipse { x, y, radius_x, radius_y } => Region::ellipse(
                x - radius_x,
                y - radius_y,
                radius_x * 2.0,
                radius_y * 2.0,
                plane,
            ),
            ShapeGeometry::Line { x1, y1, x2, y2 } => Region::line(*x1, *y1, *x2, *y2, plane),
            ShapeGeometry::Polyline { points } => Region::polyline(to_coords(points), plane),
            ShapeGeometry::Polygon { points } => {
                let coords = to_coords(points);
                match as_axis_aligned_rectangle(&coords, self.options.rectangle_tolerance) {
                    Some(rect) => Region::rectangle(
                        rect.min().x,
                        rect.min().y,
                        rect.width(),
                        rect.height(),
                        plane,
                    ),
                    None => Region::polygon(open_ring(&coords).to_vec(), plane),
                }
            }
            ShapeGeometry::Point { x, y } => Region::points(vec![Coord { x: *x, y: *y }], plane),
            ShapeGeometry::Label { .. } | ShapeGeometry::Mask { .. } => {
                warn!("Unsupported {} shape skipped", shape.geometry.kind_name());
                return None;
            }
        };
        if region.vertices().iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            warn!("{} shape with non-finite coordinates skipped", region.kind_name());
            return None;
        }
        Some(region)
    }

    /// Recombine the primitive regions of one ROI into a single region.
    ///
    /// Points merge into one point set. Anything else is combined into an
    /// area: area-bearing members are XOR-ed in shape order, then lines and
    /// the point set are unioned on top. Composites sit on the lowest plane of
    /// their members.
    fn combine_regions(&self, regions: Vec<Region>) -> Option<Region> {
        let (points, others): (Vec<Region>, Vec<Region>) =
            regions.into_iter().partition(Region::is_points);
        let point_coords: Vec<Coord<f64>> = points.iter().flat_map(Region::vertices).collect();

        if others.is_empty() {
            let plane = points.first()?.plane;
            return Some(Region::points(point_coords, plane));
        }
        if points.is_empty() && others.len() == 1 {
            return others.into_iter().next();
        }

        let plane = points
            .iter()
            .chain(&others)
            .map(|r| r.plane)
            .reduce(ImagePlane::min)
            .unwrap_or_default();

        let segments = self.options.ellipse_segments;
        let polygons = xor_reduce(others.iter().filter_map(|r| r.to_multi_polygon(segments)));
        let lines = others.iter().filter_map(Region::to_line_string).collect();
        Some(Region::area(union_points(polygons, lines, &point_coords), plane))
    }
}

fn to_coords(points: &[[f64; 2]]) -> Vec<Coord<f64>> {
    points.iter().map(|&[x, y]| Coord { x, y }).collect()
}
