//! # ROI Bridge
//!
//! Converts annotation objects of a local image-analysis session into the
//! ROI/shape model of a remote image server, and back.
//!
//! ## Core Features
//!
//! - **Comment protocol**: every exported shape carries
//!   `Type:class1&class2:objectId:parentId`, which survives the round trip
//!   and rebuilds classification and parent/child nesting on import
//! - **Ring splitting**: holed and multi-part regions are exported as one
//!   shape per ring and recombined with symmetric difference on import
//! - **Rectangle compaction**: axis-aligned four-corner rings travel as
//!   rectangle shapes
//! - **GeoJSON Support**: export/import of whole object trees
//! - **Pluggable stores**: anything implementing [`RoiStore`] can be pushed to
//!   or pulled from
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roi_bridge::{AnnotationObject, ImagePlane, NoopRegistry, Region, ShapeConverter};
//!
//! let converter = ShapeConverter::builder()
//!     .fill_annotations(true)
//!     .build();
//!
//! let object = AnnotationObject::annotation(Region::rectangle(
//!     0.0, 0.0, 10.0, 5.0, ImagePlane::default(),
//! ));
//! let rois = converter.to_remote_rois(&[object]);
//! let objects = converter.to_local_objects(&rois, &mut NoopRegistry);
//! assert_eq!(objects.len(), 1);
//! ```

// Core modules
pub mod error;
pub mod region;
pub mod object;
pub mod remote;
pub mod comment;
pub mod points;
pub mod algorithms;
pub mod traits;
pub mod ids;
pub mod converter;
pub mod store;
pub mod io;
pub mod typed_geojson;
pub mod config;

// Re-exports for convenience
pub use error::{Result, RoiError};
pub use region::{AreaRegion, ImagePlane, Region, RegionShape};
pub use object::{AnnotationObject, Color, ObjectKind, PathClass};
pub use remote::{RemoteRoi, RemoteShape, ShapeGeometry};
pub use comment::{encode_comment, ShapeComment};
pub use traits::*;
pub use ids::{ClockIds, NoopRegistry, SequentialIds};
pub use converter::{ConverterBuilder, ShapeConverter};
pub use config::ConverterOptions;
pub use store::{fetch_objects, send_objects, MemoryRoiStore, SendReport};

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon};

    fn converter() -> ShapeConverter {
        ShapeConverter::builder().id_source(SequentialIds::new()).build()
    }

    fn donut() -> Region {
        let polygon = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 3.0, y: 3.0), (x: 7.0, y: 3.0), (x: 7.0, y: 7.0), (x: 3.0, y: 7.0)]]
        );
        Region::area(
            AreaRegion::from_polygons(MultiPolygon::new(vec![polygon])),
            ImagePlane::default(),
        )
    }

    #[test]
    fn test_converter_defaults() {
        let converter = ShapeConverter::default();
        assert_eq!(converter.options(), &ConverterOptions::default());
    }

    #[test]
    fn test_donut_round_trip() {
        let converter = converter();
        let object = AnnotationObject::annotation(donut()).with_classification(PathClass::new(["Tumor"]));

        let shapes = converter.to_remote_shapes(&object, "obj1", "NoParent");
        assert_eq!(shapes.len(), 2);
        assert!(shapes
            .iter()
            .all(|s| s.comment.as_deref() == Some("Annotation:Tumor:obj1:NoParent")));

        let objects = converter.to_local_objects(&[RemoteRoi::new(shapes)], &mut NoopRegistry);
        assert_eq!(objects.len(), 1);
        assert!((objects[0].region.area_size() - 84.0).abs() < 1e-9);
        assert_eq!(objects[0].classification, PathClass::new(["Tumor"]));
    }

    #[test]
    fn test_geojson_export() {
        let objects = vec![AnnotationObject::annotation(donut())];
        let geojson = io::objects_to_geojson(&objects, 16);
        assert_eq!(geojson.features.len(), 1);
    }

    #[test]
    fn test_store_round_trip() {
        let converter = converter();
        let mut store = MemoryRoiStore::new();
        let objects = vec![AnnotationObject::detection(donut())];

        let report = send_objects(&converter, &mut store, &objects, true).unwrap();
        assert_eq!(report.written, 1);

        let fetched = fetch_objects(&converter, &store, &mut NoopRegistry).unwrap();
        assert_eq!(fetched.len(), 1);
        assert!(fetched[0].is_detection());
    }
}
