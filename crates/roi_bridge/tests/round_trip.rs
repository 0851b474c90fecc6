use geo_types::{polygon, Coord, MultiPolygon, Polygon};
use roi_bridge::{
    AnnotationObject, AreaRegion, ImagePlane, NoopRegistry, ObjectKind, PathClass, Region,
    RegionShape, RemoteRoi, SequentialIds, ShapeComment, ShapeConverter, ShapeGeometry,
};

fn converter() -> ShapeConverter {
    ShapeConverter::builder().id_source(SequentialIds::new()).build()
}

fn round_trip(object: &AnnotationObject) -> Vec<AnnotationObject> {
    let converter = converter();
    let shapes = converter.to_remote_shapes(object, "1", "NoParent");
    converter.to_local_objects(&[RemoteRoi::new(shapes)], &mut NoopRegistry)
}

fn hole_count(region: &Region) -> usize {
    match &region.shape {
        RegionShape::Area(area) => area.hole_count(),
        _ => 0,
    }
}

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

#[test]
fn simple_shapes_survive_a_round_trip() {
    let plane = ImagePlane::new(1, 4, 2);
    let regions = vec![
        Region::rectangle(1.5, 2.5, 10.0, 4.0, plane),
        Region::ellipse(-3.0, 7.0, 8.0, 2.0, plane),
        Region::line(0.0, 0.0, 12.5, -3.0, plane),
        Region::polyline(vec![c(0.0, 0.0), c(4.0, 1.0), c(9.0, -2.0)], plane),
        Region::polygon(vec![c(0.0, 0.0), c(6.0, 0.0), c(3.0, 5.0)], plane),
    ];

    for region in regions {
        for kind in [ObjectKind::Annotation, ObjectKind::Detection] {
            let object = AnnotationObject::new(kind, region.clone())
                .with_classification(PathClass::new(["Stroma", "Dense"]));
            let objects = round_trip(&object);

            assert_eq!(objects.len(), 1, "{}", region.kind_name());
            assert_eq!(objects[0].region, region);
            assert_eq!(objects[0].kind, kind);
            assert_eq!(objects[0].classification, object.classification);
        }
    }
}

#[test]
fn point_sets_keep_their_points() {
    let points = vec![c(5.0, 5.0), c(1.0, 2.0), c(5.0, 5.0), c(-4.5, 3.25)];
    let object = AnnotationObject::detection(Region::points(points.clone(), ImagePlane::default()));

    let objects = round_trip(&object);
    assert_eq!(objects.len(), 1);
    let RegionShape::Points(imported) = &objects[0].region.shape else {
        panic!("expected points, got {:?}", objects[0].region.shape);
    };

    let sorted = |mut v: Vec<Coord<f64>>| {
        v.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        v
    };
    assert_eq!(sorted(imported.clone()), sorted(points));
}

#[test]
fn holes_come_back_through_xor() {
    let triangle = |x: f64, y: f64| vec![(x, y), (x + 4.0, y), (x + 2.0, y + 3.0), (x, y)];
    let exterior = vec![(0.0, 0.0), (30.0, 0.0), (30.0, 20.0), (0.0, 20.0), (0.0, 0.0)];
    let holes: Vec<Vec<(f64, f64)>> = vec![triangle(2.0, 2.0), triangle(10.0, 10.0), triangle(20.0, 4.0)];

    for k in 0..=holes.len() {
        let polygon = Polygon::new(
            exterior.clone().into(),
            holes[..k].iter().map(|h| h.clone().into()).collect(),
        );
        let area = AreaRegion::from_polygons(MultiPolygon::new(vec![polygon]));
        let region = Region::area(area, ImagePlane::default());
        let object = AnnotationObject::annotation(region.clone());

        let shapes = converter().to_remote_shapes(&object, "1", "NoParent");
        assert_eq!(shapes.len(), k + 1);
        assert!(shapes.iter().all(|s| s.comment == shapes[0].comment));

        let objects = converter().to_local_objects(&[RemoteRoi::new(shapes)], &mut NoopRegistry);
        assert_eq!(objects.len(), 1);
        assert!((objects[0].region.area_size() - region.area_size()).abs() < 1e-9);
        assert_eq!(hole_count(&objects[0].region), k);
    }
}

#[test]
fn rectangles_never_become_polygons() {
    let object = AnnotationObject::annotation(Region::rectangle(0.0, 0.0, 7.0, 3.0, ImagePlane::default()));
    let converter = converter();

    let shapes = converter.to_remote_shapes(&object, "1", "NoParent");
    assert_eq!(shapes.len(), 1);
    assert!(matches!(shapes[0].geometry, ShapeGeometry::Rectangle { .. }));

    let objects = converter.to_local_objects(&[RemoteRoi::new(shapes.clone())], &mut NoopRegistry);
    assert!(matches!(objects[0].region.shape, RegionShape::Rectangle { .. }));

    let again = converter.to_remote_shapes(&objects[0], "1", "NoParent");
    assert_eq!(again[0].geometry, shapes[0].geometry);
}

#[test]
fn rectangular_rings_of_an_area_export_as_rectangles() {
    let donut = polygon!(
        exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
        interiors: [[(x: 3.0, y: 3.0), (x: 7.0, y: 3.0), (x: 7.0, y: 7.0), (x: 3.0, y: 7.0)]]
    );
    let area = AreaRegion::from_polygons(MultiPolygon::new(vec![donut]));
    let object = AnnotationObject::annotation(Region::area(area, ImagePlane::default()));

    let shapes = converter().to_remote_shapes(&object, "1", "NoParent");
    assert!(shapes
        .iter()
        .all(|s| matches!(s.geometry, ShapeGeometry::Rectangle { .. })));
}

#[test]
fn parents_link_within_a_batch() {
    let plane = ImagePlane::default();
    let roi = |x: f64, comment: &str| {
        let object = AnnotationObject::annotation(Region::rectangle(x, 0.0, 1.0, 1.0, plane));
        let mut shapes = converter().to_remote_shapes(&object, "0", "0");
        for shape in &mut shapes {
            shape.comment = Some(comment.to_string());
        }
        RemoteRoi::new(shapes)
    };
    let batch = vec![
        roi(0.0, "Annotation:NoClass:101:NoParent"),
        roi(10.0, "Annotation:NoClass:102:101"),
        roi(20.0, "Annotation:NoClass:103:999"),
    ];

    let objects = converter().to_local_objects(&batch, &mut NoopRegistry);
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].region, Region::rectangle(0.0, 0.0, 1.0, 1.0, plane));
    assert_eq!(objects[0].children.len(), 1);
    assert_eq!(objects[0].children[0].region, Region::rectangle(10.0, 0.0, 1.0, 1.0, plane));
    assert_eq!(objects[1].region, Region::rectangle(20.0, 0.0, 1.0, 1.0, plane));
}

#[test]
fn object_trees_survive_a_round_trip() {
    let plane = ImagePlane::default();
    let tree = AnnotationObject::annotation(Region::rectangle(0.0, 0.0, 100.0, 100.0, plane))
        .with_classification(PathClass::new(["Tumor"]))
        .with_child(
            AnnotationObject::detection(Region::ellipse(10.0, 10.0, 4.0, 4.0, plane))
                .with_child(AnnotationObject::detection(Region::points(vec![c(11.0, 11.0)], plane))),
        )
        .with_child(AnnotationObject::annotation(Region::line(0.0, 0.0, 5.0, 5.0, plane)));
    let converter = converter();

    let rois = converter.to_remote_rois(std::slice::from_ref(&tree));
    assert_eq!(rois.len(), 4);

    let mut registry = Vec::<PathClass>::new();
    let objects = converter.to_local_objects(&rois, &mut registry);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].descendant_count(), 3);
    assert_eq!(objects[0].children[0].children.len(), 1);
    assert_eq!(objects[0].children[0].kind, ObjectKind::Detection);
    assert_eq!(registry, vec![PathClass::new(["Tumor"]).unwrap()]);
}

#[test]
fn donut_end_to_end() {
    let donut = polygon!(
        exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
        interiors: [[(x: 3.0, y: 3.0), (x: 7.0, y: 3.0), (x: 7.0, y: 7.0), (x: 3.0, y: 7.0)]]
    );
    let area = AreaRegion::from_polygons(MultiPolygon::new(vec![donut]));
    let object = AnnotationObject::annotation(Region::area(area, ImagePlane::default()))
        .with_classification(PathClass::new(["Tumor"]));
    let converter = converter();

    let shapes = converter.to_remote_shapes(&object, "obj1", "NoParent");
    assert_eq!(shapes.len(), 2);
    for shape in &shapes {
        assert_eq!(shape.comment.as_deref(), Some("Annotation:Tumor:obj1:NoParent"));
    }

    let objects = converter.to_local_objects(&[RemoteRoi::new(shapes)], &mut NoopRegistry);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].kind, ObjectKind::Annotation);
    assert_eq!(objects[0].classification, PathClass::new(["Tumor"]));
    assert!((objects[0].region.area_size() - 84.0).abs() < 1e-9);
    assert_eq!(hole_count(&objects[0].region), 1);
}

#[test]
fn empty_comment_defaults_are_stable() {
    let comment = ShapeComment::parse("", &SequentialIds::new());
    assert_eq!(comment.to_string(), "annotation:NoClass:-1:0");
}

/// Composites are placed on the lowest plane of their members instead of
/// spanning every plane. This pins the current behavior; it is a known
/// limitation, not a contract.
#[test]
fn composite_collapses_to_lowest_plane_known_limitation() {
    let converter = converter();
    let upper = AnnotationObject::annotation(Region::rectangle(0.0, 0.0, 10.0, 10.0, ImagePlane::new(-1, 5, 2)));
    let lower = AnnotationObject::annotation(Region::rectangle(20.0, 0.0, 10.0, 10.0, ImagePlane::new(0, 3, 4)));

    let mut shapes = converter.to_remote_shapes(&upper, "1", "NoParent");
    shapes.extend(converter.to_remote_shapes(&lower, "1", "NoParent"));
    let objects = converter.to_local_objects(&[RemoteRoi::new(shapes)], &mut NoopRegistry);

    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].region.plane, ImagePlane::new(-1, 3, 2));
    assert!((objects[0].region.area_size() - 200.0).abs() < 1e-9);
}
