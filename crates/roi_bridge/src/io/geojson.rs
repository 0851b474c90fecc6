use std::path::Path;

use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value};
use tracing::{debug, warn};

use crate::{
    algorithms::{ellipse_polygon, open_ring, union_points},
    converter::hierarchy::{link_objects, ImportedObject},
    error::{Result, RoiError},
    object::{AnnotationObject, Color, ObjectKind, PathClass},
    region::{AreaRegion, Region, RegionShape},
    typed_geojson::{ClassificationProperties, ObjectProperties, TypedFeature},
};

/// Flatten an object tree into a FeatureCollection.
///
/// Objects are written depth-first; children point back at their parent
/// through `parentIndex`. Ellipses are written as polygons with
/// `ellipse_segments` vertices.
pub fn objects_to_geojson(objects: &[AnnotationObject], ellipse_segments: usize) -> FeatureCollection {
    let mut features = Vec::new();
    for root in objects {
        let offset = features.len();
        for (object, parent) in root.preorder() {
            let index = features.len();
            features.push(object_feature(object, index, parent.map(|p| offset + p), ellipse_segments));
        }
    }
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn object_feature(
    object: &AnnotationObject,
    index: usize,
    parent_index: Option<usize>,
    ellipse_segments: usize,
) -> Feature {
    let properties = ObjectProperties {
        object_type: object.kind.to_string().to_lowercase(),
        classification: object.classification.as_ref().map(|class| {
            let color = class.color();
            ClassificationProperties {
                name: class.to_string(),
                names: class.names().to_vec(),
                color: [color.r, color.g, color.b],
            }
        }),
        is_locked: object.locked,
        color: object.color.map(|c| [c.r, c.g, c.b]),
        plane: Some(object.region.plane),
        parent_index,
    };

    let geometry = region_geometry(&object.region, ellipse_segments);
    let mut feature = TypedFeature::new(Some(geometry), properties).feature;
    feature.id = Some(Id::Number(serde_json::Number::from(index)));
    feature
}

/// Serialize objects to a pretty-printed GeoJSON string
pub fn to_geojson_string(objects: &[AnnotationObject], ellipse_segments: usize) -> Result<String> {
    let collection = objects_to_geojson(objects, ellipse_segments);
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// Save objects as a GeoJSON file
pub fn save_geojson<P: AsRef<Path>>(
    objects: &[AnnotationObject],
    ellipse_segments: usize,
    path: P,
) -> Result<()> {
    let geojson_string = to_geojson_string(objects, ellipse_segments)?;
    std::fs::write(path, geojson_string)?;
    Ok(())
}

/// Rebuild an object tree from a FeatureCollection.
///
/// Features with missing or malformed properties fall back to unclassified
/// annotations. A `parentIndex` that does not name an earlier or later
/// feature of the same collection leaves the object at the top level.
pub fn objects_from_geojson(collection: &FeatureCollection) -> Result<Vec<AnnotationObject>> {
    let mut imported = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let properties = TypedFeature::<ObjectProperties>::from(feature.clone())
            .properties()
            .unwrap_or_else(|| {
                if feature.properties.is_some() {
                    warn!("Feature {} has unreadable properties, using defaults", index);
                }
                ObjectProperties::default()
            });
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| RoiError::InvalidFeature(format!("feature {index} has no geometry")))?;

        let plane = properties.plane.unwrap_or_default();
        let region = Region::new(geometry_shape(&geometry.value)?, plane);
        let classification = properties
            .classification
            .and_then(|class| {
                if class.names.is_empty() {
                    PathClass::new(class.name.split(": "))
                } else {
                    PathClass::new(class.names)
                }
            });

        let mut object = AnnotationObject::new(ObjectKind::from_token(&properties.object_type), region)
            .with_classification(classification)
            .with_locked(properties.is_locked);
        if let Some([r, g, b]) = properties.color {
            object = object.with_color(Color::rgb(r, g, b));
        }

        imported.push(ImportedObject {
            object,
            object_id: index as i64 + 1,
            parent_id: properties.parent_index.map_or(0, |parent| parent as i64 + 1),
        });
    }

    debug!("Read {} feature(s) from GeoJSON", imported.len());
    Ok(link_objects(imported))
}

/// Load objects from a GeoJSON string
pub fn from_geojson_string(geojson_str: &str) -> Result<Vec<AnnotationObject>> {
    let collection: FeatureCollection = geojson_str.parse()?;
    objects_from_geojson(&collection)
}

/// Load objects from a GeoJSON file
pub fn from_geojson_file<P: AsRef<Path>>(path: P) -> Result<Vec<AnnotationObject>> {
    let geojson_str = std::fs::read_to_string(path)?;
    from_geojson_string(&geojson_str)
}

fn region_geometry(region: &Region, ellipse_segments: usize) -> Geometry {
    let value = match &region.shape {
        RegionShape::Rectangle { x, y, width, height } => {
            let corners = vec![
                Coord { x: *x, y: *y },
                Coord { x: x + width, y: *y },
                Coord { x: x + width, y: y + height },
                Coord { x: *x, y: y + height },
            ];
            Value::Polygon(polygon_positions(&Polygon::new(LineString::new(corners), vec![])))
        }
        RegionShape::Ellipse { x, y, width, height } => Value::Polygon(polygon_positions(
            &ellipse_polygon(*x, *y, *width, *height, ellipse_segments),
        )),
        RegionShape::Polygon(points) => Value::Polygon(polygon_positions(&Polygon::new(
            LineString::new(points.clone()),
            vec![],
        ))),
        RegionShape::Line { x1, y1, x2, y2 } => {
            Value::LineString(vec![vec![*x1, *y1], vec![*x2, *y2]])
        }
        RegionShape::Polyline(points) => Value::LineString(positions(points)),
        RegionShape::Points(points) => Value::MultiPoint(positions(points)),
        RegionShape::Area(area) => area_value(area),
    };
    Geometry::new(value)
}

/// Lines are always written as a MultiLineString so that they read back as
/// part of an area rather than as a standalone line.
fn area_value(area: &AreaRegion) -> Value {
    let mut members = Vec::new();
    match area.polygons.0.as_slice() {
        [] => {}
        [single] => members.push(Value::Polygon(polygon_positions(single))),
        parts => members.push(Value::MultiPolygon(parts.iter().map(polygon_positions).collect())),
    }
    if !area.lines.0.is_empty() {
        members.push(Value::MultiLineString(
            area.lines.iter().map(|line| positions(&line.0)).collect(),
        ));
    }
    if !area.points.is_empty() || members.is_empty() {
        members.push(Value::MultiPoint(positions(&area.points)));
    }

    if members.len() == 1 {
        members.remove(0)
    } else {
        Value::GeometryCollection(members.into_iter().map(Geometry::new).collect())
    }
}

fn positions(coords: &[Coord<f64>]) -> Vec<Vec<f64>> {
    coords.iter().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    let mut rings = vec![positions(&polygon.exterior().0)];
    for hole in polygon.interiors() {
        rings.push(positions(&hole.0));
    }
    rings
}

fn geometry_shape(value: &Value) -> Result<RegionShape> {
    let shape = match value {
        Value::Point(position) => RegionShape::Points(vec![coord(position)?]),
        Value::MultiPoint(points) => RegionShape::Points(coords(points)?),
        Value::LineString(line) => {
            let points = coords(line)?;
            match points.as_slice() {
                [start, end] => RegionShape::Line { x1: start.x, y1: start.y, x2: end.x, y2: end.y },
                _ => RegionShape::Polyline(points),
            }
        }
        Value::Polygon(rings) => {
            let polygon = polygon(rings)?;
            if polygon.interiors().is_empty() {
                RegionShape::Polygon(open_ring(&polygon.exterior().0).to_vec())
            } else {
                RegionShape::Area(AreaRegion::from_polygons(MultiPolygon::new(vec![polygon])))
            }
        }
        Value::MultiPolygon(parts) => {
            let polygons = parts.iter().map(|rings| polygon(rings)).collect::<Result<Vec<_>>>()?;
            RegionShape::Area(AreaRegion::from_polygons(MultiPolygon::new(polygons)))
        }
        Value::MultiLineString(lines) => RegionShape::Area(AreaRegion {
            lines: MultiLineString::new(line_strings(lines)?),
            ..AreaRegion::default()
        }),
        Value::GeometryCollection(members) => collection_shape(members)?,
    };
    Ok(shape)
}

/// Polygons, lines and points of a collection unioned into one area
fn collection_shape(members: &[Geometry]) -> Result<RegionShape> {
    let mut polygons = Vec::new();
    let mut lines = Vec::new();
    let mut points = Vec::new();
    for member in members {
        match &member.value {
            Value::Polygon(rings) => polygons.push(polygon(rings)?),
            Value::MultiPolygon(parts) => {
                for rings in parts {
                    polygons.push(polygon(rings)?);
                }
            }
            Value::LineString(line) => lines.push(LineString::new(coords(line)?)),
            Value::MultiLineString(parts) => lines.extend(line_strings(parts)?),
            Value::Point(position) => points.push(coord(position)?),
            Value::MultiPoint(positions) => points.extend(coords(positions)?),
            other => {
                return Err(RoiError::UnsupportedGeometry(format!(
                    "{} inside a GeometryCollection",
                    value_name(other)
                )));
            }
        }
    }
    if polygons.is_empty() && lines.is_empty() {
        return Ok(RegionShape::Points(points));
    }
    Ok(RegionShape::Area(union_points(MultiPolygon::new(polygons), lines, &points)))
}

fn line_strings(lines: &[Vec<Vec<f64>>]) -> Result<Vec<LineString<f64>>> {
    lines
        .iter()
        .map(|line| coords(line).map(LineString::new))
        .collect()
}

fn value_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let (exterior, holes) = rings
        .split_first()
        .ok_or_else(|| RoiError::InvalidFeature("polygon without rings".to_string()))?;
    let interiors = holes
        .iter()
        .map(|ring| coords(ring).map(LineString::new))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(LineString::new(coords(exterior)?), interiors))
}

fn coords(positions: &[Vec<f64>]) -> Result<Vec<Coord<f64>>> {
    positions.iter().map(|p| coord(p)).collect()
}

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(RoiError::InvalidFeature(format!(
            "position needs two coordinates, got {}",
            position.len()
        ))),
    }
}
