use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{object::Color, region::ImagePlane};

/// Geometry of a server-side shape primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShapeGeometry {
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Center and radii
    Ellipse { x: f64, y: f64, radius_x: f64, radius_y: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline {
        #[serde(with = "crate::points::serde_points")]
        #[schemars(with = "String")]
        points: Vec<[f64; 2]>,
    },
    Polygon {
        #[serde(with = "crate::points::serde_points")]
        #[schemars(with = "String")]
        points: Vec<[f64; 2]>,
    },
    Point { x: f64, y: f64 },
    /// Text label; never created, skipped on import
    Label { x: f64, y: f64, text: String },
    /// Bitmask; pixel data is not carried
    Mask { x: f64, y: f64, width: f64, height: f64 },
}

impl ShapeGeometry {
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }
}

/// One server-side shape primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RemoteShape {
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    pub plane: ImagePlane,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Packed `0xRRGGBBAA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<i32>")]
    pub stroke_color: Option<Color>,
    /// Packed `0xRRGGBBAA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<i32>")]
    pub fill_color: Option<Color>,
}

impl RemoteShape {
    pub fn new(geometry: ShapeGeometry, plane: ImagePlane) -> Self {
        Self {
            geometry,
            plane,
            comment: None,
            stroke_color: None,
            fill_color: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The comment, if present and not blank
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// A server-side group of shapes sharing one identity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RemoteRoi {
    /// Server id, `None` until stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub shapes: Vec<RemoteShape>,
}

impl RemoteRoi {
    pub fn new(shapes: Vec<RemoteShape>) -> Self {
        Self { id: None, shapes }
    }

    /// JSON schema of a batch of ROIs
    pub fn batch_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Vec<RemoteRoi>)
    }
}
