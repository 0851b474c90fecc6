use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::region::Region;

/// Whether an object is a user annotation or an automatically detected object
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ObjectKind {
    #[default]
    Annotation,
    Detection,
}

impl ObjectKind {
    /// Resolve a comment type token.
    ///
    /// Matching is case-insensitive; `cell` maps to a detection and anything
    /// unrecognised falls back to an annotation.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("cell") {
            return ObjectKind::Detection;
        }
        token.parse().unwrap_or_default()
    }
}

/// RGBA display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Pack as the signed `0xRRGGBBAA` integer the server stores
    pub fn to_rgba_int(self) -> i32 {
        i32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    pub fn from_rgba_int(value: i32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self { r, g, b, a }
    }
}

impl From<i32> for Color {
    fn from(value: i32) -> Self {
        Color::from_rgba_int(value)
    }
}

impl From<Color> for i32 {
    fn from(color: Color) -> Self {
        color.to_rgba_int()
    }
}

/// Hierarchical classification: an ordered list of class names,
/// e.g. `["Tumor", "Positive"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathClass {
    names: Vec<String>,
}

impl PathClass {
    /// Build a classification from its names; blank names are dropped and
    /// `None` is returned when nothing is left.
    pub fn new<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Deterministic color derived from the full class name
    pub fn color(&self) -> Color {
        let hash = self
            .to_string()
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
        let [_, r, g, b] = hash.to_be_bytes();
        Color::rgb(r, g, b)
    }
}

impl fmt::Display for PathClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(": "))
    }
}

/// A region together with its classification, kind and child objects.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationObject {
    pub kind: ObjectKind,
    pub region: Region,
    pub classification: Option<PathClass>,
    pub color: Option<Color>,
    pub locked: bool,
    pub children: Vec<AnnotationObject>,
}

impl AnnotationObject {
    pub fn new(kind: ObjectKind, region: Region) -> Self {
        Self {
            kind,
            region,
            classification: None,
            color: None,
            locked: false,
            children: Vec::new(),
        }
    }

    pub fn annotation(region: Region) -> Self {
        Self::new(ObjectKind::Annotation, region)
    }

    pub fn detection(region: Region) -> Self {
        Self::new(ObjectKind::Detection, region)
    }

    pub fn with_classification(mut self, classification: Option<PathClass>) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_child(mut self, child: AnnotationObject) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_detection(&self) -> bool {
        self.kind == ObjectKind::Detection
    }

    /// Color used on screen: explicit color, then class color, then yellow
    pub fn display_color(&self) -> Color {
        self.color
            .or_else(|| self.classification.as_ref().map(PathClass::color))
            .unwrap_or(Color::YELLOW)
    }

    /// Number of objects below this one in the tree
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&AnnotationObject> = self.children.iter().collect();
        while let Some(object) = stack.pop() {
            count += 1;
            stack.extend(object.children.iter());
        }
        count
    }

    /// Every object of the tree in preorder, paired with the preorder index of
    /// its parent (`None` for `self`).
    pub fn preorder(&self) -> Vec<(&AnnotationObject, Option<usize>)> {
        let mut order = Vec::new();
        let mut stack: Vec<(&AnnotationObject, Option<usize>)> = vec![(self, None)];
        while let Some((object, parent)) = stack.pop() {
            let index = order.len();
            order.push((object, parent));
            stack.extend(object.children.iter().rev().map(|child| (child, Some(index))));
        }
        order
    }
}

// Imported hierarchies can be arbitrarily deep; unlink children onto a heap
// stack so dropping a long chain does not recurse.
impl Drop for AnnotationObject {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut child) = stack.pop() {
            stack.append(&mut child.children);
        }
    }
}
