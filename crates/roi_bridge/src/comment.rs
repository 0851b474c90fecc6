//! Shape comment encoding.
//!
//! Classification, kind and identity travel through the server's free-text
//! shape comment as four colon-separated fields:
//!
//! ```text
//! Annotation:Tumor&Positive:12:3
//! ```
//!
//! i.e. `type : class-path : object-id : parent-id`, where the class path joins
//! the classification names with `&`. Parsing is total: every missing or
//! malformed field falls back to a default.

use std::fmt;

use crate::{
    object::{ObjectKind, PathClass},
    traits::IdSource,
};

pub const FIELD_SEPARATOR: char = ':';
pub const CLASS_SEPARATOR: char = '&';
pub const NO_CLASS: &str = "NoClass";
pub const NO_PARENT: &str = "NoParent";
pub const DEFAULT_KIND_TOKEN: &str = "annotation";

/// Encode a shape comment for an object with caller-supplied identities
pub fn encode_comment(
    kind: ObjectKind,
    classification: Option<&PathClass>,
    object_id: &str,
    parent_id: &str,
) -> String {
    format!(
        "{kind}{sep}{class}{sep}{object_id}{sep}{parent_id}",
        sep = FIELD_SEPARATOR,
        class = encode_class_path(classification),
    )
}

/// `Tumor&Positive`, or `NoClass` when unclassified
pub fn encode_class_path(classification: Option<&PathClass>) -> String {
    match classification {
        Some(class) => class.names().join(&CLASS_SEPARATOR.to_string()),
        None => NO_CLASS.to_string(),
    }
}

/// Decoded shape comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeComment {
    /// Raw type token, e.g. `Annotation`, `detection` or `cell`
    pub kind_token: String,
    /// Raw `&`-joined class path, `NoClass` when absent
    pub class_path: String,
    /// Positive when the comment carried a numeric id, a fresh sentinel otherwise
    pub object_id: i64,
    /// 0 when the comment carried no numeric parent id
    pub parent_id: i64,
}

impl ShapeComment {
    /// Parse a comment. Never fails.
    pub fn parse(comment: &str, ids: &dyn IdSource) -> Self {
        let mut fields = comment.split(FIELD_SEPARATOR).map(str::trim);
        let (kind_token, class_path) = header_fields(&mut fields);
        let object_id = fields
            .next()
            .and_then(|f| f.parse::<i64>().ok())
            .unwrap_or_else(|| ids.next_sentinel());
        let parent_id = fields
            .next()
            .and_then(|f| f.parse::<i64>().ok())
            .unwrap_or(0);

        Self {
            kind_token,
            class_path,
            object_id,
            parent_id,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::from_token(&self.kind_token)
    }

    /// Classification named by the class path, `None` for `NoClass` or blank
    pub fn classification(&self) -> Option<PathClass> {
        parse_class_path(&self.class_path)
    }

    /// Whether another comment names the same kind and classification
    pub fn agrees_with(&self, other: &str) -> bool {
        let mut fields = other.split(FIELD_SEPARATOR).map(str::trim);
        let (kind_token, class_path) = header_fields(&mut fields);
        ObjectKind::from_token(&kind_token) == self.kind()
            && parse_class_path(&class_path) == self.classification()
    }
}

impl fmt::Display for ShapeComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.kind_token,
            self.class_path,
            self.object_id,
            self.parent_id,
            sep = FIELD_SEPARATOR,
        )
    }
}

fn header_fields<'a>(fields: &mut impl Iterator<Item = &'a str>) -> (String, String) {
    let kind_token = fields
        .next()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_KIND_TOKEN)
        .to_string();
    let class_path = fields
        .next()
        .filter(|f| !f.is_empty())
        .unwrap_or(NO_CLASS)
        .to_string();
    (kind_token, class_path)
}

fn parse_class_path(class_path: &str) -> Option<PathClass> {
    if class_path.eq_ignore_ascii_case(NO_CLASS) {
        return None;
    }
    PathClass::new(class_path.split(CLASS_SEPARATOR))
}
