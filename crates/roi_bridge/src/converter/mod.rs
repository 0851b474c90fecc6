//! Conversion between local annotation objects and server-side shapes.

pub mod builder;
mod export;
pub(crate) mod hierarchy;
mod import;

use crate::{config::ConverterOptions, traits::IdSource};

pub use builder::ConverterBuilder;

/// Bidirectional translator between [`AnnotationObject`](crate::AnnotationObject)s
/// and [`RemoteRoi`](crate::RemoteRoi)s.
///
/// Conversion is pure and total: malformed input is logged and replaced by
/// defaults, never reported as an error.
pub struct ShapeConverter {
    options: ConverterOptions,
    ids: Box<dyn IdSource>,
}

impl ShapeConverter {
    /// Create a new converter builder
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn new(options: ConverterOptions, ids: Box<dyn IdSource>) -> Self {
        Self { options, ids }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }
}

impl Default for ShapeConverter {
    fn default() -> Self {
        ConverterBuilder::new().build()
    }
}
