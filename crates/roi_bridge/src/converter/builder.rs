use crate::{
    config::ConverterOptions,
    converter::ShapeConverter,
    ids::ClockIds,
    traits::IdSource,
};

/// Builder for [`ShapeConverter`] with a fluent API
pub struct ConverterBuilder {
    options: ConverterOptions,
    ids: Option<Box<dyn IdSource>>,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self {
            options: ConverterOptions::default(),
            ids: None,
        }
    }

    /// Replace all options at once
    pub fn options(mut self, options: ConverterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fill_annotations(mut self, fill: bool) -> Self {
        self.options.fill_annotations = fill;
        self
    }

    pub fn fill_alpha(mut self, alpha: u8) -> Self {
        self.options.fill_alpha = alpha;
        self
    }

    pub fn ellipse_segments(mut self, segments: usize) -> Self {
        self.options.ellipse_segments = segments;
        self
    }

    pub fn rectangle_tolerance(mut self, tolerance: f64) -> Self {
        self.options.rectangle_tolerance = tolerance;
        self
    }

    /// Set the sentinel id source (defaults to [`ClockIds`])
    pub fn id_source<I>(mut self, ids: I) -> Self
    where
        I: IdSource + 'static,
    {
        self.ids = Some(Box::new(ids));
        self
    }

    pub fn build(self) -> ShapeConverter {
        let ids = self.ids.unwrap_or_else(|| Box::new(ClockIds::new()));
        ShapeConverter::new(self.options, ids)
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
