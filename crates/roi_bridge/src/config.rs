use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};

/// Tunables for shape conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConverterOptions {
    /// Emit a translucent fill color on exported shapes
    pub fill_annotations: bool,
    /// Alpha of the translucent fill
    pub fill_alpha: u8,
    /// Vertices used when an ellipse takes part in XOR or union
    #[schemars(range(min = 4))]
    pub ellipse_segments: usize,
    /// Absolute tolerance for axis-aligned rectangle detection
    pub rectangle_tolerance: f64,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            fill_annotations: false,
            fill_alpha: 50,
            ellipse_segments: 72,
            rectangle_tolerance: 1e-9,
        }
    }
}

impl ConverterOptions {
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ConverterOptions)
    }

    /// Load options from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load options
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(RoiError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = ConverterOptions::from_toml("fill_annotations = true\n").unwrap();
        assert!(options.fill_annotations);
        assert_eq!(options.fill_alpha, 50);
        assert_eq!(options.ellipse_segments, 72);
    }

    #[test]
    fn test_toml_round_trip() {
        let options = ConverterOptions {
            fill_annotations: true,
            fill_alpha: 80,
            ellipse_segments: 32,
            rectangle_tolerance: 0.5,
        };
        let text = options.to_toml().unwrap();
        assert_eq!(ConverterOptions::from_toml(&text).unwrap(), options);
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("options.json");
        fs::write(&json_path, r#"{ "fill_alpha": 10 }"#).unwrap();
        assert_eq!(ConverterOptions::from_file(&json_path).unwrap().fill_alpha, 10);

        let yaml_path = dir.path().join("options.yaml");
        fs::write(&yaml_path, "fill_alpha: 10").unwrap();
        assert!(matches!(
            ConverterOptions::from_file(&yaml_path),
            Err(RoiError::UnsupportedFileFormat)
        ));
    }
}
