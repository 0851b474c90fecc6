use std::fs;
use std::path::Path;

use roi_bridge::{ConverterOptions, RemoteRoi, RoiError};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    RoiError(#[from] RoiError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Load converter options from a `.toml` or `.json` file, or use the defaults
pub fn load_options(path: Option<&Path>) -> Result<ConverterOptions, CliError> {
    match path {
        Some(path) => {
            let options = ConverterOptions::from_file(path)?;
            info!("Loaded converter options from {:?}", path);
            Ok(options)
        }
        None => Ok(ConverterOptions::default()),
    }
}

/// Read a JSON array of ROIs
pub fn read_rois<P: AsRef<Path>>(path: P) -> Result<Vec<RemoteRoi>, CliError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write ROIs as a pretty-printed JSON array
pub fn write_rois<P: AsRef<Path>>(path: P, rois: &[RemoteRoi]) -> Result<(), CliError> {
    fs::write(path, serde_json::to_string_pretty(rois)?)?;
    Ok(())
}

/// JSON schema of the ROI batch format, or of the converter options
pub fn schema_json(options: bool) -> Result<String, CliError> {
    let schema = if options {
        ConverterOptions::schema()
    } else {
        RemoteRoi::batch_schema()
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_bridge::{ImagePlane, RemoteShape, ShapeGeometry};

    #[test]
    fn test_missing_config_uses_defaults() {
        assert_eq!(load_options(None).unwrap(), ConverterOptions::default());
    }

    #[test]
    fn test_load_toml_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        fs::write(&path, "fill_annotations = true\nfill_alpha = 80\n").unwrap();

        let options = load_options(Some(path.as_path())).unwrap();
        assert!(options.fill_annotations);
        assert_eq!(options.fill_alpha, 80);
    }

    #[test]
    fn test_unknown_config_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        fs::write(&path, "fill_alpha: 80\n").unwrap();
        assert!(matches!(
            load_options(Some(path.as_path())),
            Err(CliError::RoiError(RoiError::UnsupportedFileFormat))
        ));
    }

    #[test]
    fn test_rois_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rois.json");
        let rois = vec![RemoteRoi::new(vec![RemoteShape::new(
            ShapeGeometry::Point { x: 1.0, y: 2.0 },
            ImagePlane::default(),
        )
        .with_comment("Annotation:NoClass:1:NoParent")])];

        write_rois(&path, &rois).unwrap();
        assert_eq!(read_rois(&path).unwrap(), rois);
    }

    #[test]
    fn test_schemas_are_json() {
        for options in [false, true] {
            let text = schema_json(options).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert!(value.is_object());
        }
    }
}
