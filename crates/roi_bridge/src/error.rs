use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Unsupported GeoJSON geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid GeoJSON feature: {0}")]
    InvalidFeature(String),

    #[error("Unknown ROI id: {0}")]
    UnknownRoi(i64),

    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;
