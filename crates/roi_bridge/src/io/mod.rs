//! File formats for local objects.

pub mod geojson;

pub use self::geojson::*;
