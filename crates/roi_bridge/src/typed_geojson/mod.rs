use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::Geometry;
use ts_rs::TS;
use schemars::JsonSchema;

use crate::region::ImagePlane;

/// Classification block of an object feature
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[schemars(description = "Classification of an object")]
pub struct ClassificationProperties {
    #[schemars(description = "Full class name, names joined with ': '")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "Individual class names, outermost first")]
    pub names: Vec<String>,
    #[schemars(description = "RGB class color")]
    pub color: [u8; 3],
}

/// Properties for annotation object features
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
#[schemars(description = "Properties for annotation object features")]
pub struct ObjectProperties {
    #[schemars(description = "Either 'annotation' or 'detection'")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationProperties>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "RGB object color")]
    pub color: Option<[u8; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<ImagePlane>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Index of the parent feature in the same collection")]
    pub parent_index: Option<usize>,
}

impl Default for ObjectProperties {
    fn default() -> Self {
        Self {
            object_type: "annotation".to_string(),
            classification: None,
            is_locked: false,
            color: None,
            plane: None,
            parent_index: None,
        }
    }
}

/// A typed GeoJSON Feature that is generic over its properties.
#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    /// Creates a new TypedFeature.
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }
}

impl<P> From<geojson::Feature> for TypedFeature<P> {
    fn from(feature: geojson::Feature) -> Self {
        Self {
            feature,
            _properties: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_use_camel_case() {
        let properties = ObjectProperties {
            object_type: "detection".to_string(),
            is_locked: true,
            parent_index: Some(2),
            ..Default::default()
        };
        let feature = TypedFeature::new(None, properties.clone());
        let raw = feature.feature.properties.as_ref().unwrap();
        assert_eq!(raw["objectType"], "detection");
        assert_eq!(raw["isLocked"], true);
        assert_eq!(raw["parentIndex"], 2);
        assert!(!raw.contains_key("classification"));
        assert_eq!(feature.properties(), Some(properties));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let mut raw = serde_json::Map::new();
        raw.insert("objectType".to_string(), "annotation".into());
        let feature = geojson::Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(raw),
            foreign_members: None,
        };
        let typed: TypedFeature<ObjectProperties> = feature.into();
        assert_eq!(typed.properties(), Some(ObjectProperties::default()));
    }
}
