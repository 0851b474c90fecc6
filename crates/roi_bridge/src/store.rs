use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    converter::ShapeConverter,
    error::{Result, RoiError},
    object::AnnotationObject,
    remote::RemoteRoi,
    traits::{LabelRegistry, RoiStore},
};

/// ROI store held in memory, optionally persisted as a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRoiStore {
    rois: Vec<RemoteRoi>,
    next_id: i64,
}

impl MemoryRoiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file; a missing file yields an empty store
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }
}

impl RoiStore for MemoryRoiStore {
    fn fetch_rois(&self) -> Result<Vec<RemoteRoi>> {
        Ok(self.rois.clone())
    }

    fn save_rois(&mut self, rois: Vec<RemoteRoi>) -> Result<Vec<RemoteRoi>> {
        let saved: Vec<RemoteRoi> = rois
            .into_iter()
            .map(|mut roi| {
                self.next_id += 1;
                roi.id = Some(self.next_id);
                roi
            })
            .collect();
        self.rois.extend(saved.iter().cloned());
        Ok(saved)
    }

    fn delete_rois(&mut self, ids: &[i64]) -> Result<()> {
        if let Some(&missing) = ids
            .iter()
            .find(|id| !self.rois.iter().any(|roi| roi.id == Some(**id)))
        {
            return Err(RoiError::UnknownRoi(missing));
        }
        self.rois.retain(|roi| roi.id.map_or(true, |id| !ids.contains(&id)));
        Ok(())
    }
}

/// Outcome of [`send_objects`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendReport {
    pub written: usize,
    pub deleted: usize,
}

/// Write objects to a store as ROIs.
///
/// With `replace`, the ROIs present before the call are deleted, but only
/// after the new ones were written successfully.
pub fn send_objects(
    converter: &ShapeConverter,
    store: &mut dyn RoiStore,
    objects: &[AnnotationObject],
    replace: bool,
) -> Result<SendReport> {
    let previous: Vec<i64> = if replace {
        store.fetch_rois()?.iter().filter_map(|roi| roi.id).collect()
    } else {
        Vec::new()
    };

    let rois = converter.to_remote_rois(objects);
    let written = store.save_rois(rois)?.len();
    info!("Wrote {} ROI(s)", written);

    if !previous.is_empty() {
        store.delete_rois(&previous)?;
        info!("Deleted {} previous ROI(s)", previous.len());
    }

    Ok(SendReport {
        written,
        deleted: previous.len(),
    })
}

/// Fetch every ROI from a store and convert it into local objects
pub fn fetch_objects(
    converter: &ShapeConverter,
    store: &dyn RoiStore,
    registry: &mut dyn LabelRegistry,
) -> Result<Vec<AnnotationObject>> {
    let rois = store.fetch_rois()?;
    let objects = converter.to_local_objects(&rois, registry);
    info!("Fetched {} ROI(s) as {} top-level object(s)", rois.len(), objects.len());
    Ok(objects)
}
