use crate::{error::Result, remote::RemoteRoi};

/// Source of the negative ids given to shapes whose comment carries none
pub trait IdSource: Send + Sync {
    /// A fresh negative id, distinct from every id handed out before
    fn next_sentinel(&self) -> i64;
}

/// Registry of classification labels known to the host application
pub trait LabelRegistry {
    /// Record a classification path unless it is already known
    fn register_if_absent(&mut self, labels: &[String]);
}

/// Remote-object provider that stores ROIs for one image
pub trait RoiStore {
    /// All ROIs currently attached to the image
    fn fetch_rois(&self) -> Result<Vec<RemoteRoi>>;

    /// Store new ROIs and return them with their assigned ids
    fn save_rois(&mut self, rois: Vec<RemoteRoi>) -> Result<Vec<RemoteRoi>>;

    /// Delete ROIs by id
    fn delete_rois(&mut self, ids: &[i64]) -> Result<()>;
}
