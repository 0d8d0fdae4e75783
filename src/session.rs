use std::path::{Path, PathBuf};

use crate::{
    io::map::{KeyframeMap, LocalizationMap, MapError},
    matching::SequenceMatcher,
    trajectory::Trajectory,
};

/// Owns a loaded map. Dropping the session releases the map.
pub struct MapSession {
    path: PathBuf,
    map: Box<dyn LocalizationMap>,
}

impl MapSession {
    /// Loads a keyframe map file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let map = KeyframeMap::load(path.as_ref())?;
        log::info!(
            "Loaded {} keyframes from {}",
            map.len(),
            path.as_ref().display()
        );
        Ok(Self::new(path, Box::new(map)))
    }

    pub fn new<P: AsRef<Path>>(path: P, map: Box<dyn LocalizationMap>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            map,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full camera trajectory in storage order.
    pub fn camera_poses(&self) -> Trajectory {
        self.map.camera_poses()
    }

    pub fn sequence_matcher(&self) -> &dyn SequenceMatcher {
        self.map.sequence_matcher()
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        log::debug!("Releasing map {}", self.path.display());
    }
}
