use std::{
    cell::{Cell, RefCell},
    path::Path,
    rc::Rc,
};

use image::RgbImage;

use crate::{
    camera::CameraIntrinsics,
    cursor::DatasetCursor,
    error::Error,
    io::{
        dataset::{Dataset, DatasetError, DatasetItem},
        map::MapError,
    },
    localizer::SessionBackend,
    session::MapSession,
};

use super::{sample_memory_dataset, FakeMap, MatcherCalls, MemoryDataset};

/// Counts its own release on drop.
struct TrackedDataset {
    inner: MemoryDataset,
    releases: Rc<Cell<usize>>,
}

impl Drop for TrackedDataset {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl Dataset for TrackedDataset {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Result<DatasetItem, DatasetError> {
        self.inner.get(index)
    }

    fn image(&self, index: usize) -> Result<RgbImage, DatasetError> {
        self.inner.image(index)
    }

    fn camera(&self) -> Option<CameraIntrinsics> {
        self.inner.camera()
    }

    fn path(&self) -> &Path {
        self.inner.path()
    }
}

fn not_found(path: &Path) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

/// Backend opening [`FakeMap`]s and in-memory datasets. Paths containing
/// `missing` fail to load. Clones share the recorded calls and releases.
#[derive(Clone)]
pub struct FakeBackend {
    keyframes: usize,
    calls: Rc<RefCell<MatcherCalls>>,
    releases: Rc<Cell<usize>>,
    dataset_releases: Rc<Cell<usize>>,
}

impl FakeBackend {
    pub fn new(keyframes: usize) -> Self {
        Self {
            keyframes,
            calls: Rc::default(),
            releases: Rc::default(),
            dataset_releases: Rc::default(),
        }
    }

    pub fn calls(&self) -> MatcherCalls {
        self.calls.borrow().clone()
    }

    pub fn released_maps(&self) -> usize {
        self.releases.get()
    }

    pub fn released_datasets(&self) -> usize {
        self.dataset_releases.get()
    }
}

fn is_missing(path: &Path) -> bool {
    path.to_string_lossy().contains("missing")
}

impl SessionBackend for FakeBackend {
    fn open_map(&self, path: &Path) -> Result<MapSession, Error> {
        if is_missing(path) {
            return Err(MapError::Io(not_found(path)).into());
        }
        let map = FakeMap::new(self.keyframes, self.calls.clone(), self.releases.clone());
        Ok(MapSession::new(path, Box::new(map)))
    }

    fn open_dataset(&self, path: &Path, _model_dir: &Path) -> Result<DatasetCursor, Error> {
        if is_missing(path) {
            return Err(DatasetError::Io(not_found(path)).into());
        }
        let mut dataset = sample_memory_dataset();
        dataset.set_path(path);
        let tracked = TrackedDataset {
            inner: dataset,
            releases: self.dataset_releases.clone(),
        };
        Ok(DatasetCursor::new(Box::new(tracked))?)
    }
}
