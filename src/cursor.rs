use std::path::Path;

use image::{imageops::FilterType, RgbImage};

use crate::{
    camera::{scaled_extent, CameraIntrinsics},
    io::dataset::{Dataset, DatasetError, OxfordDataset},
    pose::Pose,
    trajectory::Trajectory,
};

/// Zoom ratio of a freshly opened dataset.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Largest zoomed image, in pixels, that a frame may produce.
pub const MAX_ZOOMED_PIXELS: u64 = 1 << 26;

/// Resizes `image` by `ratio` in both directions.
///
/// Fails with `InvalidParameter` when the zoomed image would exceed
/// [`MAX_ZOOMED_PIXELS`].
pub fn zoom_image(image: RgbImage, ratio: f64) -> Result<RgbImage, DatasetError> {
    if ratio == 1.0 {
        return Ok(image);
    }
    let (width, height) = image.dimensions();
    let too_large = || {
        DatasetError::InvalidParameter(format!(
            "Zoom ratio {ratio} is too large for a {width}x{height} frame"
        ))
    };
    let zoomed_width = scaled_extent(width, ratio).ok_or_else(too_large)?;
    let zoomed_height = scaled_extent(height, ratio).ok_or_else(too_large)?;
    match (zoomed_width as u64).checked_mul(zoomed_height as u64) {
        Some(pixels) if pixels <= MAX_ZOOMED_PIXELS => {}
        _ => return Err(too_large()),
    }

    Ok(image::imageops::resize(
        &image,
        zoomed_width,
        zoomed_height,
        FilterType::Triangle,
    ))
}

/// A recorded frame, valid while its cursor is borrowed.
///
/// The image is only decoded when requested, using the zoom ratio that was
/// active when the frame was looked up.
pub struct Frame<'a> {
    pub index: usize,
    pub timestamp: f64,
    pub pose: Pose,
    zoom: f64,
    dataset: &'a dyn Dataset,
}

impl<'a> Frame<'a> {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Decodes the color image and applies the zoom ratio.
    pub fn image(&self) -> Result<RgbImage, DatasetError> {
        zoom_image(self.dataset.image(self.index)?, self.zoom)
    }

    /// Intrinsics matching [`Frame::image`].
    pub fn camera(&self) -> Option<CameraIntrinsics> {
        self.dataset.camera().map(|camera| camera.scale(self.zoom))
    }
}

/// Random, time indexed access to the frames of a dataset.
pub struct DatasetCursor {
    dataset: Box<dyn Dataset>,
    /// Seconds since the first frame, one per frame.
    elapsed: Vec<f64>,
    zoom: f64,
}

impl DatasetCursor {
    /// Opens an Oxford style recording with the camera models in `model_dir`.
    pub fn open<P: AsRef<Path>, M: AsRef<Path>>(path: P, model_dir: M) -> Result<Self, DatasetError> {
        Self::new(Box::new(OxfordDataset::load(path, model_dir)?))
    }

    pub fn new(dataset: Box<dyn Dataset>) -> Result<Self, DatasetError> {
        let timestamps = (0..dataset.len())
            .map(|index| dataset.get(index).map(|item| item.timestamp))
            .collect::<Result<Vec<f64>, DatasetError>>()?;

        if timestamps.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(DatasetError::Parser(format!(
                "{}: frames are not in time order",
                dataset.path().display()
            )));
        }

        let start = timestamps.first().copied().unwrap_or_default();
        Ok(Self {
            elapsed: timestamps.iter().map(|t| t - start).collect(),
            zoom: DEFAULT_ZOOM,
            dataset,
        })
    }

    /// Number of frames.
    pub fn size(&self) -> usize {
        self.elapsed.len()
    }

    /// Seconds between the first and the last frame.
    pub fn duration(&self) -> f64 {
        self.elapsed.last().copied().unwrap_or_default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom ratio used by frames looked up afterwards.
    /// The ratio must be finite and positive, otherwise the previous one is kept.
    pub fn set_zoom(&mut self, ratio: f64) -> Result<(), DatasetError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(DatasetError::InvalidParameter(format!(
                "Zoom ratio must be a positive number, got {ratio}"
            )));
        }
        self.zoom = ratio;
        Ok(())
    }

    pub fn frame_at(&self, index: usize) -> Result<Frame<'_>, DatasetError> {
        if index >= self.size() {
            return Err(DatasetError::IndexOutOfRange {
                index,
                len: self.size(),
            });
        }

        let item = self.dataset.get(index)?;
        Ok(Frame {
            index,
            timestamp: item.timestamp,
            pose: item.pose,
            zoom: self.zoom,
            dataset: self.dataset.as_ref(),
        })
    }

    /// Index of the frame recorded closest to `seconds` after the first one.
    /// Ties go to the earlier frame.
    pub fn index_at_time(&self, seconds: f64) -> Result<usize, DatasetError> {
        if self.elapsed.is_empty() || !(0.0..=self.duration()).contains(&seconds) {
            return Err(DatasetError::TimeOutOfRange {
                seconds,
                duration: self.duration(),
            });
        }

        let next = self.elapsed.partition_point(|t| *t < seconds);
        if next == 0 {
            return Ok(0);
        }
        let before = seconds - self.elapsed[next - 1];
        let after = self.elapsed[next] - seconds;
        Ok(if before <= after { next - 1 } else { next })
    }

    pub fn frame_at_time(&self, seconds: f64) -> Result<Frame<'_>, DatasetError> {
        self.frame_at(self.index_at_time(seconds)?)
    }

    /// Timestamps and ground-truth poses of every frame, without decoding images.
    pub fn trajectory(&self) -> Result<Trajectory, DatasetError> {
        (0..self.size())
            .map(|index| self.dataset.get(index).map(|item| (item.pose, item.timestamp)))
            .collect()
    }

    pub fn path(&self) -> &Path {
        self.dataset.path()
    }

    /// Last component of the dataset path without extension.
    pub fn base_name(&self) -> String {
        self.path()
            .file_stem()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Drop for DatasetCursor {
    fn drop(&mut self) {
        log::debug!("Releasing dataset {}", self.path().display());
    }
}
