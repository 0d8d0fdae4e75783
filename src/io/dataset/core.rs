use std::{io::Error, path::Path};

use image::{ImageError, RgbImage};

use crate::{camera::CameraIntrinsics, pose::Pose};

#[derive(Debug)]
pub enum DatasetError {
    Io(Error),
    Parser(String),
    Image(ImageError),
    IndexOutOfRange { index: usize, len: usize },
    /// Elapsed time outside `[0, duration]`.
    TimeOutOfRange { seconds: f64, duration: f64 },
    InvalidParameter(String),
}

impl From<Error> for DatasetError {
    fn from(err: Error) -> Self {
        DatasetError::Io(err)
    }
}

impl From<ImageError> for DatasetError {
    fn from(err: ImageError) -> Self {
        DatasetError::Image(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Parser(err.to_string())
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "IO error: {err}"),
            DatasetError::Parser(err) => write!(f, "Parser error: {err}"),
            DatasetError::Image(err) => write!(f, "Image error: {err}"),
            DatasetError::IndexOutOfRange { index, len } => {
                write!(f, "Frame index {index} out of range [0, {len})")
            }
            DatasetError::TimeOutOfRange { seconds, duration } => {
                write!(f, "Time {seconds}s out of range [0, {duration}]s")
            }
            DatasetError::InvalidParameter(err) => write!(f, "Parameter error: {err}"),
        }
    }
}

/// Metadata of a recorded frame: its timestamp in seconds and ground-truth pose.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetItem {
    pub timestamp: f64,
    pub pose: Pose,
}

/// Store of recorded camera frames, in recording order.
pub trait Dataset {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Timestamp and pose of a frame. Must not decode the image.
    fn get(&self, index: usize) -> Result<DatasetItem, DatasetError>;
    /// Decodes the unscaled color image of a frame.
    fn image(&self, index: usize) -> Result<RgbImage, DatasetError>;
    fn camera(&self) -> Option<CameraIntrinsics>;
    /// Source directory of the dataset.
    fn path(&self) -> &Path;
}
