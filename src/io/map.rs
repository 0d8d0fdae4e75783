use std::{io::Write, path::Path};

use nalgebra::{Quaternion, Vector3};
use serde_derive::{Deserialize, Serialize};

use crate::{
    matching::{SeqSlamMatcher, SequenceMatcher},
    pose::Pose,
    trajectory::Trajectory,
};

#[derive(Debug)]
pub enum MapError {
    Io(std::io::Error),
    Parser(String),
    /// The document parsed but its content is inconsistent.
    Format(String),
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::Io(err)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Parser(err.to_string())
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io(err) => Some(err),
            MapError::Parser(_) => None,
            MapError::Format(_) => None,
        }
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MapError::Io(err) => write!(f, "IO error: {err}"),
            MapError::Parser(err) => write!(f, "Parser error: {err}"),
            MapError::Format(err) => write!(f, "Format error: {err}"),
        }
    }
}

/// A loaded map: the camera trajectory it was built from and its image
/// retrieval service.
pub trait LocalizationMap {
    /// Camera poses in the order they were stored.
    fn camera_poses(&self) -> Trajectory;
    fn sequence_matcher(&self) -> &dyn SequenceMatcher;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub timestamp: f64,
    /// `[x, y, z]`
    pub position: [f64; 3],
    /// `[x, y, z, w]`
    pub orientation: [f64; 4],
    pub descriptor: Vec<f32>,
}

impl Keyframe {
    pub fn new(timestamp: f64, pose: &Pose, descriptor: Vec<f32>) -> Self {
        Self {
            timestamp,
            position: pose.position_array(),
            orientation: pose.orientation_array(),
            descriptor,
        }
    }

    pub fn pose(&self) -> Pose {
        let [x, y, z] = self.position;
        let [qx, qy, qz, qw] = self.orientation;
        Pose::new(&Vector3::new(x, y, z), &Quaternion::new(qw, qx, qy, qz))
    }
}

/// Largest descriptor, in values, a map may hold per keyframe.
pub const MAX_DESCRIPTOR_VALUES: usize = 1 << 20;

/// Number of values of a descriptor of `size`, rejecting empty or oversized ones.
pub fn descriptor_length(size: (u32, u32)) -> Result<usize, MapError> {
    match (size.0 as usize).checked_mul(size.1 as usize) {
        Some(0) => Err(MapError::Format("Empty descriptor size".to_string())),
        Some(length) if length <= MAX_DESCRIPTOR_VALUES => Ok(length),
        _ => Err(MapError::Format(format!(
            "Descriptor size {}x{} exceeds {MAX_DESCRIPTOR_VALUES} values",
            size.0, size.1
        ))),
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct Document {
    descriptor_size: (u32, u32),
    keyframes: Vec<Keyframe>,
}

/// Map made of keyframes with thumbnail descriptors, stored as JSON.
pub struct KeyframeMap {
    document: Document,
    matcher: SeqSlamMatcher,
}

impl KeyframeMap {
    pub fn new(descriptor_size: (u32, u32), keyframes: Vec<Keyframe>) -> Result<Self, MapError> {
        let expected = descriptor_length(descriptor_size)?;
        if let Some((n, keyframe)) = keyframes
            .iter()
            .enumerate()
            .find(|(_, keyframe)| keyframe.descriptor.len() != expected)
        {
            return Err(MapError::Format(format!(
                "Keyframe {n} has {} descriptor values, expected {expected}",
                keyframe.descriptor.len()
            )));
        }

        let matcher = SeqSlamMatcher::new(
            descriptor_size,
            keyframes.iter().map(|kf| kf.descriptor.clone()).collect(),
            keyframes.iter().map(|kf| (kf.pose(), kf.timestamp)).collect(),
        );
        Ok(Self {
            document: Document {
                descriptor_size,
                keyframes,
            },
            matcher,
        })
    }

    pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, MapError> {
        let buffer = std::io::BufReader::new(std::fs::File::open(filepath)?);
        let document: Document = serde_json::from_reader(buffer)?;
        Self::new(document.descriptor_size, document.keyframes)
    }

    pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<(), MapError> {
        let mut buffer = std::io::BufWriter::new(std::fs::File::create(filepath)?);
        serde_json::to_writer(&mut buffer, &self.document)?;
        buffer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.document.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.keyframes.is_empty()
    }

    pub fn descriptor_size(&self) -> (u32, u32) {
        self.document.descriptor_size
    }
}

impl LocalizationMap for KeyframeMap {
    fn camera_poses(&self) -> Trajectory {
        self.document
            .keyframes
            .iter()
            .map(|kf| (kf.pose(), kf.timestamp))
            .collect()
    }

    fn sequence_matcher(&self) -> &dyn SequenceMatcher {
        &self.matcher
    }
}
