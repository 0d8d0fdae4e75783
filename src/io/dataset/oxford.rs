use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use image::RgbImage;
use nalgebra::Vector3;
use serde_derive::Deserialize;

use crate::{camera::CameraIntrinsics, pose::Pose, trajectory::Trajectory};

use super::{Dataset, DatasetError, DatasetItem};

const TIMESTAMPS_FILE: &str = "stereo.timestamps";
const IMAGE_DIR: &str = "stereo/centre";
const INS_FILE: &str = "gps/ins.csv";
const CAMERA_MODEL_FILE: &str = "stereo_narrow_left.txt";

/// Reader for Oxford RobotCar style recordings. Available at:
///  https://robotcar-dataset.robots.ox.ac.uk.
///
/// Frames are the centre stereo camera images listed in `stereo.timestamps`,
/// ground-truth poses come from the INS log interpolated at each frame time
/// and the intrinsics from the camera model directory.
pub struct OxfordDataset {
    base_dir: PathBuf,
    stamps: Vec<u64>,
    trajectory: Trajectory,
    camera: CameraIntrinsics,
}

#[derive(Deserialize, Debug)]
struct InsRecord {
    timestamp: u64,
    northing: f64,
    easting: f64,
    down: f64,
    roll: f64,
    pitch: f64,
    yaw: f64,
}

fn micros_to_seconds(stamp: u64) -> f64 {
    stamp as f64 / 1.0e6
}

fn read_timestamps(filepath: &Path) -> Result<Vec<u64>, DatasetError> {
    let file = std::fs::File::open(filepath)?;
    let reader = std::io::BufReader::new(file);
    let mut stamps = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let stamp = token.parse::<u64>().map_err(|err| {
            DatasetError::Parser(format!("{}:{}: {err}", filepath.display(), n + 1))
        })?;
        stamps.push(stamp);
    }

    if stamps.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(DatasetError::Parser(format!(
            "{}: timestamps are not in recording order",
            filepath.display()
        )));
    }
    Ok(stamps)
}

fn read_ins(filepath: &Path) -> Result<Vec<(f64, Pose)>, DatasetError> {
    let mut reader = csv::Reader::from_path(filepath)?;
    let mut samples = reader
        .deserialize::<InsRecord>()
        .map(|record| {
            record.map(|r| {
                (
                    micros_to_seconds(r.timestamp),
                    Pose::from_euler(
                        &Vector3::new(r.northing, r.easting, r.down),
                        r.roll,
                        r.pitch,
                        r.yaw,
                    ),
                )
            })
        })
        .collect::<Result<Vec<_>, csv::Error>>()?;

    if samples.is_empty() {
        return Err(DatasetError::Parser(format!(
            "{}: no INS samples",
            filepath.display()
        )));
    }
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(samples)
}

fn read_camera_model(filepath: &Path) -> Result<CameraIntrinsics, DatasetError> {
    let content = std::fs::read_to_string(filepath)?;
    let values = content
        .lines()
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .map(|token| token.parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|err| DatasetError::Parser(format!("{}: {err}", filepath.display())))?;

    match values[..] {
        [fx, fy, cx, cy, ..] => Ok(CameraIntrinsics::from_simple_intrinsic(fx, fy, cx, cy)),
        _ => Err(DatasetError::Parser(format!(
            "{}: expected `fx fy cx cy`",
            filepath.display()
        ))),
    }
}

/// Pose at `time`, interpolated between the bracketing samples and clamped
/// to the first and last ones outside of the sampled span.
fn interpolate_pose(samples: &[(f64, Pose)], time: f64) -> Pose {
    let next = samples.partition_point(|(t, _)| *t < time);
    if next == 0 {
        return samples[0].1.clone();
    }
    if next == samples.len() {
        return samples[samples.len() - 1].1.clone();
    }

    let (t0, pose0) = &samples[next - 1];
    let (t1, pose1) = &samples[next];
    let ratio = if t1 > t0 { (time - t0) / (t1 - t0) } else { 0.0 };
    pose0.interpolate(pose1, ratio)
}

impl OxfordDataset {
    pub fn load<P: AsRef<Path>, M: AsRef<Path>>(
        base_dirpath: P,
        model_dirpath: M,
    ) -> Result<Self, DatasetError> {
        let base_dir = std::fs::canonicalize(base_dirpath)?;
        let stamps = read_timestamps(&base_dir.join(TIMESTAMPS_FILE))?;
        let ins = read_ins(&base_dir.join(INS_FILE))?;
        let camera = read_camera_model(&model_dirpath.as_ref().join(CAMERA_MODEL_FILE))?;

        let trajectory = stamps
            .iter()
            .map(|stamp| {
                let time = micros_to_seconds(*stamp);
                (interpolate_pose(&ins, time), time)
            })
            .collect::<Trajectory>();

        Ok(Self {
            base_dir,
            stamps,
            trajectory,
            camera,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), DatasetError> {
        if index >= self.len() {
            return Err(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

impl Dataset for OxfordDataset {
    fn len(&self) -> usize {
        self.stamps.len()
    }

    fn get(&self, index: usize) -> Result<DatasetItem, DatasetError> {
        self.check_index(index)?;
        Ok(DatasetItem {
            timestamp: self.trajectory.times[index],
            pose: self.trajectory[index].clone(),
        })
    }

    fn image(&self, index: usize) -> Result<RgbImage, DatasetError> {
        self.check_index(index)?;
        let filepath = self
            .base_dir
            .join(IMAGE_DIR)
            .join(format!("{}.png", self.stamps[index]));
        Ok(image::open(filepath)?.into_rgb8())
    }

    fn camera(&self) -> Option<CameraIntrinsics> {
        Some(self.camera.clone())
    }

    fn path(&self) -> &Path {
        &self.base_dir
    }
}
