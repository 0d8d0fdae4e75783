use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use image::{Rgb, RgbImage};
use nalgebra::Vector3;
use rstest::fixture;
use tempfile::TempDir;

use crate::{
    camera::CameraIntrinsics,
    io::dataset::{Dataset, DatasetError, DatasetItem},
    pose::Pose,
};

/// Dataset held in memory, with 40x20 frames recorded `elapsed` seconds after
/// t = 1000s.
pub struct MemoryDataset {
    path: PathBuf,
    items: Vec<DatasetItem>,
}

impl MemoryDataset {
    pub fn new<P: AsRef<Path>>(path: P, elapsed: &[f64]) -> Self {
        let items = elapsed
            .iter()
            .enumerate()
            .map(|(i, seconds)| DatasetItem {
                timestamp: 1000.0 + seconds,
                pose: Pose::from_euler(&Vector3::new(*seconds, i as f64, 0.0), 0.0, 0.0, 0.1 * i as f64),
            })
            .collect();
        Self {
            path: path.as_ref().to_path_buf(),
            items,
        }
    }

    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = path.as_ref().to_path_buf();
    }
}

impl Dataset for MemoryDataset {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Result<DatasetItem, DatasetError> {
        self.items
            .get(index)
            .cloned()
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
    }

    fn image(&self, index: usize) -> Result<RgbImage, DatasetError> {
        self.get(index)?;
        Ok(RgbImage::from_fn(40, 20, |x, y| {
            Rgb([(x * 6) as u8, (y * 12) as u8, (index * 10 % 256) as u8])
        }))
    }

    fn camera(&self) -> Option<CameraIntrinsics> {
        Some(CameraIntrinsics::from_simple_intrinsic(100.0, 100.0, 20.0, 10.0))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[fixture]
pub fn sample_memory_dataset() -> MemoryDataset {
    MemoryDataset::new(
        "/data/oxford/2015-01-01",
        &[
            0.0, 0.5, 1.0, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 8.0, 12.0, 13.0, 100.0, 300.0,
        ],
    )
}

/// Oxford style recording written to a temporary directory.
pub struct SampleDataset {
    _dir: TempDir,
    pub base_dir: PathBuf,
    pub model_dir: PathBuf,
    pub frames: usize,
}

/// Frames every 0.5s, INS samples every second moving 10m north per second.
#[fixture]
pub fn sample_oxford_dataset() -> SampleDataset {
    const FRAMES: usize = 8;
    const START: u64 = 1_418_132_462_000_000;

    let dir = tempfile::tempdir().unwrap();
    let base_dir = dir.path().join("2014-12-09-13-21-02");
    let model_dir = dir.path().join("models");
    std::fs::create_dir_all(base_dir.join("stereo/centre")).unwrap();
    std::fs::create_dir_all(base_dir.join("gps")).unwrap();
    std::fs::create_dir_all(&model_dir).unwrap();

    let mut timestamps = String::new();
    for i in 0..FRAMES {
        let stamp = START + i as u64 * 500_000;
        writeln!(timestamps, "{stamp} 1").unwrap();
        RgbImage::from_fn(16, 12, |x, y| Rgb([(x * 16) as u8, (y * 20) as u8, (i * 30) as u8]))
            .save(base_dir.join(format!("stereo/centre/{stamp}.png")))
            .unwrap();
    }
    std::fs::write(base_dir.join("stereo.timestamps"), timestamps).unwrap();

    let mut ins = String::from(
        "timestamp,ins_status,latitude,longitude,altitude,northing,easting,down,utm_zone,\
         velocity_north,velocity_east,velocity_down,roll,pitch,yaw\n",
    );
    for k in 0..=FRAMES / 2 + 1 {
        writeln!(
            ins,
            "{},INS_SOLUTION_GOOD,51.76,-1.26,110.0,{},{},0.0,30U,10.0,0.0,0.0,0.0,0.0,0.0",
            START + k as u64 * 1_000_000,
            10 * k,
            -2.0 * k as f64
        )
        .unwrap();
    }
    std::fs::write(base_dir.join("gps/ins.csv"), ins).unwrap();

    std::fs::write(
        model_dir.join("stereo_narrow_left.txt"),
        "400.0 400.0 8.0 6.0\n1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n",
    )
    .unwrap();

    SampleDataset {
        _dir: dir,
        base_dir,
        model_dir,
        frames: FRAMES,
    }
}
