use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::error::Error;

/// Number of neighbouring keyframes used by the matcher when none is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

const MAP_TRAJECTORY_FILE: &str = "dump_map_trajectory.csv";
const DATASET_TRAJECTORY_PREFIX: &str = "dump_dataset_trajectory";
const IMAGE_DUMP_FILE: &str = "dump_image.png";

/// Settings of the evaluation loop.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory receiving the dumped artifacts.
    pub scratch_dir: PathBuf,
    /// Window size passed to the sequence matcher by `find`.
    pub window_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl HarnessConfig {
    /// Reads a JSON settings file. Missing fields take their default value.
    pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, Error> {
        let buffer = std::io::BufReader::new(std::fs::File::open(filepath.as_ref())?);
        let config: HarnessConfig = serde_json::from_reader(buffer).map_err(|err| {
            Error::invalid_parameter(format!("{}: {err}", filepath.as_ref().display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.window_size == 0 {
            return Err(Error::invalid_parameter("Window size must be positive"));
        }
        Ok(())
    }

    pub fn map_trajectory_path(&self) -> PathBuf {
        self.scratch_dir.join(MAP_TRAJECTORY_FILE)
    }

    pub fn dataset_trajectory_path(&self, dataset_name: &str) -> PathBuf {
        self.scratch_dir
            .join(format!("{DATASET_TRAJECTORY_PREFIX}-{dataset_name}"))
    }

    pub fn image_dump_path(&self) -> PathBuf {
        self.scratch_dir.join(IMAGE_DUMP_FILE)
    }
}
