//! Command driven evaluation loop.
//!
//! The [`Localizer`] owns at most one map and one dataset. Each command is
//! executed to completion before the next line is read, and a failing command
//! only produces a diagnostic line: the loop ends on `quit` or end of input.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    command::{Command, COMMANDS},
    config::HarnessConfig,
    cursor::DatasetCursor,
    error::{Error, Session},
    io::{write_trajectory, TimestampColumn},
    matching::SequenceMatch,
    metrics::TransformMetrics,
    session::MapSession,
    tokenizer::tokenize,
};

/// Opens maps and datasets for the loop.
pub trait SessionBackend {
    fn open_map(&self, path: &Path) -> Result<MapSession, Error>;
    fn open_dataset(&self, path: &Path, model_dir: &Path) -> Result<DatasetCursor, Error>;
}

/// Keyframe map files and Oxford style recordings on disk.
pub struct FileBackend;

impl SessionBackend for FileBackend {
    fn open_map(&self, path: &Path) -> Result<MapSession, Error> {
        Ok(MapSession::open(path)?)
    }

    fn open_dataset(&self, path: &Path, model_dir: &Path) -> Result<DatasetCursor, Error> {
        Ok(DatasetCursor::open(path, model_dir)?)
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    MapLoaded {
        path: PathBuf,
        keyframes: usize,
    },
    DatasetLoaded {
        path: PathBuf,
        frames: usize,
        duration: f64,
    },
    TrajectoryDumped {
        path: PathBuf,
        rows: usize,
    },
    Matched {
        /// Index of the query frame in the dataset.
        frame: usize,
        timestamp: f64,
        found: Option<SequenceMatch>,
        /// Pose error of the match against the query ground truth.
        error: Option<TransformMetrics>,
    },
    ImageSaved {
        path: PathBuf,
    },
    ZoomSet {
        ratio: f64,
    },
    Help,
    Quit,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::MapLoaded { path, keyframes } => {
                write!(f, "Map loaded: {} ({keyframes} keyframes)", path.display())
            }
            Report::DatasetLoaded {
                path,
                frames,
                duration,
            } => write!(
                f,
                "Dataset loaded: {} ({frames} frames, {duration:.3}s)",
                path.display()
            ),
            Report::TrajectoryDumped { path, rows } => {
                write!(f, "Trajectory dumped to {} ({rows} poses)", path.display())
            }
            Report::Matched {
                frame,
                timestamp,
                found: Some(found),
                error,
            } => {
                write!(
                    f,
                    "Frame {frame} ({timestamp:.6}) matches keyframe {} ({:.6}), score {:.4}",
                    found.keyframe, found.timestamp, found.score
                )?;
                if let Some(error) = error {
                    write!(f, ", error {error}")?;
                }
                Ok(())
            }
            Report::Matched {
                frame,
                timestamp,
                found: None,
                ..
            } => write!(f, "Frame {frame} ({timestamp:.6}) has no match"),
            Report::ImageSaved { path } => write!(f, "Dumped to {}", path.display()),
            Report::ZoomSet { ratio } => write!(f, "Zoom ratio set to {ratio}"),
            Report::Help => {
                write!(f, "Commands:")?;
                for spec in COMMANDS {
                    write!(f, "\n  {:<28} {}", spec.usage, spec.summary)?;
                }
                Ok(())
            }
            Report::Quit => write!(f, "Bye"),
        }
    }
}

pub struct Localizer {
    config: HarnessConfig,
    backend: Box<dyn SessionBackend>,
    map: Option<MapSession>,
    dataset: Option<DatasetCursor>,
}

impl Localizer {
    pub fn new(config: HarnessConfig, backend: Box<dyn SessionBackend>) -> Self {
        Self {
            config,
            backend,
            map: None,
            dataset: None,
        }
    }

    /// Loop reading maps and datasets from disk.
    pub fn with_files(config: HarnessConfig) -> Self {
        Self::new(config, Box::new(FileBackend))
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn map(&self) -> Option<&MapSession> {
        self.map.as_ref()
    }

    pub fn dataset(&self) -> Option<&DatasetCursor> {
        self.dataset.as_ref()
    }

    fn require_map(&self) -> Result<&MapSession, Error> {
        self.map.as_ref().ok_or(Error::SessionMissing(Session::Map))
    }

    fn require_dataset(&self) -> Result<&DatasetCursor, Error> {
        self.dataset
            .as_ref()
            .ok_or(Error::SessionMissing(Session::Dataset))
    }

    /// Reads commands from `lines` until `quit` or the end of the input,
    /// writing one line per outcome to `out`.
    pub fn run<I, W>(&mut self, lines: I, out: &mut W) -> std::io::Result<()>
    where
        I: IntoIterator<Item = String>,
        W: Write,
    {
        for line in lines {
            match self.execute_line(&line) {
                Ok(None) => {}
                Ok(Some(Report::Quit)) => break,
                Ok(Some(report)) => writeln!(out, "{report}")?,
                Err(err) => {
                    log::debug!("Command `{}` failed: {err:?}", line.trim());
                    writeln!(out, "{err}")?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Tokenizes, decodes and executes one line. Blank lines give `None`.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Report>, Error> {
        let tokens = tokenize(line)?;
        match Command::parse(&tokens)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Report, Error> {
        match command {
            Command::Map { path } => self.open_map(&path),
            Command::Dataset { path, model_dir } => self.open_dataset(&path, &model_dir),
            Command::DatasetTrajectory => self.dump_dataset_trajectory(),
            Command::MapTrajectory => self.dump_map_trajectory(),
            Command::Find { seconds } => self.find(seconds),
            Command::Save { seconds } => self.save_frame(seconds),
            Command::Zoom { ratio } => self.set_zoom(ratio),
            Command::Help => Ok(Report::Help),
            Command::Quit => Ok(Report::Quit),
        }
    }

    fn open_map(&mut self, path: &Path) -> Result<Report, Error> {
        if let Some(previous) = self.map.take() {
            log::info!("Closing map {}", previous.path().display());
        }

        let session = self.backend.open_map(path)?;
        let keyframes = session.camera_poses().len();
        self.map = Some(session);
        log::info!("Map loaded");
        Ok(Report::MapLoaded {
            path: path.to_path_buf(),
            keyframes,
        })
    }

    fn open_dataset(&mut self, path: &Path, model_dir: &Path) -> Result<Report, Error> {
        if let Some(previous) = self.dataset.take() {
            log::info!("Closing dataset {}", previous.path().display());
        }

        let cursor = self.backend.open_dataset(path, model_dir)?;
        let report = Report::DatasetLoaded {
            path: cursor.path().to_path_buf(),
            frames: cursor.size(),
            duration: cursor.duration(),
        };
        self.dataset = Some(cursor);
        log::info!("Dataset loaded");
        Ok(report)
    }

    fn dump_dataset_trajectory(&self) -> Result<Report, Error> {
        let dataset = self.require_dataset()?;
        let path = self.config.dataset_trajectory_path(&dataset.base_name());
        let rows = write_trajectory(&path, &dataset.trajectory()?, TimestampColumn::Include)?;
        log::info!("Dataset trajectory dumped to {}", path.display());
        Ok(Report::TrajectoryDumped { path, rows })
    }

    fn dump_map_trajectory(&self) -> Result<Report, Error> {
        let map = self.require_map()?;
        let path = self.config.map_trajectory_path();
        let rows = write_trajectory(&path, &map.camera_poses(), TimestampColumn::Omit)?;
        log::info!("Map trajectory dumped to {}", path.display());
        Ok(Report::TrajectoryDumped { path, rows })
    }

    fn find(&self, seconds: f64) -> Result<Report, Error> {
        let dataset = self.require_dataset()?;
        let map = self.require_map()?;

        let frame = dataset.frame_at_time(seconds)?;
        let query = image::imageops::grayscale(&frame.image()?);
        let found = map
            .sequence_matcher()
            .find(&[query], self.config.window_size)?;
        let error = found
            .as_ref()
            .map(|found| TransformMetrics::new(&frame.pose, &found.pose));

        Ok(Report::Matched {
            frame: frame.index,
            timestamp: frame.timestamp,
            found,
            error,
        })
    }

    fn save_frame(&self, seconds: f64) -> Result<Report, Error> {
        let dataset = self.require_dataset()?;
        let image = dataset.frame_at_time(seconds)?.image()?;
        let path = self.config.image_dump_path();
        image.save(&path)?;
        log::info!("Dumped to {}", path.display());
        Ok(Report::ImageSaved { path })
    }

    fn set_zoom(&mut self, ratio: f64) -> Result<Report, Error> {
        self.dataset
            .as_mut()
            .ok_or(Error::SessionMissing(Session::Dataset))?
            .set_zoom(ratio)?;
        Ok(Report::ZoomSet { ratio })
    }
}
