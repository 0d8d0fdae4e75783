use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use image::GrayImage;
use nalgebra::Vector3;
use rstest::fixture;

use crate::{
    error::Error,
    io::map::{Keyframe, LocalizationMap},
    matching::{SequenceMatch, SequenceMatcher},
    pose::Pose,
    trajectory::Trajectory,
};

#[fixture]
pub fn sample_keyframes() -> Vec<Keyframe> {
    [30.0, 10.0, 20.0]
        .iter()
        .enumerate()
        .map(|(i, time)| {
            Keyframe::new(
                *time,
                &Pose::from_euler(&Vector3::new(i as f64, -1.5, 0.25), 0.0, 0.0, 0.0),
                (0..8).map(|v| (v as f32 - i as f32) * 0.5).collect(),
            )
        })
        .collect()
}

/// What a [`FakeMap`] matcher was asked.
#[derive(Clone, Debug, Default)]
pub struct MatcherCalls {
    pub query_sizes: Vec<(u32, u32)>,
    pub window_sizes: Vec<usize>,
}

/// Map double recording matcher calls and its own release.
/// Keyframe `i` is at `(i, 2i, 0)` and `10i` seconds.
pub struct FakeMap {
    poses: Trajectory,
    calls: Rc<RefCell<MatcherCalls>>,
    releases: Rc<Cell<usize>>,
}

impl FakeMap {
    pub fn new(keyframes: usize, calls: Rc<RefCell<MatcherCalls>>, releases: Rc<Cell<usize>>) -> Self {
        let poses = (0..keyframes)
            .map(|i| {
                (
                    Pose::from_euler(&Vector3::new(i as f64, 2.0 * i as f64, 0.0), 0.0, 0.0, 0.0),
                    10.0 * i as f64,
                )
            })
            .collect();
        Self {
            poses,
            calls,
            releases,
        }
    }
}

impl Drop for FakeMap {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl LocalizationMap for FakeMap {
    fn camera_poses(&self) -> Trajectory {
        self.poses.clone()
    }

    fn sequence_matcher(&self) -> &dyn SequenceMatcher {
        self
    }
}

impl SequenceMatcher for FakeMap {
    fn find(
        &self,
        queries: &[GrayImage],
        window_size: usize,
    ) -> Result<Option<SequenceMatch>, Error> {
        let mut calls = self.calls.borrow_mut();
        calls
            .query_sizes
            .extend(queries.iter().map(|query| query.dimensions()));
        calls.window_sizes.push(window_size);

        Ok((!self.poses.is_empty()).then(|| SequenceMatch {
            keyframe: 0,
            timestamp: self.poses.times[0],
            pose: self.poses[0].clone(),
            score: 0.0,
        }))
    }
}
