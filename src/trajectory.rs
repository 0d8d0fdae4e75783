use std::ops::Index;

use crate::pose::Pose;

/// Trajectory of camera poses, kept in recording order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// Camera poses in the world frame.
    pub poses: Vec<Pose>,
    /// Timestamp of each pose in seconds.
    pub times: Vec<f64>,
}

impl Trajectory {
    /// Adds a new pose to the trajectory.
    ///
    /// # Arguments
    ///
    /// * `pose` - Camera pose.
    /// * `time` - Timestamp of the pose.
    pub fn push(&mut self, pose: Pose, time: f64) {
        self.poses.push(pose);
        self.times.push(time);
    }

    /// Returns the number of poses in the trajectory.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns true if the trajectory is empty.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Returns the iterator over poses and timestamps.
    pub fn iter(&self) -> impl Iterator<Item = (&Pose, f64)> + '_ {
        self.poses.iter().zip(self.times.iter().copied())
    }
}

impl FromIterator<(Pose, f64)> for Trajectory {
    /// Creates a new trajectory from the `(Pose, f64)` iterator.
    /// Use with the `collect::<Trajectory>` method.
    fn from_iter<T: IntoIterator<Item = (Pose, f64)>>(iter: T) -> Self {
        let mut trajectory = Trajectory::default();
        for (pose, time) in iter {
            trajectory.push(pose, time);
        }
        trajectory
    }
}

impl Index<usize> for Trajectory {
    type Output = Pose;
    /// Returns the pose at the given index.
    fn index(&self, index: usize) -> &Self::Output {
        &self.poses[index]
    }
}
