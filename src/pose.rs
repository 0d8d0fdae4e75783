use std::ops;

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

/// Rigid camera pose: position in the world frame and the camera orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose(Isometry3<f64>);

impl Pose {
    /// Creates a pose from a position and a (not necessarily normalized) quaternion.
    pub fn new(position: &Vector3<f64>, orientation: &Quaternion<f64>) -> Self {
        Self(Isometry3::from_parts(
            Translation3::from(*position),
            UnitQuaternion::from_quaternion(*orientation),
        ))
    }

    /// Creates a pose from a position and roll, pitch and yaw angles in radians.
    pub fn from_euler(position: &Vector3<f64>, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self(Isometry3::from_parts(
            Translation3::from(*position),
            UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        ))
    }

    pub fn position(&self) -> Vector3<f64> {
        self.0.translation.vector
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.0.rotation
    }

    /// Position as `[x, y, z]`.
    pub fn position_array(&self) -> [f64; 3] {
        let p = self.position();
        [p.x, p.y, p.z]
    }

    /// Orientation as `[x, y, z, w]`.
    pub fn orientation_array(&self) -> [f64; 4] {
        let q = self.orientation();
        [q.i, q.j, q.k, q.w]
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// Rotation angle in radians.
    pub fn angle(&self) -> f64 {
        self.0.rotation.angle()
    }

    /// Interpolates between `self` (t = 0) and `other` (t = 1).
    /// Position is linearly interpolated and orientation is slerped.
    pub fn interpolate(&self, other: &Pose, t: f64) -> Pose {
        let position = self.position().lerp(&other.position(), t);
        let rotation = self
            .0
            .rotation
            .try_slerp(&other.0.rotation, t, 1.0e-9)
            .unwrap_or(self.0.rotation);
        Self(Isometry3::from_parts(Translation3::from(position), rotation))
    }
}

impl ops::Mul<&Pose> for &Pose {
    type Output = Pose;

    fn mul(self, rhs: &Pose) -> Self::Output {
        Pose(self.0 * rhs.0)
    }
}
