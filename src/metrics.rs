use crate::pose::Pose;

/// Metrics for comparing two poses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformMetrics {
    /// Angle between the two orientations in radians.
    pub angle: f64,
    /// Distance between the two positions.
    pub translation: f64,
}

impl TransformMetrics {
    /// Creates a new `TransformMetrics` from two poses.
    pub fn new(lfs: &Pose, rhs: &Pose) -> Self {
        let diff = &lfs.inverse() * rhs;

        Self {
            angle: diff.angle(),
            translation: (rhs.position() - lfs.position()).norm(),
        }
    }

    /// Returns the total error of the two poses.
    pub fn total(&self) -> f64 {
        self.angle + self.translation
    }
}

impl std::fmt::Display for TransformMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "angle: {:.2}°, translation: {:.5}",
            self.angle.to_degrees(),
            self.translation
        )
    }
}
