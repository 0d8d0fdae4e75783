use std::path::Path;

use itertools::Itertools;

use crate::{pose::Pose, trajectory::Trajectory};

/// Significant digits written for positions and orientations.
const PRECISION: i32 = 10;

/// Whether each row starts with the pose timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampColumn {
    Include,
    Omit,
}

/// Formats a scalar with 10 significant digits in fixed notation, trailing
/// zeros trimmed.
pub fn format_scalar(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let text = if magnitude >= PRECISION {
        let step = 10f64.powi(magnitude + 1 - PRECISION);
        format!("{:.0}", (value / step).round() * step)
    } else {
        let decimals = (PRECISION - 1 - magnitude) as usize;
        format!("{value:.decimals$}")
    };

    if !text.contains('.') {
        return text;
    }
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn pose_row(pose: &Pose) -> String {
    pose.position_array()
        .into_iter()
        .chain(pose.orientation_array())
        .map(format_scalar)
        .join(" ")
}

/// Writes one line per pose: `x y z qx qy qz qw`, optionally prefixed by the
/// timestamp in seconds with microsecond resolution.
///
/// The whole content is rendered before the destination is created, so a
/// failure never leaves a partially written file behind. An existing file is
/// truncated.
pub fn write_trajectory<P>(
    filepath: P,
    trajectory: &Trajectory,
    timestamps: TimestampColumn,
) -> Result<usize, std::io::Error>
where
    P: AsRef<Path>,
{
    let mut content = String::new();
    for (pose, time) in trajectory.iter() {
        if timestamps == TimestampColumn::Include {
            content.push_str(&format!("{time:.6} "));
        }
        content.push_str(&pose_row(pose));
        content.push('\n');
    }

    std::fs::write(filepath, content)?;
    Ok(trajectory.len())
}
