use image::{imageops::FilterType, GrayImage};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::{error::Error, trajectory::Trajectory};

use super::{SequenceMatch, SequenceMatcher};

/// Width and height of the thumbnails compared by the matcher.
pub const DEFAULT_DESCRIPTOR_SIZE: (u32, u32) = (64, 32);

const MIN_DEVIATION: f32 = 1.0e-6;

fn mean_and_deviation(values: &[f32]) -> (f32, f32) {
    let count = values.len() as f32;
    let mean = values.iter().sum::<f32>() / count;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / count;
    (mean, variance.sqrt())
}

/// Patch normalized thumbnail of an image.
///
/// The image is resized to `size` and shifted to zero mean and unit deviation,
/// so global illumination changes do not affect the comparison.
pub fn descriptor(image: &GrayImage, size: (u32, u32)) -> Vec<f32> {
    let thumbnail = image::imageops::resize(image, size.0, size.1, FilterType::Triangle);
    let values = thumbnail.pixels().map(|p| p[0] as f32).collect::<Vec<f32>>();
    let (mean, deviation) = mean_and_deviation(&values);
    if deviation < MIN_DEVIATION {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / deviation).collect()
}

/// Normalizes each difference by the statistics of its `window` neighbours.
fn enhance_contrast(differences: &[f32], window: usize) -> Vec<f32> {
    let half = window / 2;
    (0..differences.len())
        .map(|k| {
            let local = &differences[k.saturating_sub(half)..(k + half + 1).min(differences.len())];
            let (mean, deviation) = mean_and_deviation(local);
            (differences[k] - mean) / deviation.max(MIN_DEVIATION)
        })
        .collect()
}

/// SeqSLAM style matcher over the keyframe thumbnails of a map.
///
/// Assumes the query sequence was recorded at the same speed as the map, so
/// query `i` of `n` is aligned with keyframe `end - (n - 1 - i)`.
pub struct SeqSlamMatcher {
    descriptor_size: (u32, u32),
    descriptors: Vec<Vec<f32>>,
    keyframes: Trajectory,
}

impl SeqSlamMatcher {
    pub fn new(
        descriptor_size: (u32, u32),
        descriptors: Vec<Vec<f32>>,
        keyframes: Trajectory,
    ) -> Self {
        debug_assert_eq!(descriptors.len(), keyframes.len());
        Self {
            descriptor_size,
            descriptors,
            keyframes,
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Mean absolute difference between the query and every keyframe.
    fn differences(&self, query: &[f32]) -> Vec<f32> {
        self.descriptors
            .par_iter()
            .map(|keyframe| {
                keyframe
                    .iter()
                    .zip(query)
                    .map(|(a, b)| (a - b).abs())
                    .sum::<f32>()
                    / query.len().max(1) as f32
            })
            .collect()
    }
}

impl SequenceMatcher for SeqSlamMatcher {
    fn find(
        &self,
        queries: &[GrayImage],
        window_size: usize,
    ) -> Result<Option<SequenceMatch>, Error> {
        if queries.is_empty() {
            return Err(Error::invalid_parameter("Empty query sequence"));
        }
        if window_size == 0 {
            return Err(Error::invalid_parameter("Window size must be positive"));
        }

        let length = queries.len();
        if self.len() < length {
            return Ok(None);
        }

        let enhanced = queries
            .iter()
            .map(|query| {
                let differences = self.differences(&descriptor(query, self.descriptor_size));
                enhance_contrast(&differences, window_size)
            })
            .collect::<Vec<Vec<f32>>>();

        let best = (length - 1..self.len())
            .map(|end| {
                let score = enhanced
                    .iter()
                    .enumerate()
                    .map(|(i, row)| row[end + i + 1 - length])
                    .sum::<f32>();
                (end, score)
            })
            .min_by_key(|(_, score)| OrderedFloat(*score));

        Ok(best.map(|(end, score)| SequenceMatch {
            keyframe: end,
            timestamp: self.keyframes.times[end],
            pose: self.keyframes[end].clone(),
            score,
        }))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::*;
    use crate::pose::Pose;

    fn pattern(k: u32) -> GrayImage {
        GrayImage::from_fn(32, 16, |x, y| {
            image::Luma([((x * (k + 1) + y * (2 * k + 3) + k * k) % 251) as u8])
        })
    }

    fn sample_matcher(count: u32) -> SeqSlamMatcher {
        let descriptors = (0..count)
            .map(|k| descriptor(&pattern(k), (32, 16)))
            .collect();
        let keyframes = (0..count)
            .map(|k| {
                (
                    Pose::from_euler(&Vector3::new(k as f64, 0.0, 0.0), 0.0, 0.0, 0.0),
                    k as f64 * 0.5,
                )
            })
            .collect::<Trajectory>();
        SeqSlamMatcher::new((32, 16), descriptors, keyframes)
    }

    #[test]
    fn test_descriptor_is_normalized() {
        let values = descriptor(&pattern(3), (16, 8));
        assert_eq!(values.len(), 128);
        let (mean, deviation) = mean_and_deviation(&values);
        assert!(mean.abs() < 1e-4);
        assert!((deviation - 1.0).abs() < 1e-4);

        let flat = descriptor(&GrayImage::from_pixel(8, 8, image::Luma([90])), (4, 4));
        assert!(flat.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_find_single_query() {
        let matcher = sample_matcher(8);
        let result = matcher.find(&[pattern(5)], 20).unwrap().unwrap();
        assert_eq!(result.keyframe, 5);
        assert_eq!(result.timestamp, 2.5);
        assert_eq!(result.pose.position().x, 5.0);
    }

    #[test]
    fn test_find_sequence() {
        let matcher = sample_matcher(8);
        let queries = [pattern(2), pattern(3), pattern(4)];
        let result = matcher.find(&queries, 20).unwrap().unwrap();
        assert_eq!(result.keyframe, 4);
    }

    #[test]
    fn test_find_too_short_map() {
        let matcher = sample_matcher(2);
        let queries = [pattern(0), pattern(1), pattern(1)];
        assert_eq!(matcher.find(&queries, 10).unwrap(), None);
    }

    #[test]
    fn test_find_invalid_arguments() {
        let matcher = sample_matcher(2);
        assert!(matcher.find(&[], 10).is_err());
        assert!(matcher.find(&[pattern(0)], 0).is_err());
    }

    #[test]
    fn test_enhance_contrast() {
        let enhanced = enhance_contrast(&[1.0, 1.0, 1.0, 0.0], 10);
        assert!(enhanced[3] < enhanced[0]);
        assert_eq!(enhance_contrast(&[2.0], 1), vec![0.0]);
    }
}
