//! Sequence matching against the keyframes of a map.
mod seqslam;
pub use seqslam::{descriptor, SeqSlamMatcher, DEFAULT_DESCRIPTOR_SIZE};

use image::GrayImage;

use crate::{error::Error, pose::Pose};

/// Best map location found for a query sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMatch {
    /// Index of the map keyframe aligned with the last query image.
    pub keyframe: usize,
    pub timestamp: f64,
    pub pose: Pose,
    /// Sequence score, lower is better.
    pub score: f32,
}

pub trait SequenceMatcher {
    /// Searches the map for the location that best matches `queries`, the last
    /// image being the most recent one.
    ///
    /// # Arguments
    ///
    /// * `queries` - Single channel query images, oldest first.
    /// * `window_size` - Number of neighbouring keyframes considered when
    ///   normalizing the image differences.
    ///
    /// # Returns
    ///
    /// * The best match, or `None` when the map cannot hold the query sequence.
    fn find(
        &self,
        queries: &[GrayImage],
        window_size: usize,
    ) -> Result<Option<SequenceMatch>, Error>;
}
