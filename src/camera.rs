/// Camera intrinsic parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length and pixel scale in the X-axis.
    pub fx: f64,
    /// Focal length and pixel scale in the Y-axis.
    pub fy: f64,
    /// Camera X-center.
    pub cx: f64,
    /// Camera Y-center.
    pub cy: f64,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl CameraIntrinsics {
    pub fn from_simple_intrinsic(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width: None,
            height: None,
        }
    }

    /// Scale the camera parameters according to the given scale.
    ///
    /// # Arguments
    ///
    /// * scale: The scale factor.
    ///
    /// # Returns
    ///
    /// * A new camera with scaled parameters.
    pub fn scale(&self, scale: f64) -> Self {
        Self {
            fx: self.fx * scale,
            fy: self.fy * scale,
            cx: self.cx * scale,
            cy: self.cy * scale,
            width: self
                .width
                .and_then(|w| scaled_extent(u32::try_from(w).ok()?, scale))
                .map(|w| w as usize),
            height: self
                .height
                .and_then(|h| scaled_extent(u32::try_from(h).ok()?, scale))
                .map(|h| h as usize),
        }
    }

    pub fn size(&mut self, width: usize, height: usize) {
        self.width = Some(width);
        self.height = Some(height);
    }
}

/// Image extent after scaling, never collapsing to zero pixels.
/// `None` when the result does not fit in a `u32`.
pub fn scaled_extent(extent: u32, scale: f64) -> Option<u32> {
    let scaled = (extent as f64 * scale).round();
    if !scaled.is_finite() || scaled > u32::MAX as f64 {
        return None;
    }
    Some((scaled as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let mut camera = CameraIntrinsics::from_simple_intrinsic(400.0, 400.0, 320.0, 240.0);
        camera.size(640, 480);

        let zoomed = camera.scale(0.5);
        assert_eq!(zoomed.fx, 200.0);
        assert_eq!(zoomed.cy, 120.0);
        assert_eq!(zoomed.width, Some(320));
        assert_eq!(zoomed.height, Some(240));
    }

    #[test]
    fn test_scaled_extent_never_zero() {
        assert_eq!(scaled_extent(3, 0.01), Some(1));
        assert_eq!(scaled_extent(10, 1.5), Some(15));
    }

    #[test]
    fn test_scaled_extent_overflow() {
        assert_eq!(scaled_extent(40, 1.0e12), None);
        assert_eq!(scaled_extent(u32::MAX, 2.0), None);

        let mut camera = CameraIntrinsics::from_simple_intrinsic(400.0, 400.0, 320.0, 240.0);
        camera.size(640, 480);
        assert_eq!(camera.scale(1.0e12).width, None);
    }
}
