//! Hough circle detection producing barbell plate candidates.

use crate::{
    tracker::{Circle, CircleSearch},
    utils::safe_cast::f32_to_i32,
    Error, Result,
};
use opencv::{
    core::{Mat, Vec3f, Vector},
    imgproc,
    prelude::*,
};

/// Upper Canny threshold used inside the Hough transform
const CANNY_THRESHOLD: f64 = 100.0;

/// Accumulator votes needed for a circle center
const ACCUMULATOR_THRESHOLD: f64 = 30.0;

/// Circle candidate detector
pub struct CircleDetector {
    blur_kernel: i32,
}

impl CircleDetector {
    /// Create a detector that median-blurs with a `blur_kernel` sized window
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel is not odd and positive
    pub fn new(blur_kernel: i32) -> Result<Self> {
        if blur_kernel <= 0 || blur_kernel % 2 == 0 {
            return Err(Error::InvalidInput(format!(
                "Blur kernel must be odd and positive, got {blur_kernel}"
            )));
        }
        Ok(Self { blur_kernel })
    }

    /// Circles in a BGR frame, in detector order
    ///
    /// # Errors
    ///
    /// Returns an error if any `OpenCV` stage fails
    pub fn detect(&self, frame: &Mat, search: &CircleSearch) -> Result<Vec<Circle>> {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let mut blurred = Mat::default();
        imgproc::median_blur(&gray, &mut blurred, self.blur_kernel)?;

        let mut found = Vector::<Vec3f>::new();
        imgproc::hough_circles(
            &blurred,
            &mut found,
            imgproc::HOUGH_GRADIENT,
            1.0,
            search.min_center_distance,
            CANNY_THRESHOLD,
            ACCUMULATOR_THRESHOLD,
            search.min_radius,
            search.max_radius,
        )?;

        found
            .iter()
            .map(|c| {
                Ok(Circle::new(
                    f32_to_i32(c[0].round())?,
                    f32_to_i32(c[1].round())?,
                    f32_to_i32(c[2].round())?,
                ))
            })
            .collect()
    }
}
