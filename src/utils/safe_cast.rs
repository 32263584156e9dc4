//! Checked numeric conversions between model space, pixel space and frame indices

use crate::{Error, Result};

/// Convert usize to i32, failing on overflow
///
/// # Errors
///
/// Returns an error if the value exceeds `i32::MAX`
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Convert a frame dimension reported by a video backend to u32
///
/// # Errors
///
/// Returns an error for negative dimensions
pub fn i32_to_u32(value: i32) -> Result<u32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Dimension {value} must be non-negative")))
}

/// Convert a frame dimension to the i32 the video backend expects
///
/// # Errors
///
/// Returns an error if the value exceeds `i32::MAX`
pub fn u32_to_i32(value: u32) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Dimension {value} too large to fit in i32")))
}

/// Convert f32 to i32 with bounds checking, truncating toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
pub fn f32_to_i32(value: f32) -> Result<i32> {
    if value.is_finite() && value >= i32::MIN as f32 && value <= i32::MAX as f32 {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!("Value {value} cannot be safely converted to i32")))
    }
}

/// Convert f64 to i32 with bounds checking, truncating toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!("Value {value} cannot be safely converted to i32")))
    }
}

/// Clamp and convert f64 to i32; non-finite input maps to `min`
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if !value.is_finite() {
        return min;
    }
    (value.clamp(f64::from(min), f64::from(max)) as i32).clamp(min, max)
}

/// Frame count from a seconds value and a frame rate, never negative
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to u32 range first
pub fn seconds_to_frames(seconds: f64, fps: f64) -> u32 {
    let frames = seconds * fps;
    if frames.is_finite() && frames > 0.0 {
        frames.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
