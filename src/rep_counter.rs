//! Half-rep counting state machine driven by the knee angle.
//!
//! The knee angle is mapped linearly onto a 0-100 completion percentage and
//! clamped. A half rep is counted when the percentage lands exactly on the far
//! end from the last completed direction. Exact equality means noisy angles
//! hovering just inside the calibration range never count; clamping is what
//! makes the endpoints reachable at all.

use crate::{
    constants::{DEFAULT_FULL_PERCENT_ANGLE, DEFAULT_ZERO_PERCENT_ANGLE, EPSILON},
    Error, Result,
};
use log::info;
use serde::{Deserialize, Serialize};

/// Knee angles mapped to 0% and 100% completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepCalibration {
    pub zero_percent_angle: f64,
    pub full_percent_angle: f64,
}

impl Default for RepCalibration {
    fn default() -> Self {
        Self {
            zero_percent_angle: DEFAULT_ZERO_PERCENT_ANGLE,
            full_percent_angle: DEFAULT_FULL_PERCENT_ANGLE,
        }
    }
}

impl RepCalibration {
    /// Check that both angles are finite and far enough apart to divide by
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` for non-finite or equal angles
    pub fn validate(&self) -> Result<()> {
        let (zero, full) = (self.zero_percent_angle, self.full_percent_angle);
        if !zero.is_finite() || !full.is_finite() {
            return Err(Error::ConfigError("Calibration angles must be finite".to_string()));
        }
        if (zero - full).abs() < EPSILON {
            return Err(Error::ConfigError("Calibration angles must differ".to_string()));
        }
        Ok(())
    }

    /// Completion percentage for `angle`, clamped to [0, 100]
    #[must_use]
    pub fn percentage(&self, angle: f64) -> f64 {
        let t = (angle - self.zero_percent_angle) / (self.full_percent_angle - self.zero_percent_angle);
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            100.0
        } else {
            t * 100.0
        }
    }
}

/// Last completed half-rep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Down,
    Up,
}

/// Counts half reps; never decremented
#[derive(Debug, Clone)]
pub struct RepCounter {
    calibration: RepCalibration,
    half_reps: u32,
    direction: Direction,
}

impl RepCounter {
    #[must_use]
    pub fn new(calibration: RepCalibration) -> Self {
        Self {
            calibration,
            half_reps: 0,
            direction: Direction::Down,
        }
    }

    /// Reps completed, in steps of 0.5
    #[must_use]
    pub fn count(&self) -> f64 {
        f64::from(self.half_reps) / 2.0
    }

    #[must_use]
    pub fn half_reps(&self) -> u32 {
        self.half_reps
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn calibration(&self) -> &RepCalibration {
        &self.calibration
    }

    /// Feed a completion percentage. Returns the new direction on a transition.
    #[allow(clippy::float_cmp)] // Exact endpoint comparison is the counting rule
    pub fn update_percentage(&mut self, percentage: f64) -> Option<Direction> {
        let next = match self.direction {
            Direction::Down if percentage == 100.0 => Direction::Up,
            Direction::Up if percentage == 0.0 => Direction::Down,
            _ => return None,
        };
        self.direction = next;
        self.half_reps += 1;
        info!("Half rep ({next:?}), count now {}", self.count());
        Some(next)
    }

    /// Feed a knee angle through the calibration
    pub fn update_angle(&mut self, knee_angle: f64) -> Option<Direction> {
        let percentage = self.calibration.percentage(knee_angle);
        self.update_percentage(percentage)
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(RepCalibration::default())
    }
}
