//! Barbell plate tracking from per-frame circle candidates.
//!
//! Candidates come from an external circle detector. A plate qualifies when it
//! sits in the upper half of the frame, strictly inside the lifter's
//! horizontal extent and has a plausible diameter. The first qualifying
//! candidate in detector order is pushed to the front of a bounded
//! newest-first trajectory. A consistency pass over the trajectory discards
//! it wholesale after a horizontal jump or a long run of empty frames.

use crate::{
    constants::{
        DEFAULT_GAP_THRESHOLD_FRAMES, DEFAULT_JUMP_THRESHOLD_PX, DEFAULT_MAX_DIAMETER_FRACTION,
        DEFAULT_MIN_CENTER_DISTANCE_PX, DEFAULT_MIN_DIAMETER_FRACTION, DEFAULT_TRAJECTORY_CAPACITY,
        PATH_THICKNESS_SCALE,
    },
    frame::FrameSize,
    joints::{BoundingBox, Point},
    utils::safe_cast::f64_to_i32_clamp,
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Circle candidate from the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl Circle {
    #[must_use]
    pub const fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Radius range and center spacing handed to the circle detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSearch {
    pub min_radius: i32,
    pub max_radius: i32,
    pub min_center_distance: f64,
}

/// Tracker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Trajectory buffer capacity
    pub capacity: usize,
    /// Horizontal displacement between consecutive centers that resets the path
    pub jump_threshold_px: i32,
    /// Frames without a plate after which the path resets
    pub gap_threshold_frames: u32,
    /// Smallest plausible plate diameter as a fraction of frame width
    pub min_diameter_fraction: f64,
    /// Largest plausible plate diameter as a fraction of frame width
    pub max_diameter_fraction: f64,
    /// Minimum distance between detected circle centers
    pub min_center_distance_px: f64,
    /// Push an empty entry on frames without a plate
    pub record_gaps: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TRAJECTORY_CAPACITY,
            jump_threshold_px: DEFAULT_JUMP_THRESHOLD_PX,
            gap_threshold_frames: DEFAULT_GAP_THRESHOLD_FRAMES,
            min_diameter_fraction: DEFAULT_MIN_DIAMETER_FRACTION,
            max_diameter_fraction: DEFAULT_MAX_DIAMETER_FRACTION,
            min_center_distance_px: DEFAULT_MIN_CENTER_DISTANCE_PX,
            record_gaps: false,
        }
    }
}

impl TrackerConfig {
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first invalid parameter
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ConfigError("Trajectory capacity must be greater than 0".to_string()));
        }
        if self.jump_threshold_px <= 0 {
            return Err(Error::ConfigError("Jump threshold must be greater than 0".to_string()));
        }
        let fraction_ok = |f: f64| f > 0.0 && f <= 1.0;
        if !fraction_ok(self.min_diameter_fraction) || !fraction_ok(self.max_diameter_fraction) {
            return Err(Error::ConfigError("Diameter fractions must be in (0.0, 1.0]".to_string()));
        }
        if self.min_diameter_fraction >= self.max_diameter_fraction {
            return Err(Error::ConfigError(
                "Minimum diameter fraction must be below the maximum".to_string(),
            ));
        }
        if !self.min_center_distance_px.is_finite() || self.min_center_distance_px <= 0.0 {
            return Err(Error::ConfigError(
                "Minimum circle center distance must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Detector parameters for frames `frame_width` pixels wide
    #[must_use]
    pub fn circle_search(&self, frame_width: u32) -> CircleSearch {
        let width = f64::from(frame_width);
        CircleSearch {
            min_radius: f64_to_i32_clamp(width * self.min_diameter_fraction / 2.0, 0, i32::MAX),
            max_radius: f64_to_i32_clamp((width * self.max_diameter_fraction / 2.0).ceil(), 0, i32::MAX),
            min_center_distance: self.min_center_distance_px,
        }
    }
}

/// Bounded newest-first history of plate centers; `None` marks a gap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryBuffer {
    capacity: usize,
    points: VecDeque<Option<Point>>,
}

impl TrajectoryBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert at the front, evicting the oldest entry when full
    pub fn push(&mut self, point: Option<Point>) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() >= self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest entry, if any
    #[must_use]
    pub fn newest(&self) -> Option<Point> {
        self.points.front().copied().flatten()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Option<Point>> {
        self.points.get(index).copied()
    }

    /// Entries newest first
    pub fn iter(&self) -> impl Iterator<Item = Option<Point>> + '_ {
        self.points.iter().copied()
    }
}

/// Line between two consecutive trajectory points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Newer point
    pub from: Point,
    /// Older point
    pub to: Point,
    /// Drawing thickness, tapering with age
    pub thickness: i32,
}

/// Why the trajectory was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathReset {
    /// Consecutive centers too far apart horizontally
    Jump { dx: u32 },
    /// Too many frames without a plate
    Gap { frames: u32 },
}

/// Outcome of a consistency pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathCheck {
    /// Segments validated before the pass stopped
    pub segments: Vec<PathSegment>,
    pub reset: Option<PathReset>,
}

/// Plate tracker owning the trajectory and the no-detection streak
#[derive(Debug, Clone)]
pub struct BarbellTracker {
    config: TrackerConfig,
    trajectory: TrajectoryBuffer,
    no_detection_streak: u32,
}

impl BarbellTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        let trajectory = TrajectoryBuffer::new(config.capacity);
        Self {
            config,
            trajectory,
            no_detection_streak: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn trajectory(&self) -> &TrajectoryBuffer {
        &self.trajectory
    }

    #[must_use]
    pub fn no_detection_streak(&self) -> u32 {
        self.no_detection_streak
    }

    /// Whether `circle` could be the lifter's plate
    #[must_use]
    pub fn qualifies(&self, circle: &Circle, frame: FrameSize, person: &BoundingBox) -> bool {
        let diameter = f64::from(circle.radius) * 2.0;
        let width = f64::from(frame.width);
        let plausible_size = diameter >= width * self.config.min_diameter_fraction
            && diameter <= width * self.config.max_diameter_fraction;

        f64::from(circle.y) < frame.mid_height() && person.spans_x(circle.x) && plausible_size
    }

    /// Record this frame's candidates. Returns the circle that was tracked.
    ///
    /// Without a detected person nothing can qualify.
    pub fn update(&mut self, frame: FrameSize, person: Option<&BoundingBox>, candidates: &[Circle]) -> Option<Circle> {
        let chosen = person.and_then(|bbox| candidates.iter().find(|c| self.qualifies(c, frame, bbox)).copied());

        match chosen {
            Some(circle) => {
                self.no_detection_streak = 0;
                self.trajectory.push(Some(circle.center()));
            }
            None => {
                self.no_detection_streak = self.no_detection_streak.saturating_add(1);
                if self.config.record_gaps {
                    self.trajectory.push(None);
                }
            }
        }
        chosen
    }

    /// Walk consecutive pairs newest to oldest, collecting drawable segments.
    ///
    /// Pairs with a gap are skipped. A horizontal jump above the threshold, or a
    /// streak above the gap threshold, clears the whole trajectory and stops.
    pub fn check_path(&mut self) -> PathCheck {
        let mut check = PathCheck::default();

        for i in 1..self.trajectory.len() {
            let (Some(Some(newer)), Some(Some(older))) = (self.trajectory.get(i - 1), self.trajectory.get(i)) else {
                continue;
            };

            let dx = newer.x.abs_diff(older.x);
            let reset = if i64::from(dx) > i64::from(self.config.jump_threshold_px) {
                Some(PathReset::Jump { dx })
            } else if self.no_detection_streak > self.config.gap_threshold_frames {
                Some(PathReset::Gap {
                    frames: self.no_detection_streak,
                })
            } else {
                None
            };

            if let Some(reason) = reset {
                debug!("Discarding bar path of {} points: {reason:?}", self.trajectory.len());
                self.trajectory.clear();
                check.reset = Some(reason);
                break;
            }

            check.segments.push(PathSegment {
                from: newer,
                to: older,
                thickness: self.segment_thickness(i),
            });
        }

        check
    }

    #[allow(clippy::cast_precision_loss)] // Buffer positions are small
    fn segment_thickness(&self, index: usize) -> i32 {
        let ratio = self.trajectory.capacity() as f64 / (index + 1) as f64;
        f64_to_i32_clamp(ratio.sqrt() * PATH_THICKNESS_SCALE, 1, i32::MAX)
    }

    /// Drop the trajectory and streak
    pub fn reset(&mut self) {
        self.trajectory.clear();
        self.no_detection_streak = 0;
    }
}

impl Default for BarbellTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
