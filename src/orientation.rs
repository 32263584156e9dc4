//! Decides which way the lifter faces and keeps the matching landmark set.
//!
//! In a side-on stance the toes lead the heels in the direction of facing, so
//! the classifier compares foot-index and heel x coordinates of both feet.
//! A lifter facing right shows their right side to the camera, which selects
//! the right-side landmark set.

use crate::{
    joints::FrameJointMap,
    landmarks::{LandmarkSet, PoseLandmark, Side},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Camera-relative facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    #[serde(alias = "facing_right")]
    Right,
    #[serde(alias = "facing_left")]
    Left,
}

impl Orientation {
    #[must_use]
    pub fn is_facing_right(self) -> bool {
        self == Self::Right
    }

    /// The body side turned towards the camera
    #[must_use]
    pub fn visible_side(self) -> Side {
        match self {
            Self::Right => Side::Right,
            Self::Left => Side::Left,
        }
    }

    #[must_use]
    pub fn landmark_set(self) -> LandmarkSet {
        LandmarkSet::for_side(self.visible_side())
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Right => write!(f, "facing right"),
            Self::Left => write!(f, "facing left"),
        }
    }
}

/// Classify orientation from the feet.
///
/// Returns `None` when any of the four foot landmarks is missing.
#[must_use]
pub fn classify(joints: &FrameJointMap) -> Option<Orientation> {
    let left_heel = joints.get(PoseLandmark::LeftHeel)?;
    let right_heel = joints.get(PoseLandmark::RightHeel)?;
    let left_toe = joints.get(PoseLandmark::LeftFootIndex)?;
    let right_toe = joints.get(PoseLandmark::RightFootIndex)?;

    if right_toe.x > right_heel.x || left_toe.x > left_heel.x {
        Some(Orientation::Right)
    } else {
        Some(Orientation::Left)
    }
}

/// When orientation may be re-evaluated, in frames since the setup frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecheckPolicy {
    /// Re-check every this many frames; 0 disables re-checks
    pub interval_frames: u32,
    /// Re-checks stop once this many frames have been processed
    pub window_frames: u32,
}

impl RecheckPolicy {
    /// Only the setup frame decides
    #[must_use]
    pub fn setup_only() -> Self {
        Self {
            interval_frames: 0,
            window_frames: 0,
        }
    }

    #[must_use]
    pub fn is_due(&self, frame_offset: u64) -> bool {
        self.interval_frames > 0
            && frame_offset < u64::from(self.window_frames)
            && frame_offset % u64::from(self.interval_frames) == 0
    }
}

/// Result of feeding one frame to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationUpdate {
    /// No evaluation this frame
    Skipped,
    /// Evaluated, orientation unchanged
    Confirmed,
    /// Evaluated and the landmark set was replaced
    Changed,
    /// Evaluated but the feet were not visible; previous orientation kept
    Indeterminate,
}

/// Holds the session orientation and the landmark set it selects
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    current: Orientation,
    landmark_set: LandmarkSet,
    policy: RecheckPolicy,
    setup_done: bool,
}

impl OrientationTracker {
    /// Start from `default` until the setup frame says otherwise
    #[must_use]
    pub fn new(default: Orientation, policy: RecheckPolicy) -> Self {
        Self {
            current: default,
            landmark_set: default.landmark_set(),
            policy,
            setup_done: false,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.current
    }

    #[must_use]
    pub fn landmark_set(&self) -> &LandmarkSet {
        &self.landmark_set
    }

    /// Evaluate on the setup frame and on re-check frames inside the window.
    ///
    /// `frame_offset` counts processed frames, the setup frame being 0.
    pub fn observe(&mut self, frame_offset: u64, joints: &FrameJointMap) -> OrientationUpdate {
        let due = !self.setup_done || self.policy.is_due(frame_offset);
        if !due {
            return OrientationUpdate::Skipped;
        }
        self.setup_done = true;

        let Some(orientation) = classify(joints) else {
            debug!("Frame {frame_offset}: feet not visible, keeping {}", self.current);
            return OrientationUpdate::Indeterminate;
        };

        if orientation == self.current {
            debug!("Frame {frame_offset}: orientation confirmed as {orientation}");
            return OrientationUpdate::Confirmed;
        }

        info!("Frame {frame_offset}: orientation changed from {} to {orientation}", self.current);
        self.current = orientation;
        self.landmark_set = orientation.landmark_set();
        OrientationUpdate::Changed
    }
}
