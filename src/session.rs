//! Per-video analysis state and the frame pipeline.
//!
//! A [`SquatSession`] owns everything that persists across frames: the
//! orientation and its landmark set, the rep counter, the knee-angle filter and
//! the barbell tracker. Frames must be fed in order; one session per video.

use crate::{
    angle::JointAngles,
    filters::{create_filter, SignalFilter},
    frame::FrameSize,
    joints::{BoundingBox, FrameJointMap, PoseDetection},
    orientation::{Orientation, OrientationTracker, OrientationUpdate, RecheckPolicy},
    rep_counter::{Direction, RepCalibration, RepCounter},
    tracker::{BarbellTracker, Circle, PathCheck, TrackerConfig},
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything the session needs to know up front
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub default_orientation: Orientation,
    pub recheck: RecheckPolicy,
    pub calibration: RepCalibration,
    pub min_visibility: f32,
    /// Filter spec for the knee angle, see [`create_filter`]
    pub smoothing: String,
    pub tracker: TrackerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_orientation: Orientation::default(),
            recheck: RecheckPolicy::setup_only(),
            calibration: RepCalibration::default(),
            min_visibility: 0.0,
            smoothing: "none".to_string(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Reject parameters the pipeline cannot run with
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid calibration, tracker or visibility threshold
    pub fn validate(&self) -> Result<()> {
        self.calibration.validate()?;
        self.tracker.validate()?;
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(Error::ConfigError(
                "Minimum visibility must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inputs for one frame, as produced by the pose model and circle detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Index of the frame in the source video
    pub frame_index: u64,
    pub size: FrameSize,
    /// `None` when no person was detected
    #[serde(default)]
    pub pose: Option<PoseDetection>,
    #[serde(default)]
    pub circles: Vec<Circle>,
}

/// What the pipeline derived from one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub orientation: Orientation,
    #[serde(skip)]
    pub orientation_update: OrientationUpdate,
    /// Joints of the active landmark set
    pub joints: FrameJointMap,
    pub bounding_box: Option<BoundingBox>,
    pub angles: JointAngles,
    /// Knee angle after smoothing, as fed to the rep counter
    pub knee_signal: Option<f64>,
    pub rep_percentage: Option<f64>,
    pub rep_event: Option<Direction>,
    pub rep_count: f64,
    pub plate: Option<Circle>,
    pub path: PathCheck,
}

/// Totals at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub frames_with_pose: u64,
    pub reps: f64,
    pub orientation: Orientation,
    pub trajectory_len: usize,
    pub path_resets: u64,
}

/// Analysis state for one video
pub struct SquatSession {
    config: SessionConfig,
    orientation: OrientationTracker,
    reps: RepCounter,
    knee_filter: Box<dyn SignalFilter>,
    barbell: BarbellTracker,
    frames_processed: u64,
    frames_with_pose: u64,
    path_resets: u64,
}

impl SquatSession {
    /// Create a session
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the smoothing
    /// filter spec cannot be parsed
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let knee_filter = create_filter(&config.smoothing)?;
        info!(
            "Starting squat session: default {}, knee smoothing {}, calibration {:.0}..{:.0} deg",
            config.default_orientation,
            knee_filter.name(),
            config.calibration.zero_percent_angle,
            config.calibration.full_percent_angle
        );
        Ok(Self {
            orientation: OrientationTracker::new(config.default_orientation, config.recheck),
            reps: RepCounter::new(config.calibration),
            barbell: BarbellTracker::new(config.tracker.clone()),
            knee_filter,
            config,
            frames_processed: 0,
            frames_with_pose: 0,
            path_resets: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation.orientation()
    }

    #[must_use]
    pub fn landmark_set(&self) -> &crate::landmarks::LandmarkSet {
        self.orientation.landmark_set()
    }

    #[must_use]
    pub fn rep_counter(&self) -> &RepCounter {
        &self.reps
    }

    #[must_use]
    pub fn barbell(&self) -> &BarbellTracker {
        &self.barbell
    }

    /// Run one frame through orientation, angles, counting and plate tracking
    pub fn process_frame(&mut self, observation: &FrameObservation) -> FrameReport {
        let frame_offset = self.frames_processed;
        self.frames_processed += 1;

        let all_joints = observation
            .pose
            .as_ref()
            .map(|pose| {
                FrameJointMap::from_detection(
                    pose,
                    observation.size.width,
                    observation.size.height,
                    self.config.min_visibility,
                )
            })
            .unwrap_or_default();
        if !all_joints.is_empty() {
            self.frames_with_pose += 1;
        }

        let orientation_update = self.orientation.observe(frame_offset, &all_joints);
        if orientation_update == OrientationUpdate::Changed {
            self.knee_filter.reset();
        }
        let orientation = self.orientation.orientation();

        let bounding_box = observation
            .pose
            .as_ref()
            .and_then(|pose| BoundingBox::from_detection(pose, observation.size.width, observation.size.height));
        let joints = all_joints.filtered(self.orientation.landmark_set());
        let angles = JointAngles::measure(&joints, self.orientation.landmark_set(), orientation);

        let knee_signal = angles.knee.map(|knee| self.knee_filter.apply(knee));
        let rep_percentage = knee_signal.map(|knee| self.reps.calibration().percentage(knee));
        let rep_event = rep_percentage.and_then(|pct| self.reps.update_percentage(pct));

        let plate = self
            .barbell
            .update(observation.size, bounding_box.as_ref(), &observation.circles);
        let path = self.barbell.check_path();
        if path.reset.is_some() {
            self.path_resets += 1;
        }

        debug!(
            "Frame {}: knee {:?} hip {:?} reps {} plate {:?}",
            observation.frame_index,
            angles.knee,
            angles.hip,
            self.reps.count(),
            plate
        );

        FrameReport {
            frame_index: observation.frame_index,
            orientation,
            orientation_update,
            joints,
            bounding_box,
            angles,
            knee_signal,
            rep_percentage,
            rep_event,
            rep_count: self.reps.count(),
            plate,
            path,
        }
    }

    /// Process every observation in order and summarize
    pub fn run<'a, I>(&mut self, observations: I) -> SessionSummary
    where
        I: IntoIterator<Item = &'a FrameObservation>,
    {
        for observation in observations {
            self.process_frame(observation);
        }
        self.summary()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames_processed: self.frames_processed,
            frames_with_pose: self.frames_with_pose,
            reps: self.reps.count(),
            orientation: self.orientation.orientation(),
            trajectory_len: self.barbell.trajectory().len(),
            path_resets: self.path_resets,
        }
    }
}
