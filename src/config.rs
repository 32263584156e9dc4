//! Configuration management for the squat analyzer

use crate::{
    constants::{
        DEFAULT_BLUR_KERNEL, DEFAULT_FULL_PERCENT_ANGLE, DEFAULT_MIN_VISIBILITY, DEFAULT_RECHECK_INTERVAL_SECONDS,
        DEFAULT_RECHECK_WINDOW_SECONDS, DEFAULT_SETUP_SECONDS, DEFAULT_ZERO_PERCENT_ANGLE,
    },
    filters::create_filter,
    orientation::{Orientation, RecheckPolicy},
    rep_counter::RepCalibration,
    session::SessionConfig,
    tracker::TrackerConfig,
    utils::safe_cast::seconds_to_frames,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video input configuration
    pub video: VideoConfig,

    /// Pose model configuration
    pub pose: PoseConfig,

    /// Orientation detection configuration
    pub orientation: OrientationConfig,

    /// Rep counting configuration
    pub reps: RepConfig,

    /// Barbell tracking configuration
    pub tracker: TrackerSettings,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Video input parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Seconds skipped at the start while the lifter sets up
    pub setup_seconds: f64,

    /// Resize frames into the pose model's resolution envelope
    pub resize: bool,

    /// Frame rate assumed when the container does not report one
    pub target_fps: u32,
}

/// Pose model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Path to the pose landmark ONNX model
    pub model: PathBuf,

    /// Landmarks below this visibility are treated as missing (0.0-1.0)
    pub min_visibility: f32,
}

/// Orientation detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Orientation used until the feet are first seen
    pub default: Orientation,

    /// Seconds between re-checks after the setup frame
    pub recheck_interval_seconds: f64,

    /// Re-checks stop after this many seconds; 0 decides on the setup frame only
    pub recheck_window_seconds: f64,
}

/// Rep counting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepConfig {
    /// Knee angle read as 0% of a rep
    pub zero_percent_angle: f64,

    /// Knee angle read as 100% of a rep
    pub full_percent_angle: f64,

    /// Knee angle smoothing filter (none, moving_average:N, median:N, exponential:A)
    pub smoothing: String,
}

/// Barbell tracking parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    #[serde(flatten)]
    pub tracking: TrackerConfig,

    /// Blur kernel applied before circle detection, must be odd
    pub blur_kernel: i32,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show annotated frames in a window
    pub gui: bool,

    /// Draw the active landmarks and their connections
    pub draw_landmarks: bool,

    /// Draw the lifter's bounding box
    pub draw_box: bool,

    /// Draw the bar path
    pub draw_path: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            setup_seconds: DEFAULT_SETUP_SECONDS,
            resize: true,
            target_fps: 30,
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("assets/pose_landmark_full.onnx"),
            min_visibility: DEFAULT_MIN_VISIBILITY,
        }
    }
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            default: Orientation::Right,
            recheck_interval_seconds: DEFAULT_RECHECK_INTERVAL_SECONDS,
            recheck_window_seconds: DEFAULT_RECHECK_WINDOW_SECONDS,
        }
    }
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            zero_percent_angle: DEFAULT_ZERO_PERCENT_ANGLE,
            full_percent_angle: DEFAULT_FULL_PERCENT_ANGLE,
            smoothing: "none".to_string(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            tracking: TrackerConfig::default(),
            blur_kernel: DEFAULT_BLUR_KERNEL,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gui: false,
            draw_landmarks: true,
            draw_box: true,
            draw_path: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        // Video
        if !self.video.setup_seconds.is_finite() || self.video.setup_seconds < 0.0 {
            return Err(Error::ConfigError("Setup seconds must be 0 or greater".to_string()));
        }
        if self.video.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }

        // Pose model
        if !(0.0..=1.0).contains(&self.pose.min_visibility) {
            return Err(Error::ConfigError(
                "Minimum visibility must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Orientation
        if !self.orientation.recheck_interval_seconds.is_finite() || self.orientation.recheck_interval_seconds <= 0.0 {
            return Err(Error::ConfigError(
                "Orientation recheck interval must be greater than 0".to_string(),
            ));
        }
        if !self.orientation.recheck_window_seconds.is_finite() || self.orientation.recheck_window_seconds < 0.0 {
            return Err(Error::ConfigError(
                "Orientation recheck window must be 0 or greater".to_string(),
            ));
        }

        // Rep calibration
        self.calibration().validate()?;
        create_filter(&self.reps.smoothing)
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing '{}': {e}", self.reps.smoothing)))?;

        // Tracker
        self.tracker.tracking.validate()?;
        if self.tracker.blur_kernel <= 0 || self.tracker.blur_kernel % 2 == 0 {
            return Err(Error::ConfigError(
                "Blur kernel size must be odd and greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Rep calibration from the `reps` section
    #[must_use]
    pub fn calibration(&self) -> RepCalibration {
        RepCalibration {
            zero_percent_angle: self.reps.zero_percent_angle,
            full_percent_angle: self.reps.full_percent_angle,
        }
    }

    /// Orientation re-check schedule for a video at `fps`
    #[must_use]
    pub fn recheck_policy(&self, fps: f64) -> RecheckPolicy {
        let window_frames = seconds_to_frames(self.orientation.recheck_window_seconds, fps);
        if window_frames == 0 {
            return RecheckPolicy::setup_only();
        }
        RecheckPolicy {
            interval_frames: seconds_to_frames(self.orientation.recheck_interval_seconds, fps).max(1),
            window_frames,
        }
    }

    /// Session parameters for a video at `fps`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn session_config(&self, fps: f64) -> Result<SessionConfig> {
        self.validate()?;
        Ok(SessionConfig {
            default_orientation: self.orientation.default,
            recheck: self.recheck_policy(fps),
            calibration: self.calibration(),
            min_visibility: self.pose.min_visibility,
            smoothing: self.reps.smoothing.clone(),
            tracker: self.tracker.tracking.clone(),
        })
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Squat Analysis Configuration

# Video input
video:
  setup_seconds: 3.0
  resize: true
  target_fps: 30

# Pose landmark model
pose:
  model: "assets/pose_landmark_full.onnx"
  min_visibility: 0.5

# Which way the lifter faces (right, left)
orientation:
  default: right
  recheck_interval_seconds: 1.0
  recheck_window_seconds: 3.0

# Knee angle calibration and smoothing
reps:
  zero_percent_angle: 15.0
  full_percent_angle: 110.0
  smoothing: "none"

# Barbell plate tracking
tracker:
  capacity: 100
  jump_threshold_px: 30
  gap_threshold_frames: 10
  min_diameter_fraction: 0.05
  max_diameter_fraction: 0.25
  min_center_distance_px: 100.0
  record_gaps: false
  blur_kernel: 5

# Display settings
display:
  gui: false
  draw_landmarks: true
  draw_box: true
  draw_path: true
"#;
