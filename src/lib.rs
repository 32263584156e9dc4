//! Squat analysis library for side-on barbell squat videos.
//!
//! Given per-frame pose landmarks and circle candidates, the library:
//! - Decides which way the lifter faces and keeps only that side's landmarks
//! - Measures signed hip and knee angles corrected for orientation
//! - Counts half reps from the knee angle
//! - Tracks a barbell plate and maintains a bounded bar path
//!
//! The analysis core is plain Rust and works on recorded observations. The
//! `video` feature adds `OpenCV` decoding, Hough circle detection, an `ONNX`
//! pose model and an annotated display.
//!
//! # Examples
//!
//! ## Counting Reps From Knee Angles
//!
//! ```
//! use squat_analysis::rep_counter::RepCounter;
//!
//! let mut counter = RepCounter::default();
//! // Standing, bottom of the squat, standing again
//! for knee in [5.0, 60.0, 115.0, 60.0, 5.0] {
//!     counter.update_angle(knee);
//! }
//! assert_eq!(counter.count(), 1.0);
//! ```
//!
//! ## Replaying a Recording
//!
//! ```no_run
//! use squat_analysis::{config::Config, recording::Recording, session::SquatSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recording = Recording::load("session.json")?;
//! let config = Config::from_file("squat.yaml")?;
//! let mut session = SquatSession::new(config.session_config(recording.fps)?)?;
//!
//! let summary = recording.replay(&mut session);
//! println!("{} reps facing {}", summary.reps, summary.orientation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tracking a Plate
//!
//! ```
//! use squat_analysis::{
//!     frame::FrameSize,
//!     joints::{BoundingBox, Point},
//!     tracker::{BarbellTracker, Circle},
//! };
//!
//! let frame = FrameSize::new(400, 800);
//! let lifter = BoundingBox { min: Point::new(100, 50), max: Point::new(300, 780) };
//! let mut tracker = BarbellTracker::default();
//!
//! tracker.update(frame, Some(&lifter), &[Circle::new(200, 300, 30)]);
//! tracker.update(frame, Some(&lifter), &[Circle::new(204, 280, 30)]);
//! let path = tracker.check_path();
//! assert_eq!(path.segments.len(), 1);
//! ```

/// Pose landmark identifiers and per-orientation landmark sets
pub mod landmarks;

/// Normalized landmarks, pixel joint maps and the lifter's bounding box
pub mod joints;

/// Facing-direction classification and re-checks
pub mod orientation;

/// Orientation-corrected joint angles
pub mod angle;

/// Half-rep counting from the knee angle
pub mod rep_counter;

/// Barbell plate tracking and bar path consistency
pub mod tracker;

/// Per-video state and the frame pipeline
pub mod session;

/// Signal filtering algorithms for smoothing the knee angle
pub mod filters;

/// Frame dimensions and the resize envelope
pub mod frame;

/// Recorded observations for replay
pub mod recording;

/// Utility functions for numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Video file decoding
#[cfg(feature = "video")]
pub mod video;

/// Hough circle detection for plate candidates
#[cfg(feature = "video")]
pub mod circle_detection;

/// Pose landmark model inference
#[cfg(feature = "video")]
pub mod pose_detection;

/// Frame annotation
#[cfg(feature = "video")]
pub mod render;

/// Main application module
#[cfg(feature = "video")]
pub mod app;

pub use error::{Error, Result};
