//! Main application module: decode a video, detect, analyze and display.

use crate::{
    circle_detection::CircleDetector,
    config::Config,
    pose_detection::PoseDetector,
    recording::Recording,
    render::Overlay,
    session::{FrameObservation, SessionSummary, SquatSession},
    video::{frame_size, VideoSource},
    Result,
};
use log::{debug, info};
use opencv::highgui::{self, WINDOW_NORMAL};
use std::path::PathBuf;
use std::time::Instant;

const WINDOW_NAME: &str = "Squat Analysis";

/// What to run and what to keep
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Video file to analyze
    pub video: PathBuf,
    /// Loaded and validated configuration
    pub config: Config,
    /// Keep per-frame observations for later replay
    pub record: bool,
}

/// Squat analysis application over one video file
pub struct SquatApp {
    source: VideoSource,
    pose_detector: PoseDetector,
    circle_detector: CircleDetector,
    session: SquatSession,
    overlay: Option<Overlay>,
    recording: Option<Recording>,
}

impl SquatApp {
    /// Open the video and load the models
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or the video or a
    /// model cannot be opened
    pub fn new(app_config: AppConfig) -> Result<Self> {
        info!("Initializing Squat Analysis application");
        let AppConfig { video, config, record } = app_config;

        let source = VideoSource::open(&video, &config.video)?;
        let session = SquatSession::new(config.session_config(source.fps())?)?;
        let pose_detector = PoseDetector::new(&config.pose.model)?;
        let circle_detector = CircleDetector::new(config.tracker.blur_kernel)?;

        let overlay = if config.display.gui {
            highgui::named_window(WINDOW_NAME, WINDOW_NORMAL)?;
            Some(Overlay::new(config.display.clone()))
        } else {
            None
        };
        let recording = record.then(|| Recording::new(source.fps()));

        Ok(Self {
            source,
            pose_detector,
            circle_detector,
            session,
            overlay,
            recording,
        })
    }

    /// Process frames until the video ends or the user quits
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, inference or display fails
    pub fn run(&mut self) -> Result<SessionSummary> {
        info!("Starting main application loop");
        let mut prev_time = Instant::now();

        while let Some((frame_index, mut frame)) = self.source.read()? {
            let size = frame_size(&frame)?;
            let pose = self.pose_detector.detect(&frame)?;
            let search = self.session.barbell().config().circle_search(size.width);
            let circles = self.circle_detector.detect(&frame, &search)?;

            let observation = FrameObservation {
                frame_index,
                size,
                pose,
                circles,
            };
            let report = self.session.process_frame(&observation);
            if let Some(recording) = self.recording.as_mut() {
                recording.push(observation);
            }

            if let Some(overlay) = &self.overlay {
                let elapsed = prev_time.elapsed().as_secs_f64();
                prev_time = Instant::now();
                let fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };

                overlay.draw(&mut frame, &report, self.session.landmark_set(), fps)?;
                highgui::imshow(WINDOW_NAME, &frame)?;

                let key = highgui::wait_key(1)?;
                if key == 27 || key == i32::from(b'q') {
                    info!("Exit requested by user");
                    break;
                }
            } else {
                debug!("Processed frame {frame_index}");
            }
        }

        let summary = self.session.summary();
        info!(
            "Finished: {} frames, {} with a pose, {:.1} reps",
            summary.frames_processed, summary.frames_with_pose, summary.reps
        );
        Ok(summary)
    }

    /// Observations captured so far, when recording was requested
    #[must_use]
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }
}
