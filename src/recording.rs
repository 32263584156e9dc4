//! Recorded per-frame observations.
//!
//! A recording holds what the pose model and circle detector produced for each
//! frame of a video, so a session can be replayed without the video stack.

use crate::{
    constants::DEFAULT_FPS,
    session::{FrameObservation, SessionSummary, SquatSession},
    Error, Result,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Observations of one video, in frame order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Frame rate of the source video
    pub fps: f64,
    pub frames: Vec<FrameObservation>,
}

impl Default for Recording {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Recording {
    #[must_use]
    pub fn new(fps: f64) -> Self {
        Self { fps, frames: Vec::new() }
    }

    pub fn push(&mut self, observation: FrameObservation) {
        self.frames.push(observation);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Check the frame rate and that frame indices strictly increase
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordingError` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::RecordingError(format!("Invalid frame rate: {}", self.fps)));
        }
        for pair in self.frames.windows(2) {
            if pair[1].frame_index <= pair[0].frame_index {
                return Err(Error::RecordingError(format!(
                    "Frame {} follows frame {}",
                    pair[1].frame_index, pair[0].frame_index
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a JSON recording
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let recording: Self = serde_json::from_reader(reader)?;
        recording.validate()?;
        info!(
            "Loaded {} frames at {:.1} fps from {}",
            recording.len(),
            recording.fps,
            path.display()
        );
        Ok(recording)
    }

    /// Write the recording as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Feed every frame through `session`
    pub fn replay(&self, session: &mut SquatSession) -> SessionSummary {
        session.run(&self.frames)
    }
}
