//! Whole-body pose landmarks from a BlazePose landmark model via `ONNX` Runtime.

use crate::{
    constants::NUM_POSE_LANDMARKS,
    joints::{NormalizedLandmark, PoseDetection},
    utils::safe_cast::usize_to_i32,
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::{
    core::{Mat, Size, Vec3f, CV_32F},
    imgproc,
    prelude::*,
};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::Arc;

/// Square input side of the landmark model
const MODEL_INPUT_SIZE: usize = 256;

/// Landmarks in the model output, including the auxiliary ROI points
const MODEL_OUTPUT_LANDMARKS: usize = 39;

/// x, y, z, visibility, presence
const VALUES_PER_LANDMARK: usize = 5;

/// Below this pose flag the frame has no person
const PRESENCE_THRESHOLD: f32 = 0.5;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Pose landmark detector
pub struct PoseDetector {
    session: Session,
}

impl PoseDetector {
    /// Load the landmark model
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the model cannot be initialized
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(Error::ModelError(format!("Pose model not found: {}", model_path.display())));
        }
        log::info!("Initializing PoseDetector with model: {}", model_path.display());

        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );
        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        Ok(Self { session })
    }

    /// Landmarks of the person in a BGR frame, `None` when nobody is found.
    ///
    /// Coordinates are normalized to the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails
    pub fn detect(&self, frame: &Mat) -> Result<Option<PoseDetection>> {
        let input = Self::preprocess(frame)?;

        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let landmarks_output = outputs
            .first()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;
        let landmarks_tensor = landmarks_output.try_extract::<f32>()?;
        let landmarks_view = landmarks_tensor.view();
        let values = landmarks_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get landmark data".to_string()))?;

        if let Some(flag_output) = outputs.get(1) {
            let flag_tensor = flag_output.try_extract::<f32>()?;
            let presence = flag_tensor.view().iter().next().copied().unwrap_or(0.0);
            if presence < PRESENCE_THRESHOLD {
                log::debug!("No person in frame (pose flag {presence:.2})");
                return Ok(None);
            }
        }

        Self::postprocess(values).map(Some)
    }

    /// Resize to the model input, convert to RGB in [0, 1], NHWC
    fn preprocess(frame: &Mat) -> Result<Array4<f32>> {
        let side = usize_to_i32(MODEL_INPUT_SIZE)?;
        let mut resized = Mat::default();
        imgproc::resize(frame, &mut resized, Size::new(side, side), 0.0, 0.0, imgproc::INTER_LINEAR)?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let channels = 3;
        let mut data = vec![0.0f32; MODEL_INPUT_SIZE * MODEL_INPUT_SIZE * channels];
        for row in 0..MODEL_INPUT_SIZE {
            for col in 0..MODEL_INPUT_SIZE {
                let pixel = float_image.at_2d::<Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                let base = (row * MODEL_INPUT_SIZE + col) * channels;
                data[base..base + channels].copy_from_slice(&[pixel[0], pixel[1], pixel[2]]);
            }
        }

        Array4::from_shape_vec((1, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, channels), data)
            .map_err(|e| Error::ModelError(format!("Failed to create input array: {e}")))
    }

    /// Keep the body landmarks, scaled back to normalized frame coordinates
    #[allow(clippy::cast_precision_loss)] // Model input side is small
    fn postprocess(values: &[f32]) -> Result<PoseDetection> {
        let expected = MODEL_OUTPUT_LANDMARKS * VALUES_PER_LANDMARK;
        if values.len() < expected {
            return Err(Error::ModelOutputError(format!(
                "Expected {expected} landmark values, got {}",
                values.len()
            )));
        }

        let scale = MODEL_INPUT_SIZE as f32;
        let landmarks = values
            .chunks_exact(VALUES_PER_LANDMARK)
            .take(NUM_POSE_LANDMARKS)
            .map(|v| NormalizedLandmark {
                x: v[0] / scale,
                y: v[1] / scale,
                z: v[2] / scale,
                visibility: sigmoid(v[3]),
            })
            .collect();

        Ok(PoseDetection::new(landmarks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postprocess_scales_and_gates() {
        let mut values = vec![0.0f32; MODEL_OUTPUT_LANDMARKS * VALUES_PER_LANDMARK];
        values[0] = 128.0;
        values[1] = 64.0;
        values[3] = 10.0;
        let detection = PoseDetector::postprocess(&values).unwrap();
        assert_eq!(detection.landmarks.len(), NUM_POSE_LANDMARKS);
        assert!((detection.landmarks[0].x - 0.5).abs() < 1e-6);
        assert!((detection.landmarks[0].y - 0.25).abs() < 1e-6);
        assert!(detection.landmarks[0].visibility > 0.99);
        assert!((detection.landmarks[1].visibility - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_postprocess_rejects_short_output() {
        assert!(PoseDetector::postprocess(&[0.0; 10]).is_err());
    }
}
