//! Video file input: frame rate discovery, setup skip and resizing.

use crate::{
    config::VideoConfig,
    frame::{fit_to_envelope, FrameSize},
    utils::safe_cast::{f64_to_i32_clamp, i32_to_u32, seconds_to_frames, u32_to_i32},
    Error, Result,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_POS_FRAMES},
};
use std::path::Path;

/// Frames of a video file, starting after the setup period
pub struct VideoSource {
    capture: VideoCapture,
    fps: f64,
    frame_count: i32,
    next_index: u64,
    resize: bool,
}

impl VideoSource {
    /// Open `path` and seek past the setup period
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or seeked
    pub fn open<P: AsRef<Path>>(path: P, config: &VideoConfig) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::VideoError(format!("Non UTF-8 video path: {}", path.display())))?;

        info!("Opening video file: {path_str}");
        let mut capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::VideoError(format!("Could not open video: {path_str}")));
        }

        let reported_fps = capture.get(CAP_PROP_FPS)?;
        let fps = if reported_fps.is_finite() && reported_fps > 0.0 {
            reported_fps
        } else {
            warn!("Video reports no frame rate, assuming {} fps", config.target_fps);
            f64::from(config.target_fps)
        };
        let frame_count = f64_to_i32_clamp(capture.get(CAP_PROP_FRAME_COUNT)?, 0, i32::MAX);

        let skip = seconds_to_frames(config.setup_seconds, fps);
        if skip > 0 {
            info!("Skipping {skip} setup frames ({:.1}s)", config.setup_seconds);
            capture.set(CAP_PROP_POS_FRAMES, f64::from(skip))?;
        }

        info!("Video: {fps:.2} fps, {frame_count} frames");
        Ok(Self {
            capture,
            fps,
            frame_count,
            next_index: u64::from(skip),
            resize: config.resize,
        })
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Total frames reported by the container, 0 when unknown
    #[must_use]
    pub fn frame_count(&self) -> i32 {
        self.frame_count
    }

    /// Next frame and its index in the file, `None` at end of video
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or resizing fails
    pub fn read(&mut self) -> Result<Option<(u64, Mat)>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        let index = self.next_index;
        self.next_index += 1;

        if self.resize {
            frame = resize_to_envelope(&frame)?;
        }
        Ok(Some((index, frame)))
    }
}

/// Dimensions of `frame`
///
/// # Errors
///
/// Returns an error if the matrix reports negative dimensions
pub fn frame_size(frame: &Mat) -> Result<FrameSize> {
    Ok(FrameSize::new(i32_to_u32(frame.cols())?, i32_to_u32(frame.rows())?))
}

/// Resize `frame` into the pose model's resolution envelope
///
/// # Errors
///
/// Returns an error if `OpenCV` fails to resize
pub fn resize_to_envelope(frame: &Mat) -> Result<Mat> {
    let size = frame_size(frame)?;
    let target = fit_to_envelope(size);
    if target == size {
        return Ok(frame.try_clone()?);
    }

    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(u32_to_i32(target.width)?, u32_to_i32(target.height)?),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;
    Ok(resized)
}
