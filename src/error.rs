//! Error types for the squat analysis library.
//!
//! Per-frame anomalies (missing landmarks, frames without a plate) are not
//! errors; they surface as `None` or as streak counters. These variants cover
//! setup, I/O and the optional video backends.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[cfg(feature = "video")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[cfg(feature = "video")]
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Recorded session is malformed
    #[error("Recording error: {0}")]
    RecordingError(String),

    /// Video source could not be opened or read
    #[error("Video error: {0}")]
    VideoError(String),

    /// Model loading or inference error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
