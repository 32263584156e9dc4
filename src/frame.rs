//! Frame dimensions and the resolution envelope frames are resized into
//! before pose inference. Smaller frames lower inference latency; the pose
//! model wants at least 360x480.

use crate::constants::{MAX_FRAME_HEIGHT, MAX_FRAME_WIDTH, MIN_FRAME_HEIGHT, MIN_FRAME_WIDTH};
use serde::{Deserialize, Serialize};

/// Width and height of a frame in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Row separating the upper and lower halves of the frame
    #[must_use]
    pub fn mid_height(&self) -> f64 {
        f64::from(self.height) / 2.0
    }
}

/// Target size for a frame of `size`, only the first violated rule applies.
///
/// Returns `size` unchanged when it is already inside the envelope.
#[must_use]
pub fn fit_to_envelope(size: FrameSize) -> FrameSize {
    let (w, h) = (i64::from(size.width), i64::from(size.height));
    let (min_w, min_h) = (i64::from(MIN_FRAME_WIDTH), i64::from(MIN_FRAME_HEIGHT));
    let (max_w, max_h) = (i64::from(MAX_FRAME_WIDTH), i64::from(MAX_FRAME_HEIGHT));

    let (w, h) = if h < min_h && w < min_w {
        (min_w, min_h)
    } else if w < min_w {
        (min_w, h)
    } else if h < min_h {
        (w, min_h)
    } else if h > max_h && w > max_w {
        (max_w, max_h)
    } else if w > max_w {
        (max_w, h)
    } else if h > max_h {
        (w, max_h)
    } else {
        return size;
    };

    FrameSize::new(
        u32::try_from(w).unwrap_or(size.width),
        u32::try_from(h).unwrap_or(size.height),
    )
}
