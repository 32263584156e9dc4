//! Per-frame joint positions: normalized model output, the pixel-space joint
//! map consumed by the analysis, and the lifter's bounding box.

use crate::{
    constants::HEAD_LENGTHS_PER_BODY,
    landmarks::{LandmarkSet, PoseLandmark},
    utils::safe_cast::{f32_to_i32, f64_to_i32},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One landmark as reported by the pose model, coordinates in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the hips; carried through but not used
    #[serde(default)]
    pub z: f32,
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl NormalizedLandmark {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    /// Scale to pixel coordinates, truncating like the model's reference tooling
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Frame dimensions fit comfortably in f32
    pub fn to_pixel(&self, width: u32, height: u32) -> Option<Point> {
        let x = f32_to_i32(self.x * width as f32).ok()?;
        let y = f32_to_i32(self.y * height as f32).ok()?;
        Some(Point::new(x, y))
    }
}

/// A single detected person, landmarks indexed by [`PoseLandmark`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDetection {
    pub landmarks: Vec<NormalizedLandmark>,
}

impl PoseDetection {
    #[must_use]
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        Self { landmarks }
    }

    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<&NormalizedLandmark> {
        self.landmarks.get(landmark.index())
    }
}

/// Landmark to pixel position for one frame.
///
/// A missing key means the landmark was not detected in this frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameJointMap {
    joints: BTreeMap<PoseLandmark, Point>,
}

impl FrameJointMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a detection to pixels, dropping landmarks below `min_visibility`
    #[must_use]
    pub fn from_detection(detection: &PoseDetection, width: u32, height: u32, min_visibility: f32) -> Self {
        let joints = detection
            .landmarks
            .iter()
            .enumerate()
            .filter(|(_, lm)| lm.visibility >= min_visibility)
            .filter_map(|(i, lm)| Some((PoseLandmark::from_index(i)?, lm.to_pixel(width, height)?)))
            .collect();
        Self { joints }
    }

    /// Keep only the landmarks belonging to `set`
    #[must_use]
    pub fn filtered(&self, set: &LandmarkSet) -> Self {
        let joints = self
            .joints
            .iter()
            .filter(|(lm, _)| set.contains(**lm))
            .map(|(lm, p)| (*lm, *p))
            .collect();
        Self { joints }
    }

    pub fn insert(&mut self, landmark: PoseLandmark, point: Point) {
        self.joints.insert(landmark, point);
    }

    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> Option<Point> {
        self.joints.get(&landmark).copied()
    }

    #[must_use]
    pub fn contains(&self, landmark: PoseLandmark) -> bool {
        self.joints.contains_key(&landmark)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoseLandmark, Point)> + '_ {
        self.joints.iter().map(|(lm, p)| (*lm, *p))
    }
}

impl FromIterator<(PoseLandmark, Point)> for FrameJointMap {
    fn from_iter<I: IntoIterator<Item = (PoseLandmark, Point)>>(iter: I) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

/// Axis-aligned box around the lifter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Box around every joint, raised by half a head so it covers the top of
    /// the skull. `None` when no joints were detected.
    #[must_use]
    pub fn from_joints(joints: &FrameJointMap) -> Option<Self> {
        let mut points = joints.iter().map(|(_, p)| p);
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let head_length = (f64::from(max.y) - f64::from(min.y)) / HEAD_LENGTHS_PER_BODY;
        min.y = f64_to_i32(f64::from(min.y) - head_length / 2.0).unwrap_or(min.y);

        Some(Self { min, max })
    }

    /// Box around every landmark of `detection` that maps onto a pixel,
    /// regardless of visibility
    #[must_use]
    pub fn from_detection(detection: &PoseDetection, width: u32, height: u32) -> Option<Self> {
        let joints: FrameJointMap = detection
            .landmarks
            .iter()
            .enumerate()
            .filter_map(|(i, lm)| Some((PoseLandmark::from_index(i)?, lm.to_pixel(width, height)?)))
            .collect();
        Self::from_joints(&joints)
    }

    /// Strictly between the left and right edges
    #[must_use]
    pub fn spans_x(&self, x: i32) -> bool {
        self.min.x < x && x < self.max.x
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Side;

    #[test]
    fn test_to_pixel_truncates() {
        let lm = NormalizedLandmark::new(0.5, 0.251);
        assert_eq!(lm.to_pixel(640, 480), Some(Point::new(320, 120)));
    }

    #[test]
    fn test_to_pixel_rejects_nan() {
        let lm = NormalizedLandmark::new(f32::NAN, 0.5);
        assert_eq!(lm.to_pixel(640, 480), None);
    }

    #[test]
    fn test_from_detection_drops_low_visibility() {
        let mut landmarks = vec![NormalizedLandmark::new(0.5, 0.5); PoseLandmark::COUNT];
        landmarks[PoseLandmark::LeftKnee.index()].visibility = 0.1;
        let map = FrameJointMap::from_detection(&PoseDetection::new(landmarks), 100, 100, 0.5);
        assert_eq!(map.len(), PoseLandmark::COUNT - 1);
        assert!(!map.contains(PoseLandmark::LeftKnee));
        assert_eq!(map.get(PoseLandmark::Nose), Some(Point::new(50, 50)));
    }

    #[test]
    fn test_from_short_detection() {
        let detection = PoseDetection::new(vec![NormalizedLandmark::new(0.1, 0.2)]);
        let map = FrameJointMap::from_detection(&detection, 100, 100, 0.0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(PoseLandmark::Nose), Some(Point::new(10, 20)));
    }

    #[test]
    fn test_filtered_keeps_one_side() {
        let map: FrameJointMap = [
            (PoseLandmark::LeftKnee, Point::new(1, 1)),
            (PoseLandmark::RightKnee, Point::new(2, 2)),
            (PoseLandmark::Nose, Point::new(3, 3)),
        ]
        .into_iter()
        .collect();
        let right = map.filtered(&LandmarkSet::for_side(Side::Right));
        assert!(right.contains(PoseLandmark::RightKnee));
        assert!(right.contains(PoseLandmark::Nose));
        assert!(!right.contains(PoseLandmark::LeftKnee));
    }

    #[test]
    fn test_bounding_box_adds_half_head() {
        let map: FrameJointMap = [
            (PoseLandmark::Nose, Point::new(100, 100)),
            (PoseLandmark::LeftHeel, Point::new(80, 400)),
            (PoseLandmark::RightFootIndex, Point::new(160, 390)),
        ]
        .into_iter()
        .collect();
        let bbox = BoundingBox::from_joints(&map).unwrap();
        // 300 / 7.5 = 40, half of that raises the top by 20
        assert_eq!(bbox.min, Point::new(80, 80));
        assert_eq!(bbox.max, Point::new(160, 400));
        assert!(bbox.spans_x(120));
        assert!(!bbox.spans_x(80));
        assert!(!bbox.spans_x(160));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(BoundingBox::from_joints(&FrameJointMap::new()).is_none());
    }
}
