//! Signed joint angles with orientation-dependent correction.
//!
//! The raw angle at the vertex is the difference of the two ray bearings,
//! wrapped into [0, 360). Which way that difference turns depends on the side
//! of the body being measured, so each (joint, orientation) pair has its own
//! correction bringing both orientations onto the same scale: a straight leg
//! reads about 0 degrees at the knee and an upright torso about 180 at the hip.

use crate::{
    joints::{FrameJointMap, Point},
    landmarks::{AngleTriple, LandmarkSet},
    orientation::Orientation,
};
use serde::{Deserialize, Serialize};

/// Joint category, selects the correction rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    Knee,
    Hip,
}

type Correction = fn(f64) -> f64;

/// {knee, hip} x {right, left}
const CORRECTIONS: [(JointKind, Orientation, Correction); 4] = [
    (JointKind::Knee, Orientation::Right, knee_facing_right),
    (JointKind::Knee, Orientation::Left, knee_facing_left),
    (JointKind::Hip, Orientation::Right, hip_facing_right),
    (JointKind::Hip, Orientation::Left, hip_facing_left),
];

fn knee_facing_right(raw: f64) -> f64 {
    raw - 180.0
}

fn knee_facing_left(raw: f64) -> f64 {
    180.0 - raw
}

fn hip_facing_right(raw: f64) -> f64 {
    raw
}

fn hip_facing_left(raw: f64) -> f64 {
    360.0 - raw
}

/// Bearing difference at `vertex` from the ray to `a` to the ray to `b`, in [0, 360)
#[must_use]
pub fn raw_angle(a: Point, vertex: Point, b: Point) -> f64 {
    let bearing = |p: Point| (f64::from(p.y) - f64::from(vertex.y)).atan2(f64::from(p.x) - f64::from(vertex.x));
    let degrees = (bearing(b) - bearing(a)).to_degrees();
    degrees.rem_euclid(360.0)
}

/// Apply the correction rule for `kind` viewed from `orientation`
#[must_use]
pub fn correct(kind: JointKind, orientation: Orientation, raw: f64) -> f64 {
    CORRECTIONS
        .iter()
        .find(|(k, o, _)| *k == kind && *o == orientation)
        .map_or(raw, |(_, _, rule)| rule(raw))
}

/// Corrected angle at the middle landmark of `triple`.
///
/// `None` when any of the three landmarks is absent from `joints`.
#[must_use]
pub fn joint_angle(joints: &FrameJointMap, triple: AngleTriple, kind: JointKind, orientation: Orientation) -> Option<f64> {
    let [p1, p2, p3] = triple;
    let raw = raw_angle(joints.get(p1)?, joints.get(p2)?, joints.get(p3)?);
    Some(correct(kind, orientation, raw))
}

/// Hip and knee angles for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub hip: Option<f64>,
    pub knee: Option<f64>,
}

impl JointAngles {
    /// Measure both angles from the triples of `set`
    #[must_use]
    pub fn measure(joints: &FrameJointMap, set: &LandmarkSet, orientation: Orientation) -> Self {
        Self {
            hip: joint_angle(joints, set.hip_angle, JointKind::Hip, orientation),
            knee: joint_angle(joints, set.knee_angle, JointKind::Knee, orientation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{PoseLandmark, Side};

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_raw_angle_straight_line() {
        // Hip above knee above ankle
        let raw = raw_angle(Point::new(0, -100), Point::new(0, 0), Point::new(0, 100));
        assert!((raw - 180.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_raw_angle_wraps_negative() {
        // Bearing to b is 90, bearing to a is 180: -90 wraps to 270
        let raw = raw_angle(Point::new(-100, 0), Point::new(0, 0), Point::new(0, 100));
        assert!((raw - 270.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_raw_angle_at_coordinate_extremes() {
        let raw = raw_angle(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0), Point::new(i32::MAX, i32::MAX));
        assert!((raw - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_correction_table() {
        assert!((correct(JointKind::Knee, Orientation::Right, 270.0) - 90.0).abs() < TOLERANCE);
        assert!((correct(JointKind::Knee, Orientation::Left, 90.0) - 90.0).abs() < TOLERANCE);
        assert!((correct(JointKind::Hip, Orientation::Right, 60.0) - 60.0).abs() < TOLERANCE);
        assert!((correct(JointKind::Hip, Orientation::Left, 300.0) - 60.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_parallel_squat_reads_the_same_both_ways() {
        // Thigh horizontal, shin vertical, lifter facing right: hip behind the knee
        let right: FrameJointMap = [
            (PoseLandmark::RightHip, Point::new(100, 300)),
            (PoseLandmark::RightKnee, Point::new(200, 300)),
            (PoseLandmark::RightAnkle, Point::new(200, 400)),
        ]
        .into_iter()
        .collect();
        let set = LandmarkSet::for_side(Side::Right);
        let knee_right = joint_angle(&right, set.knee_angle, JointKind::Knee, Orientation::Right).unwrap();

        // Mirror image facing left
        let left: FrameJointMap = [
            (PoseLandmark::LeftHip, Point::new(300, 300)),
            (PoseLandmark::LeftKnee, Point::new(200, 300)),
            (PoseLandmark::LeftAnkle, Point::new(200, 400)),
        ]
        .into_iter()
        .collect();
        let set = LandmarkSet::for_side(Side::Left);
        let knee_left = joint_angle(&left, set.knee_angle, JointKind::Knee, Orientation::Left).unwrap();

        assert!((knee_right - 90.0).abs() < TOLERANCE);
        assert!((knee_left - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_missing_landmark_is_undefined() {
        let joints: FrameJointMap = [
            (PoseLandmark::RightHip, Point::new(100, 300)),
            (PoseLandmark::RightKnee, Point::new(200, 300)),
        ]
        .into_iter()
        .collect();
        let set = LandmarkSet::for_side(Side::Right);
        let angles = JointAngles::measure(&joints, &set, Orientation::Right);
        assert_eq!(angles, JointAngles::default());
    }
}
