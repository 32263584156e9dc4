//! Tests for orientation-corrected joint angles

mod test_helpers;

use proptest::prelude::*;
use squat_analysis::{
    angle::{correct, joint_angle, raw_angle, JointAngles, JointKind},
    joints::{FrameJointMap, Point},
    landmarks::{LandmarkSet, PoseLandmark, Side},
    orientation::Orientation,
};
use test_helpers::{squat_pose, FRAME};

const TOLERANCE: f64 = 1.0;

fn joints_for(knee_angle: f64, orientation: Orientation) -> FrameJointMap {
    FrameJointMap::from_detection(&squat_pose(knee_angle, orientation), FRAME.width, FRAME.height, 0.0)
}

#[test]
fn test_missing_vertex_is_undefined() {
    let joints: FrameJointMap = [
        (PoseLandmark::RightHip, Point::new(300, 600)),
        (PoseLandmark::RightAnkle, Point::new(500, 800)),
    ]
    .into_iter()
    .collect();
    let set = LandmarkSet::for_side(Side::Right);
    assert_eq!(joint_angle(&joints, set.knee_angle, JointKind::Knee, Orientation::Right), None);
}

#[test]
fn test_knee_correction_rules() {
    let raw = 250.0;
    assert!((correct(JointKind::Knee, Orientation::Right, raw) - (raw - 180.0)).abs() < f64::EPSILON);
    assert!((correct(JointKind::Knee, Orientation::Left, raw) - (180.0 - raw)).abs() < f64::EPSILON);
}

#[test]
fn test_hip_correction_rules() {
    let raw = 200.0;
    assert!((correct(JointKind::Hip, Orientation::Right, raw) - raw).abs() < f64::EPSILON);
    assert!((correct(JointKind::Hip, Orientation::Left, raw) - (360.0 - raw)).abs() < f64::EPSILON);
}

#[test]
fn test_raw_angle_is_wrapped() {
    let vertex = Point::new(0, 0);
    for (a, b) in [
        (Point::new(10, 0), Point::new(0, 10)),
        (Point::new(0, 10), Point::new(10, 0)),
        (Point::new(-10, -10), Point::new(10, 10)),
    ] {
        let raw = raw_angle(a, vertex, b);
        assert!((0.0..360.0).contains(&raw), "raw angle {raw} out of range");
    }
}

#[test]
fn test_synthetic_squat_angles_facing_right() {
    let set = Orientation::Right.landmark_set();
    for knee in [5.0, 45.0, 90.0, 115.0] {
        let angles = JointAngles::measure(&joints_for(knee, Orientation::Right), &set, Orientation::Right);
        let measured = angles.knee.unwrap();
        assert!((measured - knee).abs() < TOLERANCE, "expected {knee}, got {measured}");
        assert!(angles.hip.is_some());
    }
}

#[test]
fn test_mirrored_lifter_reads_the_same() {
    for knee in [10.0, 60.0, 100.0] {
        let right = JointAngles::measure(
            &joints_for(knee, Orientation::Right),
            &Orientation::Right.landmark_set(),
            Orientation::Right,
        );
        let left = JointAngles::measure(
            &joints_for(knee, Orientation::Left),
            &Orientation::Left.landmark_set(),
            Orientation::Left,
        );
        assert!((right.knee.unwrap() - left.knee.unwrap()).abs() < TOLERANCE);
        assert!((right.hip.unwrap() - left.hip.unwrap()).abs() < TOLERANCE);
    }
}

proptest! {
    #[test]
    fn prop_raw_angle_in_range(
        ax in -500i32..500, ay in -500i32..500,
        bx in -500i32..500, by in -500i32..500,
    ) {
        let raw = raw_angle(Point::new(ax, ay), Point::new(0, 0), Point::new(bx, by));
        prop_assert!((0.0..360.0).contains(&raw));
    }

    #[test]
    fn prop_swapping_rays_complements(
        ax in 1i32..500, ay in 1i32..500,
        bx in -500i32..-1, by in 1i32..500,
    ) {
        let vertex = Point::new(0, 0);
        let forward = raw_angle(Point::new(ax, ay), vertex, Point::new(bx, by));
        let backward = raw_angle(Point::new(bx, by), vertex, Point::new(ax, ay));
        prop_assert!((forward + backward - 360.0).abs() < 1e-9);
    }
}
