//! Helper functions and utilities for tests

#![allow(dead_code)]

use squat_analysis::{
    frame::FrameSize,
    joints::{NormalizedLandmark, PoseDetection},
    landmarks::PoseLandmark,
    orientation::Orientation,
    session::FrameObservation,
    tracker::Circle,
};

/// Frame used by the synthetic poses
pub const FRAME: FrameSize = FrameSize::new(1000, 1000);

/// Knee position of the synthetic lifter, in pixels
pub const KNEE: (f64, f64) = (500.0, 600.0);

const THIGH_LENGTH: f64 = 200.0;
const SHIN_LENGTH: f64 = 200.0;
const TORSO_LENGTH: f64 = 250.0;

fn normalized(x: f64, y: f64) -> NormalizedLandmark {
    #[allow(clippy::cast_possible_truncation)]
    NormalizedLandmark::new((x / f64::from(FRAME.width)) as f32, (y / f64::from(FRAME.height)) as f32)
}

/// Side-on lifter whose corrected knee angle is `knee_angle` degrees.
///
/// The shin is vertical and both sides of the body overlap, as in a profile
/// view. Feet point in the facing direction.
#[must_use]
pub fn squat_pose(knee_angle: f64, orientation: Orientation) -> PoseDetection {
    // Facing right, the hip lies at bearing -90 - angle from the knee
    let bearing = (-90.0 - knee_angle).to_radians();
    let mirror = if orientation.is_facing_right() { 1.0 } else { -1.0 };
    let (kx, ky) = KNEE;

    let hip = (kx + mirror * THIGH_LENGTH * bearing.cos(), ky + THIGH_LENGTH * bearing.sin());
    let ankle = (kx, ky + SHIN_LENGTH);
    let heel = (kx - mirror * 20.0, ankle.1 + 20.0);
    let toe = (kx + mirror * 40.0, ankle.1 + 30.0);
    let shoulder = (hip.0, hip.1 - TORSO_LENGTH);
    let elbow = (shoulder.0 + mirror * 30.0, shoulder.1 + 40.0);
    let wrist = (shoulder.0 + mirror * 50.0, shoulder.1);
    let head = (shoulder.0 + mirror * 30.0, shoulder.1 - 80.0);

    let landmarks = PoseLandmark::ALL
        .iter()
        .map(|lm| {
            use PoseLandmark as L;
            let (x, y) = match lm {
                L::LeftShoulder | L::RightShoulder => shoulder,
                L::LeftElbow | L::RightElbow => elbow,
                L::LeftWrist | L::RightWrist | L::LeftPinky | L::RightPinky | L::LeftIndex | L::RightIndex
                | L::LeftThumb | L::RightThumb => wrist,
                L::LeftHip | L::RightHip => hip,
                L::LeftKnee | L::RightKnee => KNEE,
                L::LeftAnkle | L::RightAnkle => ankle,
                L::LeftHeel | L::RightHeel => heel,
                L::LeftFootIndex | L::RightFootIndex => toe,
                _ => head,
            };
            normalized(x, y)
        })
        .collect();

    PoseDetection::new(landmarks)
}

/// Observation with a pose and no circles
#[must_use]
pub fn observation(frame_index: u64, pose: Option<PoseDetection>) -> FrameObservation {
    FrameObservation {
        frame_index,
        size: FRAME,
        pose,
        circles: Vec::new(),
    }
}

/// Observations for a knee angle sequence
#[must_use]
pub fn squat_sequence(knee_angles: &[f64], orientation: Orientation) -> Vec<FrameObservation> {
    (0u64..)
        .zip(knee_angles)
        .map(|(i, &angle)| observation(i, Some(squat_pose(angle, orientation))))
        .collect()
}

/// A plate over the lifter's upper back, inside the synthetic lifter's box
#[must_use]
pub fn plate(x: i32, y: i32) -> Circle {
    Circle::new(x, y, 40)
}

/// One standing, bottom, standing rep
pub const ONE_REP: [f64; 10] = [5.0, 30.0, 60.0, 90.0, 115.0, 115.0, 90.0, 60.0, 30.0, 5.0];
