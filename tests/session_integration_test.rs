//! End-to-end tests of the frame pipeline on synthetic lifters

mod test_helpers;

use squat_analysis::{
    orientation::{Orientation, OrientationUpdate, RecheckPolicy},
    rep_counter::Direction,
    session::{SessionConfig, SquatSession},
};
use test_helpers::{observation, plate, squat_pose, squat_sequence, ONE_REP};

#[test]
fn test_one_rep_facing_right() {
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let summary = session.run(&squat_sequence(&ONE_REP, Orientation::Right));

    assert_eq!(summary.reps, 1.0);
    assert_eq!(summary.orientation, Orientation::Right);
    assert_eq!(summary.frames_processed, 10);
    assert_eq!(summary.frames_with_pose, 10);
}

#[test]
fn test_sweep_from_bottom_stopping_short_counts_one() {
    // Stops at 91 rather than returning to the bottom, which would count 1.5.
    // Endpoints overshoot the calibration so pixel rounding cannot miss them.
    let angles = [112.0, 91.0, 72.0, 53.0, 34.0, 13.0, 34.0, 53.0, 72.0, 91.0];
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let summary = session.run(&squat_sequence(&angles, Orientation::Right));
    assert_eq!(summary.reps, 1.0);
    assert_eq!(session.rep_counter().direction(), Direction::Down);
}

#[test]
fn test_full_sweep_from_bottom_counts_one_and_a_half() {
    let angles = [112.0, 91.0, 72.0, 53.0, 34.0, 13.0, 34.0, 53.0, 72.0, 91.0, 112.0];
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let summary = session.run(&squat_sequence(&angles, Orientation::Right));
    assert_eq!(summary.reps, 1.5);
    assert_eq!(session.rep_counter().direction(), Direction::Up);
}

#[test]
fn test_one_rep_facing_left_with_wrong_default() {
    let config = SessionConfig {
        default_orientation: Orientation::Right,
        ..SessionConfig::default()
    };
    let mut session = SquatSession::new(config).unwrap();
    let frames = squat_sequence(&ONE_REP, Orientation::Left);

    let first = session.process_frame(&frames[0]);
    assert_eq!(first.orientation_update, OrientationUpdate::Changed);
    assert_eq!(first.orientation, Orientation::Left);

    let summary = session.run(&frames[1..]);
    assert_eq!(summary.reps, 1.0);
    assert_eq!(summary.orientation, Orientation::Left);
}

#[test]
fn test_several_reps() {
    let angles: Vec<f64> = ONE_REP.iter().copied().cycle().take(ONE_REP.len() * 3).collect();
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    assert_eq!(session.run(&squat_sequence(&angles, Orientation::Right)).reps, 3.0);
}

#[test]
fn test_rep_events_reported_per_frame() {
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let events: Vec<_> = squat_sequence(&ONE_REP, Orientation::Right)
        .iter()
        .filter_map(|obs| session.process_frame(obs).rep_event)
        .collect();
    assert_eq!(events, vec![Direction::Up, Direction::Down]);
}

#[test]
fn test_dropped_pose_frames_do_not_disturb_count() {
    let mut frames = squat_sequence(&ONE_REP, Orientation::Right);
    frames.insert(3, observation(100, None));
    frames.insert(7, observation(101, None));

    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let summary = session.run(&frames);
    assert_eq!(summary.reps, 1.0);
    assert_eq!(summary.frames_processed, 12);
    assert_eq!(summary.frames_with_pose, 10);
}

#[test]
fn test_smoothing_still_reaches_endpoints_when_held() {
    let angles = [5.0, 5.0, 5.0, 60.0, 115.0, 115.0, 115.0, 60.0, 5.0, 5.0, 5.0];
    let config = SessionConfig {
        smoothing: "median:3".to_string(),
        ..SessionConfig::default()
    };
    let mut session = SquatSession::new(config).unwrap();
    assert_eq!(session.run(&squat_sequence(&angles, Orientation::Right)).reps, 1.0);
}

#[test]
fn test_plate_follows_the_lifter() {
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let mut frames = squat_sequence(&[5.0, 5.0, 5.0, 5.0], Orientation::Right);
    for (i, frame) in (0i32..).zip(frames.iter_mut()) {
        frame.circles = vec![plate(510, 160 + i * 5)];
    }

    let reports: Vec<_> = frames.iter().map(|obs| session.process_frame(obs)).collect();
    assert!(reports.iter().all(|r| r.plate.is_some()));
    assert_eq!(reports[3].path.segments.len(), 3);
    assert_eq!(session.summary().trajectory_len, 4);
    assert_eq!(session.summary().path_resets, 0);
}

#[test]
fn test_plate_without_lifter_is_ignored() {
    let mut session = SquatSession::new(SessionConfig::default()).unwrap();
    let mut frame = observation(0, None);
    frame.circles = vec![plate(510, 160)];
    let report = session.process_frame(&frame);
    assert_eq!(report.plate, None);
    assert_eq!(session.barbell().no_detection_streak(), 1);
}

#[test]
fn test_recheck_follows_a_turn() {
    let config = SessionConfig {
        recheck: RecheckPolicy {
            interval_frames: 2,
            window_frames: 10,
        },
        ..SessionConfig::default()
    };
    let mut session = SquatSession::new(config).unwrap();
    session.process_frame(&observation(0, Some(squat_pose(5.0, Orientation::Right))));
    session.process_frame(&observation(1, Some(squat_pose(5.0, Orientation::Left))));
    assert_eq!(session.orientation(), Orientation::Right);
    let report = session.process_frame(&observation(2, Some(squat_pose(5.0, Orientation::Left))));
    assert_eq!(report.orientation_update, OrientationUpdate::Changed);
    assert_eq!(session.orientation(), Orientation::Left);
}
