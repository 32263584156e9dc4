//! Tests for the half-rep state machine

use proptest::prelude::*;
use squat_analysis::rep_counter::{Direction, RepCalibration, RepCounter};

#[test]
fn test_one_rep_from_percentages() {
    let mut counter = RepCounter::default();
    let events: Vec<_> = [0.0, 0.0, 50.0, 100.0, 100.0, 50.0, 0.0]
        .into_iter()
        .filter_map(|pct| counter.update_percentage(pct))
        .collect();
    assert_eq!(events, vec![Direction::Up, Direction::Down]);
    assert_eq!(counter.count(), 1.0);
}

#[test]
fn test_sweep_from_bottom_stopping_short_counts_one() {
    // Starting in Down, the opening 110 is itself a half rep. Returning all the
    // way to 110 would add another and read 1.5; this sweep stops at 91.
    let mut counter = RepCounter::default();
    for knee in [110.0, 91.0, 72.0, 53.0, 34.0, 15.0, 34.0, 53.0, 72.0, 91.0] {
        counter.update_angle(knee);
    }
    assert_eq!(counter.count(), 1.0);
    assert_eq!(counter.direction(), Direction::Down);
}

#[test]
fn test_held_bottom_counts_half() {
    let mut counter = RepCounter::default();
    for _ in 0..3 {
        counter.update_percentage(100.0);
    }
    assert_eq!(counter.count(), 0.5);
    assert_eq!(counter.direction(), Direction::Up);
}

#[test]
fn test_full_sweep_from_bottom_counts_one_and_a_half() {
    // 110 -> 15 -> 110: bottom half rep, standing half rep, bottom half rep
    let mut counter = RepCounter::default();
    for knee in [110.0, 60.0, 15.0, 60.0, 110.0] {
        counter.update_angle(knee);
    }
    assert_eq!(counter.count(), 1.5);
}

#[test]
fn test_hovering_inside_range_never_counts() {
    let mut counter = RepCounter::default();
    for knee in [16.0, 50.0, 109.0, 50.0, 16.0] {
        assert_eq!(counter.update_angle(knee), None);
    }
    assert_eq!(counter.count(), 0.0);
}

#[test]
fn test_nan_percentage_is_ignored() {
    let mut counter = RepCounter::default();
    assert_eq!(counter.update_percentage(f64::NAN), None);
    assert_eq!(counter.direction(), Direction::Down);
}

#[test]
fn test_custom_calibration() {
    let calibration = RepCalibration {
        zero_percent_angle: 0.0,
        full_percent_angle: 90.0,
    };
    let mut counter = RepCounter::new(calibration);
    counter.update_angle(95.0);
    counter.update_angle(45.0);
    counter.update_angle(-5.0);
    assert_eq!(counter.count(), 1.0);
    assert_eq!(counter.calibration(), &calibration);
}

proptest! {
    #[test]
    fn prop_count_is_half_of_half_reps_and_never_drops(
        percentages in prop::collection::vec(prop_oneof![Just(0.0), Just(100.0), 0.0f64..100.0], 0..200)
    ) {
        let mut counter = RepCounter::default();
        let mut previous = 0.0;
        for pct in percentages {
            counter.update_percentage(pct);
            prop_assert!(counter.count() >= previous);
            prop_assert_eq!(counter.count() * 2.0, f64::from(counter.half_reps()));
            previous = counter.count();
        }
    }

    #[test]
    fn prop_percentage_is_clamped(angle in -1000.0f64..1000.0) {
        let pct = RepCalibration::default().percentage(angle);
        prop_assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn prop_direction_alternates(
        percentages in prop::collection::vec(prop_oneof![Just(0.0), Just(100.0)], 1..100)
    ) {
        let mut counter = RepCounter::default();
        let mut last = Direction::Down;
        for pct in percentages {
            if let Some(next) = counter.update_percentage(pct) {
                prop_assert_ne!(next, last);
                last = next;
            }
        }
    }
}
