mod common;

use common::{flat_side, stomp_side, CYCLE, IDLE, REPS};
use motiongrade_core::trimming::activity_onset;
use motiongrade_core::{trim, trim_inactivity, Side, SideSeries};

#[test]
fn idle_lead_in_is_dropped() {
    let series = SideSeries::new(Side::Left, stomp_side(50.0, 5.0, 4.0));
    let trimmed = trim_inactivity(&series, 50, 0.5);

    // the first moving window starts at most one window before motion onset
    assert!(trimmed.len() < series.len());
    assert!(trimmed.len() >= REPS * CYCLE);
    assert!(trimmed.len() <= REPS * CYCLE + 49);
    assert_eq!(trimmed.side(), Side::Left);

    // the suffix keeps the tail untouched
    assert_eq!(trimmed.samples().last(), series.samples().last());
    let start = series.len() - trimmed.len();
    assert!(start <= IDLE);
    assert_eq!(trimmed.samples()[0], series.samples()[start]);
}

#[test]
fn motionless_side_comes_back_unchanged() {
    let series = SideSeries::new(Side::Right, flat_side(300, 9.81));
    assert_eq!(activity_onset(&series, 50, 0.5), None);
    let trimmed = trim_inactivity(&series, 50, 0.5);
    assert_eq!(trimmed, series);
}

#[test]
fn shorter_than_one_window_is_kept() {
    let series = SideSeries::new(Side::Left, stomp_side(50.0, 5.0, 4.0)[..30].to_vec());
    let trimmed = trim_inactivity(&series, 50, 0.5);
    assert_eq!(trimmed.len(), 30);
}

#[test]
fn never_empties_a_non_empty_side() {
    for threshold in [0.0, 0.1, 0.5, 2.0, 100.0] {
        let series = SideSeries::new(Side::Left, stomp_side(50.0, 5.0, 4.0));
        let trimmed = trim_inactivity(&series, 50, threshold);
        assert!(!trimmed.is_empty(), "threshold {threshold}");
        assert!(trimmed.len() <= series.len());
    }
}

#[test]
fn disabled_trim_passes_through() {
    let series = SideSeries::new(Side::Left, stomp_side(50.0, 5.0, 4.0));
    let out = trim(&series, false, 50, 0.5);
    assert_eq!(out, series);
}

#[test]
fn empty_side_stays_empty() {
    let series = SideSeries::new(Side::Left, Vec::new());
    assert!(trim_inactivity(&series, 50, 0.5).is_empty());
}
