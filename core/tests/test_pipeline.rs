mod common;

use common::{asymmetric_recording, flat_side, stomp_side, REPS};
use motiongrade_core::{
    analyze_recording, analyze_recording_detailed, analyze_side, select_active_side, Exercise, MotionError,
    PipelineParams, Recording, SeverityCalibration, Side, SideSeries,
};

#[test]
fn stronger_side_is_active() {
    let rec = asymmetric_recording("a.json");
    let out = analyze_recording_detailed(&rec, &PipelineParams::default(), &SeverityCalibration::default()).unwrap();
    let report = &out.report;

    assert_eq!(report.file, "a.json");
    assert_eq!(report.exercise, Exercise::Stomp);
    assert_eq!(report.active_side, Side::Left);
    assert_eq!(report.passive_side, Side::Right);
    assert_eq!(report.active.n_reps, REPS);
    assert_eq!(report.passive.n_reps, REPS);

    // 50 vs 30 peak magnitude, same rhythm
    assert!((report.asymmetry.asimetria_mag.unwrap() - 0.4).abs() < 1e-9);
    assert!(report.asymmetry.asimetria_ritmo.unwrap() < 1e-9);

    assert!(report.severity.score <= 4);
    assert!((0.5..=1.0).contains(&report.severity.confidence));

    assert!(out.active.trimmed_samples < out.active.raw_samples);
    assert_eq!(out.active.signal.len(), out.active.trimmed_samples);
    assert_eq!(out.active.peaks.len(), REPS);
}

#[test]
fn analysis_is_repeatable() {
    let rec = asymmetric_recording("same.json");
    let params = PipelineParams::default();
    let cal = SeverityCalibration::default();
    let first = analyze_recording(&rec, &params, &cal).unwrap();
    let second = analyze_recording(&rec, &params, &cal).unwrap();
    assert_eq!(first, second);
}

#[test]
fn swapping_feet_swaps_the_active_side() {
    let rec = Recording::new(
        "swapped",
        Exercise::Tapping,
        stomp_side(30.0, 3.0, 1.0),
        stomp_side(50.0, 5.0, 4.0),
    );
    let report = analyze_recording(&rec, &PipelineParams::default(), &SeverityCalibration::default()).unwrap();
    assert_eq!(report.active_side, Side::Right);
    assert_eq!(report.exercise, Exercise::Tapping);
    assert!((report.active.magnitude_mean.unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn side_selection_ties_go_left() {
    let quiet = SideSeries::new(Side::Left, flat_side(10, 9.81));
    let louder = SideSeries::new(Side::Right, flat_side(10, 12.0));
    assert_eq!(select_active_side(&quiet, &louder).active, Side::Right);

    let twin = SideSeries::new(Side::Right, flat_side(10, 9.81));
    let sel = select_active_side(&quiet, &twin);
    assert_eq!(sel.active, Side::Left);
    assert_eq!(sel.passive, Side::Right);

    let empty_l = SideSeries::new(Side::Left, Vec::new());
    let empty_r = SideSeries::new(Side::Right, Vec::new());
    assert_eq!(select_active_side(&empty_l, &empty_r).active, Side::Left);
    assert_eq!(select_active_side(&empty_l, &twin).active, Side::Right);
}

#[test]
fn one_empty_side_still_reports() {
    let rec = Recording::new("one-sided", Exercise::Stomp, stomp_side(50.0, 5.0, 4.0), Vec::new());
    let report = analyze_recording(&rec, &PipelineParams::default(), &SeverityCalibration::default()).unwrap();
    assert_eq!(report.active_side, Side::Left);
    assert_eq!(report.passive.n_reps, 0);
    assert_eq!(report.asymmetry.asimetria_mag, None);
    assert_eq!(report.asymmetry.asimetria_ritmo, None);
}

#[test]
fn motionless_recording_is_not_an_error() {
    let rec = Recording::new("still", Exercise::Stomp, flat_side(200, 9.81), flat_side(200, 9.81));
    let report = analyze_recording(&rec, &PipelineParams::default(), &SeverityCalibration::default()).unwrap();
    assert_eq!(report.active.n_reps, 0);
    assert_eq!(report.severity.features_used, 0);
    assert_eq!(report.severity.score, 0);
    assert_eq!(report.severity.confidence, 0.5);
}

#[test]
fn out_of_order_samples_are_sorted() {
    let mut samples = stomp_side(50.0, 5.0, 4.0);
    let ordered = analyze_side(&SideSeries::new(Side::Left, samples.clone()), &PipelineParams::default()).unwrap();
    samples.reverse();
    let shuffled = analyze_side(&SideSeries::new(Side::Left, samples), &PipelineParams::default()).unwrap();
    assert_eq!(ordered, shuffled);
}

#[test]
fn bad_params_fail_before_processing() {
    let rec = asymmetric_recording("x");
    let params = PipelineParams { trim_window_len: 1, ..Default::default() };
    let err = analyze_recording(&rec, &params, &SeverityCalibration::default()).unwrap_err();
    assert!(matches!(err, MotionError::Parameter(_)));

    let params = PipelineParams { peak_distance: 0, ..Default::default() };
    assert!(analyze_side(rec.side(Side::Left), &params).is_err());
}

#[test]
fn non_finite_samples_are_rejected() {
    let mut left = stomp_side(50.0, 5.0, 4.0);
    left[7].gyroscope.y = f64::NAN;
    let rec = Recording::new("nan.json", Exercise::Stomp, left, Vec::new());
    let err = analyze_recording(&rec, &PipelineParams::default(), &SeverityCalibration::default()).unwrap_err();
    match err {
        MotionError::MalformedInput { source_name, detail } => {
            assert_eq!(source_name, "nan.json");
            assert!(detail.contains("LEFT[7]"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
