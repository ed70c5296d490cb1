mod common;

use common::{asymmetric_recording, canonical_body};
use motiongrade_core::batch::ResultsTable;
use motiongrade_core::telemetry::PipelineCounters;
use motiongrade_core::{
    analyze_batch, CanonicalDocument, Exercise, MotionError, PipelineParams, RecordingReport,
    SeverityCalibration,
};
use prometheus::Registry;
use serde_json::json;

fn doc(name: &str, body: String) -> CanonicalDocument {
    CanonicalDocument {
        name: name.to_string(),
        exercise: Exercise::Stomp,
        body,
    }
}

#[test]
fn malformed_documents_are_skipped_in_order() {
    let good = canonical_body(&asymmetric_recording("unused"));
    let docs = vec![
        doc("a.json", good.clone()),
        doc("b.json", "{not json".to_string()),
        doc("c.json", good),
        doc("d.json", json!({ "LEFT": [{ "timestamp": 0.0 }] }).to_string()),
    ];

    let counters = PipelineCounters::new().unwrap();
    let registry = Registry::new();
    counters.register(&registry).unwrap();

    let out = analyze_batch(&docs, &PipelineParams::default(), &SeverityCalibration::default(), Some(&counters))
        .unwrap();

    let names: Vec<&str> = out.reports.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(names, vec!["a.json", "c.json"]);
    let skipped: Vec<&str> = out.skipped.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(skipped, vec!["b.json", "d.json"]);
    assert!(out
        .skipped
        .iter()
        .all(|s| matches!(s.error, MotionError::MalformedInput { .. })));

    // missing fields are reported with their JSON path
    let detail = out.skipped[1].error.to_string();
    assert!(detail.contains("LEFT[0]"), "{detail}");

    assert_eq!(counters.recordings_analyzed.get(), 2);
    assert_eq!(counters.recordings_skipped.get(), 2);
    let reps: u64 = out
        .reports
        .iter()
        .map(|r| (r.active.n_reps + r.passive.n_reps) as u64)
        .sum();
    assert_eq!(counters.repetitions_detected.get(), reps);

    let families = registry.gather();
    assert_eq!(families.len(), 3);
}

#[test]
fn batch_matches_single_analysis() {
    let rec = asymmetric_recording("solo.json");
    let single = motiongrade_core::analyze_recording(&rec, &PipelineParams::default(), &SeverityCalibration::default())
        .unwrap();
    let out = analyze_batch(
        &[doc("solo.json", canonical_body(&rec))],
        &PipelineParams::default(),
        &SeverityCalibration::default(),
        None,
    )
    .unwrap();
    let batched = &out.reports[0];
    assert_eq!(batched.file, single.file);
    assert_eq!(batched.active_side, single.active_side);
    assert_eq!(batched.active.n_reps, single.active.n_reps);
    assert_eq!(batched.severity.score, single.severity.score);
    // JSON text round trip may move the last bit of a float
    let (a, b) = (batched.active.magnitude_mean.unwrap(), single.active.magnitude_mean.unwrap());
    assert!((a - b).abs() < 1e-9);
    assert_eq!(out.rows().len(), 1);
}

#[test]
fn invalid_configuration_aborts_the_batch() {
    let docs = vec![doc("a.json", "{}".to_string())];
    let params = PipelineParams { trim_threshold: -1.0, ..Default::default() };
    let err = analyze_batch(&docs, &params, &SeverityCalibration::default(), None).unwrap_err();
    assert!(matches!(err, MotionError::Parameter(_)));
}

#[test]
fn empty_document_has_two_empty_sides() {
    let out = analyze_batch(
        &[doc("empty.json", "{}".to_string())],
        &PipelineParams::default(),
        &SeverityCalibration::default(),
        None,
    )
    .unwrap();
    let report: &RecordingReport = &out.reports[0];
    assert_eq!(report.active.n_reps, 0);
    assert!(out.skipped.is_empty());
}

#[test]
fn results_table_orders_by_position() {
    let table = ResultsTable::new();
    std::thread::scope(|s| {
        for i in (0..8).rev() {
            let t = &table;
            s.spawn(move || t.push(i, i * 10));
        }
    });
    assert_eq!(table.len(), 8);
    assert_eq!(table.into_ordered(), vec![0, 10, 20, 30, 40, 50, 60, 70]);
}
