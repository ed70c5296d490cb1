use std::sync::Mutex;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MotionError, Result};
use crate::models::{Exercise, Recording};
use crate::pipeline::analyze_recording;
use crate::severity::SeverityCalibration;
use crate::telemetry::PipelineCounters;
use crate::types::{PipelineParams, RecordingReport};

/// A recording in canonical JSON form, as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    pub name: String,
    pub exercise: Exercise,
    pub body: String,
}

/// Append-only collection shared by concurrent analyses. Entries carry the
/// input position so the final order does not depend on scheduling.
#[derive(Debug)]
pub struct ResultsTable<T> {
    entries: Mutex<Vec<(usize, T)>>,
}

impl<T> Default for ResultsTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultsTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, position: usize, item: T) {
        // a panic in another worker must not lose the rows already collected
        let mut guard = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        guard.push((position, item));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items in input order.
    pub fn into_ordered(self) -> Vec<T> {
        let mut entries = self.entries.into_inner().unwrap_or_else(|p| p.into_inner());
        entries.sort_by_key(|(pos, _)| *pos);
        entries.into_iter().map(|(_, item)| item).collect()
    }
}

#[derive(Debug)]
pub struct SkippedRecording {
    pub name: String,
    pub error: MotionError,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: Vec<RecordingReport>,
    pub skipped: Vec<SkippedRecording>,
}

impl BatchOutcome {
    /// One flattened row per analysed recording.
    pub fn rows(&self) -> Vec<Vec<(String, Value)>> {
        self.reports.iter().map(RecordingReport::to_row).collect()
    }
}

/// Analyses every document in parallel. Invalid parameters abort before any
/// work starts; a malformed document is skipped and listed in the outcome.
pub fn analyze_batch(
    documents: &[CanonicalDocument],
    params: &PipelineParams,
    calibration: &SeverityCalibration,
    counters: Option<&PipelineCounters>,
) -> Result<BatchOutcome> {
    params.validate()?;
    calibration.validate()?;

    let reports = ResultsTable::new();
    let skipped = ResultsTable::new();

    documents.par_iter().enumerate().for_each(|(i, doc)| {
        let outcome = Recording::from_json(&doc.name, doc.exercise, &doc.body)
            .and_then(|rec| analyze_recording(&rec, params, calibration));
        match outcome {
            Ok(report) => {
                if let Some(c) = counters {
                    c.recordings_analyzed.inc();
                    c.repetitions_detected
                        .inc_by((report.active.n_reps + report.passive.n_reps) as u64);
                }
                reports.push(i, report);
            }
            Err(error) => {
                log::warn!("skipping {}: {}", doc.name, error);
                if let Some(c) = counters {
                    c.recordings_skipped.inc();
                }
                skipped.push(
                    i,
                    SkippedRecording {
                        name: doc.name.clone(),
                        error,
                    },
                );
            }
        }
    });

    let outcome = BatchOutcome {
        reports: reports.into_ordered(),
        skipped: skipped.into_ordered(),
    };
    log::info!(
        "batch: {} analysed, {} skipped",
        outcome.reports.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}
