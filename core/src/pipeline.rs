use serde::Serialize;

use crate::asymmetry::asymmetry;
use crate::error::Result;
use crate::metrics::extract;
use crate::models::{MagnitudeSeries, PeakSet, Recording, Side, SideSeries};
use crate::peaks::detect_peaks;
use crate::severity::{classify, SeverityCalibration, SeverityFeatures};
use crate::signal::{normalize, select_active_side, SideSelection};
use crate::trimming::trim;
use crate::types::{MovementMetrics, PipelineParams, RecordingReport};

/// Intermediate results of one side, kept for plotting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideAnalysis {
    pub side: Side,
    pub raw_samples: usize,
    pub trimmed_samples: usize,
    pub signal: MagnitudeSeries,
    pub peaks: PeakSet,
    pub metrics: MovementMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingAnalysis {
    pub report: RecordingReport,
    pub selection: SideSelection,
    pub active: SideAnalysis,
    pub passive: SideAnalysis,
}

/// Normalizer → detector → extractor on an already trimmed side.
pub fn analyze_trimmed_side(trimmed: &SideSeries, raw_samples: usize, params: &PipelineParams) -> SideAnalysis {
    let signal = normalize(trimmed, params.feature_source, params.time_unit);
    let peaks = detect_peaks(&signal, &params.peak_params());
    let metrics = extract(&peaks, &signal, trimmed, params.vertical_axis);

    if peaks.len() < 2 {
        log::warn!(
            "{}: only {} repetition(s) in {} samples, rhythm metrics undefined",
            trimmed.side(),
            peaks.len(),
            trimmed.len()
        );
    }

    SideAnalysis {
        side: trimmed.side(),
        raw_samples,
        trimmed_samples: trimmed.len(),
        signal,
        peaks,
        metrics,
    }
}

/// Full pipeline for one side, trimming included.
pub fn analyze_side(series: &SideSeries, params: &PipelineParams) -> Result<SideAnalysis> {
    params.validate()?;
    let trimmed = trim(series, params.trim_enabled, params.trim_window_len, params.trim_threshold);
    Ok(analyze_trimmed_side(&trimmed, series.len(), params))
}

/// Runs every stage on both sides and keeps the intermediates.
pub fn analyze_recording_detailed(
    recording: &Recording,
    params: &PipelineParams,
    calibration: &SeverityCalibration,
) -> Result<RecordingAnalysis> {
    params.validate()?;
    calibration.validate()?;
    recording.validate()?;

    let [left_raw, right_raw] = recording.sides();
    let left = trim(left_raw, params.trim_enabled, params.trim_window_len, params.trim_threshold);
    let right = trim(right_raw, params.trim_enabled, params.trim_window_len, params.trim_threshold);

    let selection = select_active_side(&left, &right);
    let left_analysis = analyze_trimmed_side(&left, left_raw.len(), params);
    let right_analysis = analyze_trimmed_side(&right, right_raw.len(), params);
    let (active, passive) = match selection.active {
        Side::Left => (left_analysis, right_analysis),
        Side::Right => (right_analysis, left_analysis),
    };

    let asym = asymmetry(&active.metrics, &passive.metrics);
    let severity = classify(&SeverityFeatures::from_metrics(&active.metrics), calibration);

    log::info!(
        "{}: active {} ({} reps), passive {} ({} reps), severity {} ({}), confidence {:.2}",
        recording.name,
        selection.active,
        active.metrics.n_reps,
        selection.passive,
        passive.metrics.n_reps,
        severity.score,
        severity.label,
        severity.confidence
    );

    let report = RecordingReport {
        file: recording.name.clone(),
        exercise: recording.exercise,
        active_side: selection.active,
        passive_side: selection.passive,
        active: active.metrics.clone(),
        passive: passive.metrics.clone(),
        asymmetry: asym,
        severity,
    };

    Ok(RecordingAnalysis {
        report,
        selection,
        active,
        passive,
    })
}

/// Recording in, report out.
pub fn analyze_recording(
    recording: &Recording,
    params: &PipelineParams,
    calibration: &SeverityCalibration,
) -> Result<RecordingReport> {
    analyze_recording_detailed(recording, params, calibration).map(|a| a.report)
}
