//! JSON-in / JSON-out entry points shared by the Python bindings and any
//! other embedding layer.

use serde::Deserialize;
use serde_json::{self as json, Value};
use serde_path_to_error as spte;

use crate::error::{MotionError, Result};
use crate::models::{Exercise, Recording};
use crate::pipeline::analyze_recording_detailed;
use crate::severity::{classify, SeverityCalibration, SeverityFeatures};
use crate::types::PipelineParams;

fn default_name() -> String {
    "recording".to_string()
}

#[derive(Debug, Deserialize)]
struct AnalyzeIn {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    exercise: Exercise,
    /// Canonical `{"LEFT": [...], "RIGHT": [...]}`.
    recording: Value,
    #[serde(default)]
    params: PipelineParams,
    #[serde(default)]
    calibration: Option<SeverityCalibration>,
    /// Also return magnitude series and peaks of both sides.
    #[serde(default)]
    include_signals: bool,
}

#[derive(Debug, Deserialize)]
struct ClassifyIn {
    features: SeverityFeatures,
    #[serde(default)]
    calibration: Option<SeverityCalibration>,
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, json_in: &str) -> Result<T> {
    let mut de = json::Deserializer::from_str(json_in);
    spte::deserialize(&mut de)
        .map_err(|e| MotionError::malformed(what, format!("at {}: {}", e.path(), e.inner())))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    json::to_string(value).map_err(|e| MotionError::malformed("output", e.to_string()))
}

/// `{name?, exercise?, recording, params?, calibration?, include_signals?}`
/// → report JSON (or the detailed analysis when `include_signals`).
pub fn analyze_recording_json(json_in: &str) -> Result<String> {
    let input: AnalyzeIn = parse("analyze request", json_in)?;
    let recording = Recording::from_json(&input.name, input.exercise, &input.recording.to_string())?;
    let calibration = input.calibration.unwrap_or_default();
    let analysis = analyze_recording_detailed(&recording, &input.params, &calibration)?;
    if input.include_signals {
        to_json(&analysis)
    } else {
        to_json(&analysis.report)
    }
}

/// `{features, calibration?}` → severity assessment JSON.
pub fn classify_json(json_in: &str) -> Result<String> {
    let input: ClassifyIn = parse("classify request", json_in)?;
    let calibration = input.calibration.unwrap_or_default();
    calibration.validate()?;
    to_json(&classify(&input.features, &calibration))
}
