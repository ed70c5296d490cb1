use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MotionError, Result};
use crate::models::{Exercise, MagnitudeSource, Side, Vec3};
use crate::severity::SeverityAssessment;

/// Unit of the device timestamps. Fixed per deployment, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    #[inline]
    pub fn to_seconds(&self, dt: f64) -> f64 {
        match self {
            TimeUnit::Milliseconds => dt / 1000.0,
            TimeUnit::Seconds => dt,
        }
    }
}

/// Accelerometer axis treated as vertical for the amplitude integration.
/// Depends on how the sensor is strapped to the foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAxis {
    X,
    Y,
    #[default]
    Z,
}

impl VerticalAxis {
    #[inline]
    pub fn component(&self, v: &Vec3) -> f64 {
        match self {
            VerticalAxis::X => v.x,
            VerticalAxis::Y => v.y,
            VerticalAxis::Z => v.z,
        }
    }
}

/// Repetition detector constraints. `None` disables a constraint, except
/// prominence, where `None` selects the dynamic default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    pub height: Option<f64>,
    pub distance: usize,
    pub prominence: Option<f64>,
    pub width: Option<f64>,
    /// Keep only the N most prominent peaks.
    pub max_peaks: Option<usize>,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            height: None,
            distance: 8,
            prominence: None,
            width: None,
            max_peaks: None,
        }
    }
}

impl PeakParams {
    pub fn validate(&self) -> Result<()> {
        if self.distance == 0 {
            return Err(MotionError::parameter("peak_distance must be >= 1"));
        }
        if let Some(h) = self.height {
            if !h.is_finite() {
                return Err(MotionError::parameter(format!("peak_height must be finite, got {h}")));
            }
        }
        if let Some(p) = self.prominence {
            if !p.is_finite() || p < 0.0 {
                return Err(MotionError::parameter(format!(
                    "peak_prominence must be finite and >= 0, got {p}"
                )));
            }
        }
        if let Some(w) = self.width {
            if !w.is_finite() || w < 0.0 {
                return Err(MotionError::parameter(format!(
                    "peak_width must be finite and >= 0, got {w}"
                )));
            }
        }
        if self.max_peaks == Some(0) {
            return Err(MotionError::parameter("max_peaks must be >= 1 when set"));
        }
        Ok(())
    }
}

/// Tunables for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub trim_enabled: bool,
    pub trim_window_len: usize,
    pub trim_threshold: f64, // std of accel magnitude, m/s²
    pub peak_height: Option<f64>,
    pub peak_distance: usize,
    pub peak_prominence: Option<f64>,
    pub peak_width: Option<f64>,
    pub max_peaks: Option<usize>,
    pub time_unit: TimeUnit,
    pub feature_source: MagnitudeSource,
    pub vertical_axis: VerticalAxis,
}

impl Default for PipelineParams {
    fn default() -> Self {
        let peaks = PeakParams::default();
        Self {
            trim_enabled: true,
            trim_window_len: 50,
            trim_threshold: 0.5,
            peak_height: peaks.height,
            peak_distance: peaks.distance,
            peak_prominence: peaks.prominence,
            peak_width: peaks.width,
            max_peaks: peaks.max_peaks,
            time_unit: TimeUnit::default(),
            feature_source: MagnitudeSource::default(),
            vertical_axis: VerticalAxis::default(),
        }
    }
}

impl PipelineParams {
    pub fn peak_params(&self) -> PeakParams {
        PeakParams {
            height: self.peak_height,
            distance: self.peak_distance,
            prominence: self.peak_prominence,
            width: self.peak_width,
            max_peaks: self.max_peaks,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.trim_window_len < 2 {
            return Err(MotionError::parameter(format!(
                "trim_window_len must be >= 2, got {}",
                self.trim_window_len
            )));
        }
        if !self.trim_threshold.is_finite() || self.trim_threshold < 0.0 {
            return Err(MotionError::parameter(format!(
                "trim_threshold must be finite and >= 0, got {}",
                self.trim_threshold
            )));
        }
        self.peak_params().validate()
    }
}

/// Per-side repetition metrics. `None` marks a value the recording is too
/// short to define.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementMetrics {
    pub n_reps: usize,
    pub magnitude_mean: Option<f64>,
    pub magnitude_max: Option<f64>,
    pub rep_time_mean: Option<f64>, // s
    pub rep_time_std: Option<f64>,  // s
    pub fatigue_index: Option<f64>,
    pub slowdown_rate: Option<f64>, // s per rep
    pub vertical_amplitude_mean: Option<f64>, // m
    pub vertical_amplitude_decay: Option<f64>, // m per rep
    pub vertical_amplitude_ratio: Option<f64>,
    pub hesitations: usize,
}

impl MovementMetrics {
    /// Metrics of a side without any repetition.
    pub fn empty() -> Self {
        Self {
            n_reps: 0,
            magnitude_mean: None,
            magnitude_max: None,
            rep_time_mean: None,
            rep_time_std: None,
            fatigue_index: None,
            slowdown_rate: None,
            vertical_amplitude_mean: None,
            vertical_amplitude_decay: None,
            vertical_amplitude_ratio: None,
            hesitations: 0,
        }
    }

    /// Column name / value pairs in declaration order.
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("n_reps", Value::from(self.n_reps)),
            ("magnitude_mean", opt(self.magnitude_mean)),
            ("magnitude_max", opt(self.magnitude_max)),
            ("rep_time_mean", opt(self.rep_time_mean)),
            ("rep_time_std", opt(self.rep_time_std)),
            ("fatigue_index", opt(self.fatigue_index)),
            ("slowdown_rate", opt(self.slowdown_rate)),
            ("vertical_amplitude_mean", opt(self.vertical_amplitude_mean)),
            ("vertical_amplitude_decay", opt(self.vertical_amplitude_decay)),
            ("vertical_amplitude_ratio", opt(self.vertical_amplitude_ratio)),
            ("hesitations", Value::from(self.hesitations)),
        ]
    }
}

impl Default for MovementMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

fn opt(v: Option<f64>) -> Value {
    v.map(Value::from).unwrap_or(Value::Null)
}

/// Relative left/right difference, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AsymmetryResult {
    pub asimetria_mag: Option<f64>,
    pub asimetria_ritmo: Option<f64>,
}

/// Everything the pipeline derives from one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingReport {
    pub file: String,
    pub exercise: Exercise,
    pub active_side: Side,
    pub passive_side: Side,
    pub active: MovementMetrics,
    pub passive: MovementMetrics,
    pub asymmetry: AsymmetryResult,
    pub severity: SeverityAssessment,
}

impl RecordingReport {
    /// Flattens into one table row: identity columns, `active_*` and
    /// `passive_*` metrics, asymmetry, then severity.
    pub fn to_row(&self) -> Vec<(String, Value)> {
        let mut row: Vec<(String, Value)> = vec![
            ("file".into(), Value::from(self.file.clone())),
            ("exercise".into(), Value::from(self.exercise.as_str())),
            ("active_side".into(), Value::from(self.active_side.as_str())),
        ];
        for (name, v) in self.active.columns() {
            row.push((format!("active_{name}"), v));
        }
        for (name, v) in self.passive.columns() {
            row.push((format!("passive_{name}"), v));
        }
        row.push(("asimetria_mag".into(), opt(self.asymmetry.asimetria_mag)));
        row.push(("asimetria_ritmo".into(), opt(self.asymmetry.asimetria_ritmo)));
        row.push(("severity_score".into(), Value::from(self.severity.score)));
        row.push(("severity_label".into(), Value::from(self.severity.label.clone())));
        row.push(("severity_confidence".into(), Value::from(self.severity.confidence)));
        row
    }

    /// Column names of `to_row`, for writing a table header.
    pub fn column_names() -> Vec<String> {
        let mut names = vec!["file".to_string(), "exercise".into(), "active_side".into()];
        let cols = MovementMetrics::empty().columns();
        names.extend(cols.iter().map(|(n, _)| format!("active_{n}")));
        names.extend(cols.iter().map(|(n, _)| format!("passive_{n}")));
        names.extend(
            [
                "asimetria_mag",
                "asimetria_ritmo",
                "severity_score",
                "severity_label",
                "severity_confidence",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        names
    }
}
