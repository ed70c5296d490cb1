use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::error::{MotionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm, sqrt(x² + y² + z²).
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One IMU reading in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64, // device clock, unit fixed by `TimeUnit`
    #[serde(alias = "accel")]
    pub accelerometer: Vec3, // m/s²
    #[serde(alias = "gyro")]
    pub gyroscope: Vec3, // °/s or rad/s, consistent within a run
}

impl Sample {
    pub fn new(timestamp: f64, accelerometer: Vec3, gyroscope: Vec3) -> Self {
        Self { timestamp, accelerometer, gyroscope }
    }
}

/// Instrumented limb. Declaration order (LEFT, then RIGHT) is the tie-break
/// order for active side selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exercise {
    #[default]
    Stomp,
    Tapping,
}

impl Exercise {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Stomp => "stomp",
            Exercise::Tapping => "tapping",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Samples of one side, kept in non-decreasing timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSeries {
    side: Side,
    samples: Vec<Sample>,
}

impl SideSeries {
    /// Builds the series, sorting by timestamp when the input is out of order.
    /// The sort is stable so equal timestamps keep their arrival order.
    pub fn new(side: Side, mut samples: Vec<Sample>) -> Self {
        let sorted = samples
            .windows(2)
            .all(|w| OrderedFloat(w[0].timestamp) <= OrderedFloat(w[1].timestamp));
        if !sorted {
            log::debug!("{side}: samples out of order, sorting {} samples", samples.len());
            samples.sort_by_key(|s| OrderedFloat(s.timestamp));
        }
        Self { side, samples }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Suffix starting at `start`. Ordering is inherited, no re-sort needed.
    pub fn suffix(&self, start: usize) -> SideSeries {
        let start = start.min(self.samples.len());
        SideSeries {
            side: self.side,
            samples: self.samples[start..].to_vec(),
        }
    }

    /// Rejects NaN/infinite timestamps and axis values.
    pub fn validate(&self, source_name: &str) -> Result<()> {
        for (i, s) in self.samples.iter().enumerate() {
            if !s.timestamp.is_finite() {
                return Err(MotionError::malformed(
                    source_name,
                    format!("{}[{i}].timestamp is not finite", self.side),
                ));
            }
            if !s.accelerometer.is_finite() {
                return Err(MotionError::malformed(
                    source_name,
                    format!("{}[{i}].accelerometer has a non-finite axis", self.side),
                ));
            }
            if !s.gyroscope.is_finite() {
                return Err(MotionError::malformed(
                    source_name,
                    format!("{}[{i}].gyroscope has a non-finite axis", self.side),
                ));
            }
        }
        Ok(())
    }
}

// Canonical document: {"LEFT": [...], "RIGHT": [...]}. A missing side is empty.
#[derive(Debug, Deserialize)]
struct CanonicalDoc {
    #[serde(rename = "LEFT", default)]
    left: Vec<Sample>,
    #[serde(rename = "RIGHT", default)]
    right: Vec<Sample>,
}

/// One processed file: both sides of one exercise run.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub name: String,
    pub exercise: Exercise,
    left: SideSeries,
    right: SideSeries,
}

impl Recording {
    pub fn new(
        name: impl Into<String>,
        exercise: Exercise,
        left: Vec<Sample>,
        right: Vec<Sample>,
    ) -> Self {
        Self {
            name: name.into(),
            exercise,
            left: SideSeries::new(Side::Left, left),
            right: SideSeries::new(Side::Right, right),
        }
    }

    /// Parses the canonical JSON form. Missing fields are reported with
    /// their JSON path, e.g. `LEFT[3].gyroscope.z`.
    pub fn from_json(name: &str, exercise: Exercise, body: &str) -> Result<Self> {
        let mut de = json::Deserializer::from_str(body);
        let doc: CanonicalDoc = spte::deserialize(&mut de)
            .map_err(|e| MotionError::malformed(name, format!("at {}: {}", e.path(), e.inner())))?;
        let rec = Recording::new(name, exercise, doc.left, doc.right);
        rec.validate()?;
        Ok(rec)
    }

    pub fn side(&self, side: Side) -> &SideSeries {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Sides in declared order.
    pub fn sides(&self) -> [&SideSeries; 2] {
        [&self.left, &self.right]
    }

    pub fn validate(&self) -> Result<()> {
        self.left.validate(&self.name)?;
        self.right.validate(&self.name)
    }
}

/// Which sensor vector a magnitude series is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeSource {
    Accelerometer,
    #[default]
    Gyroscope,
}

impl MagnitudeSource {
    #[inline]
    pub fn vector<'a>(&self, s: &'a Sample) -> &'a Vec3 {
        match self {
            MagnitudeSource::Accelerometer => &s.accelerometer,
            MagnitudeSource::Gyroscope => &s.gyroscope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnitudePoint {
    pub time: f64, // seconds since the first sample of the side
    pub magnitude: f64,
}

/// Magnitudes parallel to a `SideSeries`: point `i` belongs to sample `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MagnitudeSeries {
    source: Option<MagnitudeSource>,
    points: Vec<MagnitudePoint>,
}

impl MagnitudeSeries {
    pub fn new(source: MagnitudeSource, points: Vec<MagnitudePoint>) -> Self {
        Self { source: Some(source), points }
    }

    /// Bare series, mostly for feeding the detector directly.
    pub fn from_magnitudes(magnitudes: &[f64], dt: f64) -> Self {
        let points = magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| MagnitudePoint { time: i as f64 * dt, magnitude: m })
            .collect();
        Self { source: None, points }
    }

    pub fn points(&self) -> &[MagnitudePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.magnitude).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }
}

/// One detected repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub index: usize,
    pub time: f64,
    pub magnitude: f64,
    pub prominence: f64,
}

/// Detected repetitions in increasing index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeakSet {
    peaks: Vec<Peak>,
}

impl PeakSet {
    pub fn new(peaks: Vec<Peak>) -> Self {
        debug_assert!(peaks.windows(2).all(|w| w[0].index < w[1].index));
        Self { peaks }
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peak> {
        self.peaks.iter()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.peaks.iter().map(|p| p.index).collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.magnitude).collect()
    }
}
