//! Rule-based 0–4 severity grading.
//!
//! Each clinical feature is scored on a continuous 0–4 scale by linear
//! interpolation against five ordered boundaries (Normal, Mild, Moderate,
//! Marked, Severe). The final grade is the rounded weighted mean of the
//! present features; confidence drops as the features disagree.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::stats::variance;
use crate::types::MovementMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    DecayRate,
    AmplitudeRatio,
    Magnitude,
    RhythmStd,
    RepTime,
    Hesitations,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::DecayRate,
        Feature::AmplitudeRatio,
        Feature::Magnitude,
        Feature::RhythmStd,
        Feature::RepTime,
        Feature::Hesitations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::DecayRate => "decay_rate",
            Feature::AmplitudeRatio => "amplitude_ratio",
            Feature::Magnitude => "magnitude",
            Feature::RhythmStd => "rhythm_std",
            Feature::RepTime => "rep_time",
            Feature::Hesitations => "hesitations",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityBand {
    Normal,
    Mild,
    Moderate,
    Marked,
    Severe,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 5] = [
        SeverityBand::Normal,
        SeverityBand::Mild,
        SeverityBand::Moderate,
        SeverityBand::Marked,
        SeverityBand::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Normal => "Normal",
            SeverityBand::Mild => "Mild",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::Marked => "Marked",
            SeverityBand::Severe => "Severe",
        }
    }

    /// Band of an integer grade; anything above 4 is Severe.
    pub fn from_grade(grade: u8) -> Self {
        Self::ALL[usize::from(grade.min(4))]
    }

    /// Band of a continuous feature score: 0 is Normal, (0, 1] Mild,
    /// (1, 2] Moderate, (2, 3] Marked, above 3 Severe.
    pub fn for_feature_score(score: f64) -> Self {
        if score <= 0.0 {
            return SeverityBand::Normal;
        }
        Self::from_grade(score.ceil().min(4.0) as u8)
    }

    fn description(&self) -> &'static str {
        match self {
            SeverityBand::Normal => "no signs of motor impairment",
            SeverityBand::Mild => "slight amplitude reduction or irregular rhythm",
            SeverityBand::Moderate => "clear bradykinesia with progressive reduction",
            SeverityBand::Marked => "severe bradykinesia with frequent freezing",
            SeverityBand::Severe => "extremely limited movement",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold table entry of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBands {
    pub feature: Feature,
    pub direction: Direction,
    /// Normal, Mild, Moderate, Marked and Severe boundaries, best to worst.
    pub thresholds: [f64; 5],
    pub weight: f64,
}

impl FeatureBands {
    fn badness(&self, v: f64) -> f64 {
        match self.direction {
            Direction::LowerIsBetter => v,
            Direction::HigherIsBetter => -v,
        }
    }

    /// Continuous score in [0, 4]. Boundary `k` maps to exactly `k`.
    pub fn score(&self, value: f64) -> f64 {
        let b = self.badness(value);
        let t = self.thresholds.map(|x| self.badness(x));
        if b <= t[0] {
            return 0.0;
        }
        for k in 0..4 {
            if b <= t[k + 1] {
                return k as f64 + (b - t[k]) / (t[k + 1] - t[k]);
            }
        }
        4.0
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(MotionError::parameter(format!(
                "{}: weight must be finite and >= 0, got {}",
                self.feature, self.weight
            )));
        }
        if self.thresholds.iter().any(|t| !t.is_finite()) {
            return Err(MotionError::parameter(format!("{}: non-finite threshold", self.feature)));
        }
        let t = self.thresholds.map(|x| self.badness(x));
        if !t.windows(2).all(|w| w[0] < w[1]) {
            return Err(MotionError::parameter(format!(
                "{}: thresholds must get strictly worse from Normal to Severe ({:?})",
                self.feature, self.direction
            )));
        }
        Ok(())
    }
}

/// Weights and threshold tables. Swappable for alternate clinical calibrations.
/// A file without `features` falls back to the standard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCalibration {
    pub features: Vec<FeatureBands>,
}

static STANDARD_CALIBRATION: Lazy<SeverityCalibration> = Lazy::new(|| SeverityCalibration {
    features: vec![
        // |slope| of vertical amplitude per repetition
        FeatureBands {
            feature: Feature::DecayRate,
            direction: Direction::LowerIsBetter,
            thresholds: [0.03, 0.08, 0.15, 0.25, 0.40],
            weight: 0.30,
        },
        // first half / second half amplitude
        FeatureBands {
            feature: Feature::AmplitudeRatio,
            direction: Direction::LowerIsBetter,
            thresholds: [1.05, 1.15, 1.30, 1.50, 2.00],
            weight: 0.25,
        },
        FeatureBands {
            feature: Feature::Magnitude,
            direction: Direction::HigherIsBetter,
            thresholds: [3.0, 2.2, 1.5, 1.0, 0.6],
            weight: 0.15,
        },
        // ms
        FeatureBands {
            feature: Feature::RhythmStd,
            direction: Direction::LowerIsBetter,
            thresholds: [150.0, 250.0, 400.0, 600.0, 800.0],
            weight: 0.15,
        },
        // ms
        FeatureBands {
            feature: Feature::RepTime,
            direction: Direction::LowerIsBetter,
            thresholds: [600.0, 800.0, 1100.0, 1500.0, 2000.0],
            weight: 0.10,
        },
        // per 10 repetitions
        FeatureBands {
            feature: Feature::Hesitations,
            direction: Direction::LowerIsBetter,
            thresholds: [0.5, 1.5, 3.0, 5.0, 7.0],
            weight: 0.05,
        },
    ],
});

impl Default for SeverityCalibration {
    fn default() -> Self {
        STANDARD_CALIBRATION.clone()
    }
}

impl SeverityCalibration {
    pub fn standard() -> &'static SeverityCalibration {
        &STANDARD_CALIBRATION
    }

    pub fn bands(&self, feature: Feature) -> Option<&FeatureBands> {
        self.features.iter().find(|b| b.feature == feature)
    }

    /// Every feature exactly once, weights summing to 1, monotone tables.
    pub fn validate(&self) -> Result<()> {
        for f in Feature::ALL {
            let n = self.features.iter().filter(|b| b.feature == f).count();
            if n != 1 {
                return Err(MotionError::parameter(format!(
                    "calibration must list {f} exactly once, found {n}"
                )));
            }
        }
        for b in &self.features {
            b.validate()?;
        }
        let sum: f64 = self.features.iter().map(|b| b.weight).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(MotionError::parameter(format!("weights must sum to 1.0, got {sum}")));
        }
        Ok(())
    }
}

/// Classifier inputs. `None` (or a non-finite value) marks a missing feature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeverityFeatures {
    pub decay_rate: Option<f64>,
    pub amplitude_ratio: Option<f64>,
    pub magnitude: Option<f64>,
    pub rhythm_std: Option<f64>, // ms
    pub rep_time: Option<f64>,   // ms
    pub hesitations: Option<f64>, // per 10 reps
}

impl SeverityFeatures {
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::DecayRate => self.decay_rate,
            Feature::AmplitudeRatio => self.amplitude_ratio,
            Feature::Magnitude => self.magnitude,
            Feature::RhythmStd => self.rhythm_std,
            Feature::RepTime => self.rep_time,
            Feature::Hesitations => self.hesitations,
        }
    }

    /// Maps side metrics onto the classifier scale: decay as an absolute
    /// slope, rhythm in milliseconds, hesitations per 10 repetitions. A side
    /// with a single repetition has zero hesitations; without any repetition
    /// there is nothing to count.
    pub fn from_metrics(m: &MovementMetrics) -> Self {
        Self {
            decay_rate: m.vertical_amplitude_decay.map(f64::abs),
            amplitude_ratio: m.vertical_amplitude_ratio,
            magnitude: m.magnitude_mean,
            rhythm_std: m.rep_time_std.map(|s| s * 1000.0),
            rep_time: m.rep_time_mean.map(|s| s * 1000.0),
            hesitations: (m.n_reps > 0).then(|| m.hesitations as f64 / m.n_reps as f64 * 10.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScore {
    pub raw_value: Option<f64>,
    pub interpolated_score: Option<f64>,
    pub band_label: Option<SeverityBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityAssessment {
    pub score: u8,
    pub label: String,
    pub band: SeverityBand,
    pub weighted_score: f64,
    pub confidence: f64,
    pub features_used: usize,
    pub per_feature: BTreeMap<Feature, FeatureScore>,
    pub clinical_notes: Vec<String>,
}

pub const MIN_CONFIDENCE: f64 = 0.5;

/// Grades one analysis unit. Missing features are left out and their weight
/// is spread proportionally over the present ones.
pub fn classify(features: &SeverityFeatures, calibration: &SeverityCalibration) -> SeverityAssessment {
    let mut per_feature = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut scores = Vec::with_capacity(calibration.features.len());

    for bands in &calibration.features {
        let raw = features.get(bands.feature).filter(|v| v.is_finite());
        let entry = match raw {
            Some(v) => {
                let s = bands.score(v);
                weighted_sum += bands.weight * s;
                weight_total += bands.weight;
                scores.push(s);
                FeatureScore {
                    raw_value: Some(v),
                    interpolated_score: Some(s),
                    band_label: Some(SeverityBand::for_feature_score(s)),
                }
            }
            None => FeatureScore {
                raw_value: None,
                interpolated_score: None,
                band_label: None,
            },
        };
        per_feature.insert(bands.feature, entry);
    }

    if scores.is_empty() || weight_total <= 0.0 {
        log::warn!("classify: no usable feature, grading as unassessable");
        return SeverityAssessment {
            score: 0,
            label: SeverityBand::Normal.as_str().to_string(),
            band: SeverityBand::Normal,
            weighted_score: 0.0,
            confidence: MIN_CONFIDENCE,
            features_used: 0,
            per_feature,
            clinical_notes: vec!["Not enough repetitions to assess severity".to_string()],
        };
    }

    let weighted_score = weighted_sum / weight_total;
    // halves go to the even grade: 0.5 -> 0, 2.5 -> 2
    let score = weighted_score.round_ties_even().clamp(0.0, 4.0) as u8;
    let spread = variance(&scores).unwrap_or(0.0);
    let confidence = (1.0 - spread / 4.0).clamp(MIN_CONFIDENCE, 1.0);
    let band = SeverityBand::from_grade(score);

    log::debug!(
        "classify: weighted {weighted_score:.3} -> {score} ({band}), confidence {confidence:.2}, {} features",
        scores.len()
    );

    SeverityAssessment {
        score,
        label: band.as_str().to_string(),
        band,
        weighted_score,
        confidence,
        features_used: scores.len(),
        clinical_notes: clinical_notes(band, &per_feature),
        per_feature,
    }
}

fn band_of(per_feature: &BTreeMap<Feature, FeatureScore>, f: Feature) -> Option<SeverityBand> {
    per_feature.get(&f).and_then(|s| s.band_label)
}

fn band_text(b: Option<SeverityBand>) -> &'static str {
    b.map(|b| b.as_str()).unwrap_or("n/a")
}

/// Plain-language reading of a grade and the features driving it.
pub fn clinical_notes(band: SeverityBand, per_feature: &BTreeMap<Feature, FeatureScore>) -> Vec<String> {
    let decay = band_of(per_feature, Feature::DecayRate);
    let ratio = band_of(per_feature, Feature::AmplitudeRatio);
    let magnitude = band_of(per_feature, Feature::Magnitude);
    let rhythm = band_of(per_feature, Feature::RhythmStd);
    let hesitation = band_of(per_feature, Feature::Hesitations);

    let abnormal = |b: Option<SeverityBand>| b.is_some_and(|b| b != SeverityBand::Normal);
    let at_least = |b: Option<SeverityBand>, floor: SeverityBand| b.is_some_and(|b| b >= floor);

    let mut notes = vec![format!("{}: {}", band, band.description())];
    match band {
        SeverityBand::Normal => {
            notes.push("Movement within normal parameters".into());
            notes.push("Consistent rhythm and stable amplitude".into());
        }
        SeverityBand::Mild => {
            notes.push("Early signs of motor impairment".into());
            if abnormal(decay) {
                notes.push(format!("Slight amplitude reduction: {}", band_text(decay)));
            }
            if abnormal(ratio) {
                notes.push(format!("Progressive fatigue detected: {}", band_text(ratio)));
            }
            if abnormal(rhythm) {
                notes.push(format!("Slight rhythm irregularity: {}", band_text(rhythm)));
            }
            notes.push("Recommendation: periodic monitoring".into());
        }
        SeverityBand::Moderate => {
            notes.push("Moderate bradykinesia detected".into());
            if at_least(decay, SeverityBand::Moderate) {
                notes.push(format!("Clear progressive reduction: {}", band_text(decay)));
            }
            if at_least(ratio, SeverityBand::Moderate) {
                notes.push(format!("Significant fatigue in second half: {}", band_text(ratio)));
            }
            if at_least(magnitude, SeverityBand::Moderate) {
                notes.push(format!("Reduced amplitude: {}", band_text(magnitude)));
            }
            notes.push("Recommendation: complete neurological evaluation".into());
        }
        SeverityBand::Marked => {
            notes.push("Marked bradykinesia with functional impairment".into());
            notes.push(format!("Amplitude reduction: {}", band_text(decay)));
            notes.push(format!("Fatigue: {}", band_text(ratio)));
            if at_least(hesitation, SeverityBand::Marked) {
                notes.push(format!("Frequent freezing: {}", band_text(hesitation)));
            }
            notes.push("Recommendation: urgent therapeutic review".into());
        }
        SeverityBand::Severe => {
            notes.push("Extremely limited movement capacity".into());
            notes.push("Extreme bradykinesia with possible freezing".into());
            notes.push("Recommendation: immediate treatment review".into());
        }
    }
    notes
}
