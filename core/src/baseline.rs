//! Population reference values from recordings of healthy controls.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::models::Exercise;
use crate::stats::{mean, percentile_sorted, variance};
use crate::types::{MovementMetrics, RecordingReport};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64, // population
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Statistics of the finite values; `None` if there are none.
pub fn feature_stats(values: &[f64]) -> Option<FeatureStats> {
    let mut xs: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if xs.is_empty() {
        return None;
    }
    xs.sort_by_key(|v| OrderedFloat(*v));
    Some(FeatureStats {
        count: xs.len(),
        mean: mean(&xs)?,
        std: variance(&xs)?.sqrt(),
        p10: percentile_sorted(&xs, 10.0)?,
        p25: percentile_sorted(&xs, 25.0)?,
        p50: percentile_sorted(&xs, 50.0)?,
        p75: percentile_sorted(&xs, 75.0)?,
        p90: percentile_sorted(&xs, 90.0)?,
    })
}

/// Per-metric statistics over a set of sides. Undefined values are skipped;
/// a metric with no defined value is left out.
pub fn stats_from_metrics(metrics: &[MovementMetrics]) -> BTreeMap<String, FeatureStats> {
    let mut columns: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    for m in metrics {
        for (name, value) in m.columns() {
            let col = columns.entry(name).or_default();
            if let Some(v) = value.as_f64() {
                col.push(v);
            }
        }
    }
    columns
        .into_iter()
        .filter_map(|(name, values)| feature_stats(&values).map(|s| (name.to_string(), s)))
        .collect()
}

/// Baseline per exercise. Both sides of every report contribute, so the
/// reference is side-agnostic.
pub fn population_baseline(reports: &[RecordingReport]) -> BTreeMap<Exercise, BTreeMap<String, FeatureStats>> {
    let mut grouped: BTreeMap<Exercise, Vec<MovementMetrics>> = BTreeMap::new();
    for r in reports {
        let sides = grouped.entry(r.exercise).or_default();
        sides.push(r.active.clone());
        sides.push(r.passive.clone());
    }
    grouped
        .into_iter()
        .map(|(exercise, sides)| {
            log::debug!("baseline {exercise}: {} sides", sides.len());
            (exercise, stats_from_metrics(&sides))
        })
        .collect()
}
