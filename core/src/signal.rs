use serde::Serialize;

use crate::models::{MagnitudePoint, MagnitudeSeries, MagnitudeSource, Side, SideSeries};
use crate::types::TimeUnit;

/// Per-sample vector magnitude with time rebased to seconds since the first
/// sample of the (already trimmed) series.
pub fn normalize(series: &SideSeries, source: MagnitudeSource, unit: TimeUnit) -> MagnitudeSeries {
    let samples = series.samples();
    let Some(first) = samples.first() else {
        return MagnitudeSeries::new(source, Vec::new());
    };
    let t0 = first.timestamp;
    let points = samples
        .iter()
        .map(|s| MagnitudePoint {
            time: unit.to_seconds(s.timestamp - t0),
            magnitude: source.vector(s).norm(),
        })
        .collect();
    MagnitudeSeries::new(source, points)
}

/// Mean accelerometer magnitude, `None` for an empty side.
pub fn mean_accel_magnitude(series: &SideSeries) -> Option<f64> {
    let n = series.len();
    if n == 0 {
        return None;
    }
    Some(series.samples().iter().map(|s| s.accelerometer.norm()).sum::<f64>() / n as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideSelection {
    pub active: Side,
    pub passive: Side,
    pub left_mean: Option<f64>,
    pub right_mean: Option<f64>,
}

/// The side with the larger mean accelerometer magnitude is active. Exact
/// ties, and two empty sides, resolve to LEFT (first declared side).
pub fn select_active_side(left: &SideSeries, right: &SideSeries) -> SideSelection {
    let left_mean = mean_accel_magnitude(left);
    let right_mean = mean_accel_magnitude(right);

    // None orders below any Some, so an empty side never wins.
    let active = if right_mean > left_mean { Side::Right } else { Side::Left };

    SideSelection {
        active,
        passive: active.other(),
        left_mean,
        right_mean,
    }
}
