use crate::models::{MagnitudeSeries, PeakSet, SideSeries};
use crate::stats::{cumulative_trapezoid, demean, index_slope, mean, sample_std, split_halves};
use crate::types::{MovementMetrics, VerticalAxis};

/// An interval longer than mean + 2·std counts as a hesitation.
pub const HESITATION_STD_FACTOR: f64 = 2.0;

/// Derives the per-side metrics from detected repetitions.
///
/// `series` and `raw` must be parallel (point `i` of the magnitude series
/// belongs to sample `i` of the raw side); peak indices refer to both.
pub fn extract(
    peaks: &PeakSet,
    series: &MagnitudeSeries,
    raw: &SideSeries,
    vertical_axis: VerticalAxis,
) -> MovementMetrics {
    let n_reps = peaks.len();
    if n_reps == 0 {
        return MovementMetrics::empty();
    }

    let magnitudes = peaks.magnitudes();
    let intervals = inter_peak_intervals(peaks);
    let amplitudes = vertical_amplitudes(peaks, series, raw, vertical_axis);

    let rep_time_mean = mean(&intervals);
    let rep_time_std = sample_std(&intervals);

    MovementMetrics {
        n_reps,
        magnitude_mean: mean(&magnitudes),
        magnitude_max: magnitudes.iter().copied().reduce(f64::max),
        rep_time_mean,
        rep_time_std,
        fatigue_index: fatigue_index(&magnitudes),
        slowdown_rate: index_slope(&intervals),
        vertical_amplitude_mean: mean(&amplitudes),
        vertical_amplitude_decay: index_slope(&amplitudes),
        vertical_amplitude_ratio: halves_ratio(&amplitudes),
        hesitations: count_hesitations(&intervals, rep_time_mean, rep_time_std),
    }
}

/// Δt between consecutive peaks, seconds.
pub fn inter_peak_intervals(peaks: &PeakSet) -> Vec<f64> {
    peaks.as_slice().windows(2).map(|w| w[1].time - w[0].time).collect()
}

/// Relative intensity drop from the first to the second half of the peaks.
pub fn fatigue_index(peak_magnitudes: &[f64]) -> Option<f64> {
    if peak_magnitudes.len() < 2 {
        return None;
    }
    let (first, second) = split_halves(peak_magnitudes);
    let m1 = mean(first)?;
    let m2 = mean(second)?;
    if m1 == 0.0 {
        return None;
    }
    Some((m1 - m2) / m1)
}

/// First-half mean over second-half mean. Above 1 the movement shrinks.
pub fn halves_ratio(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let (first, second) = split_halves(values);
    let m1 = mean(first)?;
    let m2 = mean(second)?;
    if m2 == 0.0 {
        return None;
    }
    Some(m1 / m2)
}

pub fn count_hesitations(intervals: &[f64], mean: Option<f64>, std: Option<f64>) -> usize {
    match (mean, std) {
        (Some(m), Some(s)) => {
            let limit = m + HESITATION_STD_FACTOR * s;
            intervals.iter().filter(|&&dt| dt > limit).count()
        }
        _ => 0,
    }
}

/// Displacement proxy per repetition: the vertical acceleration between two
/// consecutive peaks is double-integrated, removing the segment mean before
/// each integration so sensor bias does not turn into drift.
pub fn vertical_amplitudes(
    peaks: &PeakSet,
    series: &MagnitudeSeries,
    raw: &SideSeries,
    axis: VerticalAxis,
) -> Vec<f64> {
    let points = series.points();
    let samples = raw.samples();
    let n = points.len().min(samples.len());

    peaks
        .as_slice()
        .windows(2)
        .filter_map(|w| {
            let (a, b) = (w[0].index, w[1].index);
            if b >= n {
                return None;
            }
            let ts: Vec<f64> = points[a..=b].iter().map(|p| p.time).collect();
            let acc: Vec<f64> = samples[a..=b]
                .iter()
                .map(|s| axis.component(&s.accelerometer))
                .collect();
            segment_amplitude(&ts, acc)
        })
        .collect()
}

fn segment_amplitude(ts: &[f64], mut acc: Vec<f64>) -> Option<f64> {
    if ts.len() < 2 {
        return None;
    }
    demean(&mut acc);
    let mut vel = cumulative_trapezoid(ts, &acc);
    demean(&mut vel);
    let disp = cumulative_trapezoid(ts, &vel);

    let lo = disp.iter().copied().reduce(f64::min)?;
    let hi = disp.iter().copied().reduce(f64::max)?;
    Some(hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_segment_has_no_amplitude() {
        let ts = [0.0, 0.01, 0.02, 0.03];
        let amp = segment_amplitude(&ts, vec![9.81; 4]).unwrap();
        assert!(amp.abs() < 1e-12);
    }

    #[test]
    fn oscillating_segment_has_positive_amplitude() {
        let ts: Vec<f64> = (0..=100).map(|i| i as f64 * 0.01).collect();
        let acc: Vec<f64> = ts
            .iter()
            .map(|t| 9.81 + 5.0 * (2.0 * std::f64::consts::PI * t).sin())
            .collect();
        let amp = segment_amplitude(&ts, acc).unwrap();
        assert!(amp > 0.0 && amp.is_finite());
    }

    #[test]
    fn hesitation_needs_a_defined_spread() {
        assert_eq!(count_hesitations(&[1.0], Some(1.0), None), 0);
        let iv = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 3.0];
        let m = mean(&iv);
        let s = sample_std(&iv);
        assert_eq!(count_hesitations(&iv, m, s), 1);
    }
}
