//! Repetition detection on a magnitude series.
//!
//! Candidates are strict local maxima. Constraints are applied in the order
//! height, distance, prominence, width, then the optional `max_peaks` cap.
//! Every step is deterministic: ties go to the larger magnitude and then to
//! the earlier sample.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::models::{MagnitudeSeries, Peak, PeakSet};
use crate::types::PeakParams;

/// Floor of the dynamic prominence threshold.
pub const MIN_DYNAMIC_PROMINENCE: f64 = 0.2;
/// Share of the full magnitude range a peak must stand out by.
pub const DYNAMIC_PROMINENCE_FRACTION: f64 = 0.25;

/// `max(0.2, 0.25 * (max - min))` over the whole series. Small wobbles on a
/// flat trace stay below the floor; on a busy trace only the big swings pass.
pub fn dynamic_prominence(magnitudes: &[f64]) -> f64 {
    let mut it = magnitudes.iter().copied();
    let Some(first) = it.next() else {
        return MIN_DYNAMIC_PROMINENCE;
    };
    let (lo, hi) = it.fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m)));
    MIN_DYNAMIC_PROMINENCE.max(DYNAMIC_PROMINENCE_FRACTION * (hi - lo))
}

/// Finds repetitions in `series` under `params`. Fewer than three samples,
/// or nothing satisfying the constraints, gives an empty set.
pub fn detect_peaks(series: &MagnitudeSeries, params: &PeakParams) -> PeakSet {
    let x = series.magnitudes();
    if x.len() < 3 {
        return PeakSet::default();
    }

    let mut candidates = local_maxima(&x);
    if let Some(h) = params.height {
        candidates.retain(|&p| x[p] >= h);
    }
    candidates = select_by_distance(&x, &candidates, params.distance);

    let min_prominence = params.prominence.unwrap_or_else(|| dynamic_prominence(&x));
    let mut kept: Vec<(usize, Prominence)> = candidates
        .into_iter()
        .map(|p| (p, prominence(&x, p)))
        .filter(|(_, pr)| pr.value >= min_prominence)
        .collect();

    if let Some(min_width) = params.width {
        kept.retain(|(p, pr)| width_at_half_prominence(&x, *p, pr) >= min_width);
    }

    if let Some(cap) = params.max_peaks {
        if kept.len() > cap {
            kept.sort_by(|(pa, a), (pb, b)| {
                OrderedFloat(b.value)
                    .cmp(&OrderedFloat(a.value))
                    .then_with(|| OrderedFloat(x[*pb]).cmp(&OrderedFloat(x[*pa])))
                    .then_with(|| pa.cmp(pb))
            });
            kept.truncate(cap);
            kept.sort_by_key(|(p, _)| *p);
        }
    }

    let points = series.points();
    let peaks: Vec<Peak> = kept
        .into_iter()
        .map(|(p, pr)| Peak {
            index: p,
            time: points[p].time,
            magnitude: x[p],
            prominence: pr.value,
        })
        .collect();

    log::debug!(
        "detect_peaks: {} samples, prominence >= {:.3}, distance {}, {} peaks",
        x.len(),
        min_prominence,
        params.distance,
        peaks.len()
    );
    PeakSet::new(peaks)
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    (1..x.len() - 1).filter(|&i| x[i - 1] < x[i] && x[i] > x[i + 1]).collect()
}

/// Greedy suppression: the highest remaining candidate wins and removes
/// every candidate closer than `distance` samples.
fn select_by_distance(x: &[f64], candidates: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || candidates.len() < 2 {
        return candidates.to_vec();
    }
    let m = candidates.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| match OrderedFloat(x[candidates[b]]).cmp(&OrderedFloat(x[candidates[a]])) {
        Ordering::Equal => a.cmp(&b),
        ord => ord,
    });

    let mut keep = vec![true; m];
    for &i in &order {
        if !keep[i] {
            continue;
        }
        let p = candidates[i];
        for j in (0..i).rev() {
            if p - candidates[j] >= distance {
                break;
            }
            keep[j] = false;
        }
        for j in (i + 1)..m {
            if candidates[j] - p >= distance {
                break;
            }
            keep[j] = false;
        }
    }
    candidates
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Prominence {
    value: f64,
    left_base: usize,
    right_base: usize,
}

/// Topographic prominence: height above the higher of the two lowest
/// points reached on either side before meeting a higher sample.
fn prominence(x: &[f64], peak: usize) -> Prominence {
    let top = x[peak];

    let mut left_min = top;
    let mut left_base = peak;
    for i in (0..=peak).rev() {
        if x[i] > top {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
    }

    let mut right_min = top;
    let mut right_base = peak;
    for (i, &v) in x.iter().enumerate().skip(peak) {
        if v > top {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = i;
        }
    }

    Prominence {
        value: top - left_min.max(right_min),
        left_base,
        right_base,
    }
}

/// Width in samples where the peak crosses `top - prominence / 2`, with
/// linear interpolation between the bracketing samples.
fn width_at_half_prominence(x: &[f64], peak: usize, pr: &Prominence) -> f64 {
    let height = x[peak] - pr.value * 0.5;

    let mut i = peak;
    while pr.left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if x[i] < height {
        left_ip += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < pr.right_base && height < x[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if x[i] < height {
        right_ip -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right_ip - left_ip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prominence_uses_higher_valley() {
        // left valley 2, right valley 0 → prominence measured from 2
        let x = [3.0, 2.0, 6.0, 0.0, 1.0];
        let pr = prominence(&x, 2);
        assert_eq!(pr.value, 4.0);
        assert_eq!(pr.left_base, 1);
        assert_eq!(pr.right_base, 3);
    }

    #[test]
    fn prominence_stops_at_higher_sample() {
        // the 10 on the left cuts the search; valley 4 is the left minimum
        let x = [0.0, 10.0, 4.0, 7.0, 5.0];
        let pr = prominence(&x, 3);
        assert_eq!(pr.value, 2.0); // 7 - max(4, 5)
    }

    #[test]
    fn triangle_width_is_interpolated() {
        let x = [0.0, 2.0, 4.0, 2.0, 0.0];
        let pr = prominence(&x, 2);
        assert_eq!(pr.value, 4.0);
        // half prominence at 2.0 is reached exactly at samples 1 and 3
        assert!((width_at_half_prominence(&x, 2, &pr) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distance_prefers_higher_then_earlier() {
        let x = [0.0, 5.0, 0.0, 5.0, 0.0, 7.0, 0.0];
        let c = local_maxima(&x);
        assert_eq!(c, vec![1, 3, 5]);
        // 5 wins, suppresses 3; 1 is 4 samples away and survives
        assert_eq!(select_by_distance(&x, &c, 3), vec![1, 5]);
        // equal heights, the earlier one survives
        let y = [0.0, 5.0, 0.0, 5.0, 0.0];
        assert_eq!(select_by_distance(&y, &local_maxima(&y), 3), vec![1]);
    }

    #[test]
    fn plateaus_are_not_strict_maxima() {
        assert!(local_maxima(&[0.0, 3.0, 3.0, 0.0]).is_empty());
    }
}
