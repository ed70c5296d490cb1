use crate::models::SideSeries;

/// Index of the first sample of the first window (of `window_len`
/// consecutive accelerometer magnitudes) whose standard deviation exceeds
/// `threshold`. `None` if the series never moves.
///
/// Gravity alone gives a nearly constant magnitude, so the spread of the
/// window, not its level, marks motion onset.
pub fn activity_onset(series: &SideSeries, window_len: usize, threshold: f64) -> Option<usize> {
    let n = series.len();
    if window_len == 0 || n < window_len {
        return None;
    }
    let mags: Vec<f64> = series.samples().iter().map(|s| s.accelerometer.norm()).collect();

    let w = window_len as f64;
    mags.windows(window_len).position(|win| {
        let mean = win.iter().sum::<f64>() / w;
        let var = win.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / w;
        var.sqrt() > threshold
    })
}

/// Drops the idle lead-in of a side. Fails open: when no window moves, or
/// the series is shorter than one window, the input comes back unchanged.
pub fn trim_inactivity(series: &SideSeries, window_len: usize, threshold: f64) -> SideSeries {
    match activity_onset(series, window_len, threshold) {
        Some(0) | None => {
            log::debug!("{}: no idle lead-in trimmed ({} samples)", series.side(), series.len());
            series.clone()
        }
        Some(start) => {
            log::debug!(
                "{}: trimmed {start} idle samples, {} remain",
                series.side(),
                series.len() - start
            );
            series.suffix(start)
        }
    }
}

/// `trim_inactivity` behind the `trim_enabled` switch.
pub fn trim(series: &SideSeries, enabled: bool, window_len: usize, threshold: f64) -> SideSeries {
    if enabled {
        trim_inactivity(series, window_len, threshold)
    } else {
        series.clone()
    }
}
