use crate::types::{AsymmetryResult, MovementMetrics};

/// `|a - p| / max(|a|, |p|)`, clamped to [0, 1]. Two zeros are perfectly
/// symmetric; an undefined side leaves the result undefined.
pub fn relative_difference(active: Option<f64>, passive: Option<f64>) -> Option<f64> {
    let (a, p) = (active?, passive?);
    if !a.is_finite() || !p.is_finite() {
        return None;
    }
    if a == 0.0 && p == 0.0 {
        return Some(0.0);
    }
    let denom = a.abs().max(p.abs());
    Some(((a - p).abs() / denom).clamp(0.0, 1.0))
}

/// Intensity and rhythm asymmetry between the active and passive sides.
pub fn asymmetry(active: &MovementMetrics, passive: &MovementMetrics) -> AsymmetryResult {
    AsymmetryResult {
        asimetria_mag: relative_difference(active.magnitude_mean, passive.magnitude_mean),
        asimetria_ritmo: relative_difference(active.rep_time_mean, passive.rep_time_mean),
    }
}
