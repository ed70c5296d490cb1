//! Small numeric helpers shared by the extractor, the classifier and the
//! baseline builder. All return `None` instead of dividing by zero.

#[inline]
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Population variance (ddof = 0).
pub fn variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    Some(xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (ddof = 1); needs two values.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Least-squares slope of `ys` against their index 0, 1, 2, ...
pub fn index_slope(ys: &[f64]) -> Option<f64> {
    let n = ys.len();
    if n < 2 {
        return None;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(ys)?;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    Some(sxy / sxx)
}

/// First half gets the extra element on odd lengths.
#[inline]
pub fn split_halves(xs: &[f64]) -> (&[f64], &[f64]) {
    xs.split_at((xs.len() + 1) / 2)
}

/// Cumulative trapezoidal integral of `ys` over `ts`, starting at 0.
pub fn cumulative_trapezoid(ts: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = ts.len().min(ys.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    let mut acc = 0.0;
    out.push(acc);
    for i in 1..n {
        acc += 0.5 * (ys[i] + ys[i - 1]) * (ts[i] - ts[i - 1]);
        out.push(acc);
    }
    out
}

/// Subtracts the mean in place.
pub fn demean(xs: &mut [f64]) {
    if let Some(m) = mean(xs) {
        xs.iter_mut().for_each(|x| *x -= m);
    }
}

/// Linear-interpolation percentile (`q` in 0..=100) of sorted data.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_line() {
        assert_eq!(index_slope(&[1.0, 3.0, 5.0, 7.0]), Some(2.0));
        assert_eq!(index_slope(&[4.0]), None);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.138_089_935).abs() < 1e-6);
        assert_eq!(sample_std(&[1.0]), None);
    }

    #[test]
    fn halves_give_extra_to_first() {
        let (a, b) = split_halves(&[1.0, 2.0, 3.0]);
        assert_eq!(a, &[1.0, 2.0]);
        assert_eq!(b, &[3.0]);
    }

    #[test]
    fn trapezoid_of_constant() {
        let v = cumulative_trapezoid(&[0.0, 0.5, 1.0], &[2.0, 2.0, 2.0]);
        assert_eq!(v, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn percentile_interpolates() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&xs, 50.0), Some(3.0));
        assert!((percentile_sorted(&xs, 10.0).unwrap() - 1.4).abs() < 1e-12);
        assert_eq!(percentile_sorted(&[], 50.0), None);
    }
}
