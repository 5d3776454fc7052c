//! Descriptive statistics and percentile computation.

/// Arithmetic mean.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn mean(data: &[f64]) -> f64 {
    assert!(!data.is_empty(), "Cannot compute mean of empty slice");
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// Returns 0.0 for a single observation.
pub fn sample_std(data: &[f64]) -> f64 {
    let n = data.len();
    assert!(n > 0, "Cannot compute std of empty slice");
    if n == 1 {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Coefficient of variation: sample standard deviation over mean.
///
/// A zero mean makes the ratio indeterminate; the NaN is returned as-is
/// rather than masked, so callers can report it.
pub fn coefficient_of_variation(data: &[f64]) -> f64 {
    let m = mean(data);
    if m == 0.0 {
        return f64::NAN;
    }
    sample_std(data) / m
}

/// Percentile of pre-sorted data with linear interpolation (the R-7
/// definition, the default of the original analysis stack).
///
/// `p` is in percent, 0..=100. The caller must pass ascending-sorted data;
/// no verification is performed.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute percentile of empty slice");
    assert!(
        (0.0..=100.0).contains(&p),
        "Percentile must be in [0, 100]"
    );

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p / 100.0;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        return sorted[n - 1];
    }
    if h_frac == 0.0 {
        return sorted[h_floor];
    }

    sorted[h_floor] + h_frac * (sorted[h_floor + 1] - sorted[h_floor])
}
