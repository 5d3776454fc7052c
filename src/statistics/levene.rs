//! Levene test for equality of variances.

use super::distributions::f_cdf;

/// Centering choice for the Levene test.
///
/// `Median` (the default) is the Brown–Forsythe variant, robust to
/// non-normal data such as event counts; `Mean` is Levene's original
/// formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Center {
    /// Absolute deviations from the group median (Brown–Forsythe).
    #[default]
    Median,
    /// Absolute deviations from the group mean.
    Mean,
}

/// Outcome of a variance-homogeneity test.
#[derive(Debug, Clone, Copy)]
pub struct VarianceTest {
    /// The W (F-distributed) statistic.
    pub statistic: f64,
    /// p-value under the F(k-1, N-k) null distribution.
    pub p_value: f64,
}

/// Levene test across two or more groups.
///
/// Computes absolute deviations from each group's center and applies a
/// one-way ANOVA F test to them. When both between-group and within-group
/// spread of the deviations are zero (e.g. constant groups) there is no
/// detectable variance difference and the p-value is 1.0.
///
/// # Panics
///
/// Panics if fewer than two groups are given or any group has fewer than
/// two observations; callers apply the minimum-sample-size policy first.
pub fn levene_test(groups: &[&[f64]], center: Center) -> VarianceTest {
    let k = groups.len();
    assert!(k >= 2, "Levene test requires at least two groups");
    for group in groups {
        assert!(
            group.len() >= 2,
            "Levene test requires at least two observations per group"
        );
    }

    // z_ij = |x_ij - center_i|
    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|group| {
            let c = match center {
                Center::Median => median(group),
                Center::Mean => super::descriptive::mean(group),
            };
            group.iter().map(|&x| (x - c).abs()).collect()
        })
        .collect();

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let grand_mean =
        deviations.iter().flatten().sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for z in &deviations {
        let ni = z.len() as f64;
        let zbar = z.iter().sum::<f64>() / ni;
        ss_between += ni * (zbar - grand_mean).powi(2);
        ss_within += z.iter().map(|&v| (v - zbar).powi(2)).sum::<f64>();
    }

    let df1 = (k - 1) as f64;
    let df2 = (n_total - k) as f64;

    if ss_within <= 0.0 {
        return if ss_between <= 0.0 {
            // Zero spread everywhere: nothing to distinguish
            VarianceTest {
                statistic: 0.0,
                p_value: 1.0,
            }
        } else {
            VarianceTest {
                statistic: f64::INFINITY,
                p_value: 0.0,
            }
        };
    }

    let statistic = (ss_between / df1) / (ss_within / df2);
    let p_value = 1.0 - f_cdf(statistic, df1, df2);

    VarianceTest { statistic, p_value }
}

/// Median of a sample (mean of the two middle values for even lengths).
fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
