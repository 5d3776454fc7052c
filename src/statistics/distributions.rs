//! Cumulative distribution functions used by the hypothesis tests.
//!
//! Only the two CDFs the tests need are implemented: the standard normal
//! (rank-sum approximation) and the F distribution (Levene). Accuracy is
//! bounded by the erf polynomial (~1e-7 absolute) and the incomplete-beta
//! continued fraction (converges to ~1e-12), which is far below the
//! resolution at which p-values are interpreted.

/// Standard normal CDF.
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function, Abramowitz & Stegun 7.1.26 polynomial approximation.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// CDF of the F distribution with `d1` and `d2` degrees of freedom.
///
/// Computed through the regularized incomplete beta function:
/// `F(x; d1, d2) = I_{d1 x / (d1 x + d2)}(d1/2, d2/2)`.
pub fn f_cdf(x: f64, d1: f64, d2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if !x.is_finite() {
        return 1.0;
    }
    let z = d1 * x / (d1 * x + d2);
    incomplete_beta_reg(d1 / 2.0, d2 / 2.0, z)
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 8] = [
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = 0.99999999999980993;
    for (i, &c) in COEFFS.iter().enumerate() {
        acc += c / (x + (i + 1) as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Regularized incomplete beta function I_x(a, b).
///
/// Uses the symmetry transformation plus Lentz's continued fraction, the
/// standard numerically stable evaluation.
fn incomplete_beta_reg(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_prefix = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let prefix = ln_prefix.exp();

    // The continued fraction converges fast only for x < (a+1)/(a+b+2);
    // use the symmetry relation otherwise.
    if x < (a + 1.0) / (a + b + 2.0) {
        prefix * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - prefix * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Lentz's modified continued fraction for the incomplete beta function.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let numerator = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let numerator = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_cdf_reference_points() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-9);
        assert!((standard_normal_cdf(1.959964) - 0.975).abs() < 1e-5);
        assert!((standard_normal_cdf(-1.959964) - 0.025).abs() < 1e-5);
        assert!(standard_normal_cdf(8.0) > 0.9999999);
        assert!(standard_normal_cdf(-8.0) < 1e-7);
    }

    #[test]
    fn normal_cdf_is_monotone() {
        let mut last = 0.0;
        for i in -40..=40 {
            let p = standard_normal_cdf(i as f64 / 10.0);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn ln_gamma_reference_points() {
        // Gamma(5) = 24, Gamma(0.5) = sqrt(pi)
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn f_cdf_equal_dof_median_is_half() {
        // F(1; d, d) = 0.5 by symmetry
        for d in [2.0, 5.0, 10.0, 30.0] {
            assert!((f_cdf(1.0, d, d) - 0.5).abs() < 1e-9, "d = {d}");
        }
    }

    #[test]
    fn f_cdf_reference_point() {
        // Upper 5% critical value of F(3, 10) is 3.7083
        let p = f_cdf(3.7083, 3.0, 10.0);
        assert!((p - 0.95).abs() < 1e-4, "got {p}");
    }

    #[test]
    fn f_cdf_edges() {
        assert_eq!(f_cdf(0.0, 3.0, 10.0), 0.0);
        assert_eq!(f_cdf(-1.0, 3.0, 10.0), 0.0);
        assert_eq!(f_cdf(f64::INFINITY, 3.0, 10.0), 1.0);
    }
}
