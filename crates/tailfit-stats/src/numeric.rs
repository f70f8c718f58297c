//! Numeric primitives shared by the regression kernel and the analyzers.
//!
//! Logarithms return `None` instead of `NaN`/`-inf` outside their domain so
//! callers can filter mixed-sign data instead of failing. The normal
//! distribution helpers use closed-form approximations that are accurate
//! enough for probability plots and survival curves.

use crate::error::StatsError;

/// Floor applied before taking logarithms of probabilities.
///
/// Keeps quasi-likelihood sums finite when a theoretical survival value
/// underflows to zero.
pub const LOG_EPSILON: f64 = 1e-10;

/// Base-10 logarithm, or `None` when `x <= 0`.
///
/// # Examples
///
/// ```
/// use tailfit_stats::numeric::log10;
///
/// assert_eq!(log10(100.0), Some(2.0));
/// assert_eq!(log10(0.0), None);
/// ```
#[must_use]
pub fn log10(x: f64) -> Option<f64> {
    (x > 0.0).then(|| x.log10())
}

/// Natural logarithm, or `None` when `x <= 0`.
///
/// # Examples
///
/// ```
/// use tailfit_stats::numeric::ln;
///
/// assert!((ln(std::f64::consts::E).unwrap() - 1.0).abs() < 1e-12);
/// assert_eq!(ln(-1.0), None);
/// ```
#[must_use]
pub fn ln(x: f64) -> Option<f64> {
    (x > 0.0).then(|| x.ln())
}

/// Natural logarithm with the argument floored at [`LOG_EPSILON`].
#[must_use]
pub fn ln_floored(x: f64) -> f64 {
    x.max(LOG_EPSILON).ln()
}

/// Error function, Abramowitz & Stegun formula 7.1.26 (max error 1.5e-7).
#[must_use]
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal cumulative distribution function.
///
/// # Examples
///
/// ```
/// use tailfit_stats::numeric::normal_cdf;
///
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!(normal_cdf(5.0) > 0.999);
/// ```
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Inverse of the standard normal CDF (Beasley-Springer-Moro).
///
/// Fails with [`StatsError::InvalidArgument`] unless `0 < p < 1`.
///
/// # Examples
///
/// ```
/// use tailfit_stats::numeric::{normal_cdf, normal_inverse_cdf};
///
/// let z = normal_inverse_cdf(0.975).unwrap();
/// assert!((z - 1.96).abs() < 1e-3);
/// assert!((normal_cdf(z) - 0.975).abs() < 1e-3);
/// assert!(normal_inverse_cdf(1.0).is_err());
/// ```
pub fn normal_inverse_cdf(p: f64) -> Result<f64, StatsError> {
    const A: [f64; 4] = [
        2.506_628_238_84,
        -18.615_000_625_29,
        41.391_197_735_34,
        -25.441_060_496_37,
    ];
    const B: [f64; 4] = [
        -8.473_510_930_90,
        23.083_367_437_43,
        -21.062_241_018_26,
        3.130_829_098_33,
    ];
    const C: [f64; 9] = [
        0.337_475_482_272_614_7,
        0.976_169_019_091_718_6,
        0.160_797_971_491_820_9,
        0.027_643_881_033_386_3,
        0.003_840_572_937_360_9,
        0.000_395_189_651_191_9,
        0.000_032_176_788_176_8,
        0.000_000_288_816_736_4,
        0.000_000_396_031_518_7,
    ];

    if !(p > 0.0 && p < 1.0) {
        return Err(StatsError::invalid_argument(format!(
            "probability must be in (0, 1), got {p}"
        )));
    }

    let y = p - 0.5;
    if y.abs() < 0.42 {
        let r = y * y;
        let num = ((A[3] * r + A[2]) * r + A[1]) * r + A[0];
        let den = (((B[3] * r + B[2]) * r + B[1]) * r + B[0]) * r + 1.0;
        return Ok(y * num / den);
    }

    let tail = if y < 0.0 { p } else { 1.0 - p };
    let r = (-tail.ln()).ln();
    let x = C
        .iter()
        .rev()
        .fold(0.0_f64, |acc, &c| acc.mul_add(r, c));
    Ok(if y < 0.0 { -x } else { x })
}

/// Arithmetic mean.
///
/// Fails with [`StatsError::InvalidArgument`] on empty input.
#[expect(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::invalid_argument(
            "cannot compute the mean of an empty sample",
        ));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation of `values`.
///
/// With `sample = true` the variance is divided by `n - 1` (a single value is
/// rejected), otherwise by `n` (a single value yields 0).
///
/// # Examples
///
/// ```
/// use tailfit_stats::numeric::standard_deviation;
///
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(standard_deviation(&values, false).unwrap(), 2.0);
/// assert_eq!(standard_deviation(&[3.0], false).unwrap(), 0.0);
/// assert!(standard_deviation(&[3.0], true).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn standard_deviation(values: &[f64], sample: bool) -> Result<f64, StatsError> {
    let mean = mean(values)?;
    let n = values.len();
    let denominator = if sample {
        if n < 2 {
            return Err(StatsError::invalid_argument(
                "sample standard deviation needs at least 2 values",
            ));
        }
        (n - 1) as f64
    } else {
        n as f64
    };
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Ok((sum_sq / denominator).sqrt())
}
