//! Goodness-of-fit statistics: Kolmogorov-Smirnov distance and information criteria.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Coefficient of the 95% Kolmogorov-Smirnov critical value, `c / sqrt(n)`.
const KS_CRITICAL_COEFFICIENT_95: f64 = 1.36;

/// Kolmogorov-Smirnov comparison of an empirical CDF with a reference CDF.
///
/// Both sequences are evaluated at the same points, so the statistic is the
/// largest pointwise absolute difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsTest {
    pub statistic: f64,
    /// Two-sided p-value from the asymptotic Kolmogorov distribution.
    pub p_value: f64,
    /// Critical value at the 95% level.
    pub critical_value: f64,
    /// `true` when the statistic exceeds the critical value (fit rejected).
    pub significant: bool,
    pub sample_size: usize,
}

impl KsTest {
    /// Runs the test on two pointwise-aligned CDF sequences.
    ///
    /// # Errors
    ///
    /// * [`StatsError::EmptyInput`] - both sequences are empty
    /// * [`StatsError::LengthMismatch`] - the sequences differ in length
    ///
    /// # Examples
    ///
    /// ```
    /// use tailfit_stats::goodness_of_fit::KsTest;
    ///
    /// let cdf = [0.2, 0.5, 0.9, 1.0];
    /// let test = KsTest::new(&cdf, &cdf).unwrap();
    /// assert_eq!(test.statistic, 0.0);
    /// assert!(!test.significant);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(empirical: &[f64], theoretical: &[f64]) -> Result<Self, StatsError> {
        if empirical.len() != theoretical.len() {
            return Err(StatsError::LengthMismatch {
                expected: empirical.len(),
                actual: theoretical.len(),
            });
        }
        if empirical.is_empty() {
            return Err(StatsError::EmptyInput);
        }

        let statistic = empirical
            .iter()
            .zip(theoretical)
            .map(|(e, t)| (e - t).abs())
            .fold(0.0, f64::max);

        let sample_size = empirical.len();
        let sqrt_n = (sample_size as f64).sqrt();
        let critical_value = KS_CRITICAL_COEFFICIENT_95 / sqrt_n;
        let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * statistic;

        Ok(Self {
            statistic,
            p_value: kolmogorov_survival(lambda),
            critical_value,
            significant: statistic > critical_value,
            sample_size,
        })
    }
}

/// Survival function of the Kolmogorov distribution, `Q_KS(lambda)`.
///
/// `Q_KS(lambda) = 2 * sum_{j>=1} (-1)^(j-1) * exp(-2 j^2 lambda^2)`
#[must_use]
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    // The alternating series converges too slowly near zero; Q_KS is 1 there.
    if lambda < 0.2 {
        return 1.0;
    }

    let a2 = -2.0 * lambda * lambda;
    let mut sum = 0.0;
    let mut sign = 1.0;
    let mut prev_term = 0.0_f64;
    for j in 1..=100 {
        let j = f64::from(j);
        let term = sign * 2.0 * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= 1e-10 * prev_term.abs() || term.abs() <= 1e-16 * sum.abs() {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        prev_term = term;
    }
    1.0
}

/// Akaike information criterion, `2k - 2 ln L`. Lower is better.
///
/// ```
/// use tailfit_stats::goodness_of_fit::aic;
///
/// assert_eq!(aic(-100.0, 3), 206.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn aic(log_likelihood: f64, parameter_count: usize) -> f64 {
    2.0 * parameter_count as f64 - 2.0 * log_likelihood
}

/// Bayesian information criterion, `ln(n) k - 2 ln L`. Lower is better.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn bic(log_likelihood: f64, parameter_count: usize, sample_size: usize) -> f64 {
    (sample_size as f64).ln() * parameter_count as f64 - 2.0 * log_likelihood
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_identical_sequences() {
        let cdf = [0.1, 0.3, 0.45, 0.8, 0.95, 1.0];
        let test = KsTest::new(&cdf, &cdf).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!(!test.significant);
        assert!((test.p_value - 1.0).abs() < 1e-12);
        assert_eq!(test.sample_size, 6);
    }

    #[test]
    fn test_ks_large_difference_is_significant() {
        let empirical = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
        let theoretical = [0.9, 0.95, 0.97, 0.98, 0.99, 1.0, 1.0, 1.0, 1.0, 1.0];
        let test = KsTest::new(&empirical, &theoretical).unwrap();
        assert!((test.statistic - 0.8).abs() < 1e-12);
        assert!((test.critical_value - 1.36 / 10f64.sqrt()).abs() < 1e-12);
        assert!(test.significant);
        assert!(test.p_value < 0.01);
    }

    #[test]
    fn test_ks_rejects_bad_input() {
        assert_eq!(KsTest::new(&[], &[]), Err(StatsError::EmptyInput));
        assert_eq!(
            KsTest::new(&[0.5, 1.0], &[1.0]),
            Err(StatsError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_kolmogorov_survival_reference_values() {
        // Q_KS(1.36) is the 5% point of the Kolmogorov distribution.
        assert!((kolmogorov_survival(1.36) - 0.05).abs() < 2e-3);
        assert!((kolmogorov_survival(1.0) - 0.27).abs() < 2e-3);
        assert!(kolmogorov_survival(3.0) < 1e-6);
        assert_eq!(kolmogorov_survival(0.0), 1.0);
    }

    #[test]
    fn test_information_criteria() {
        assert_eq!(aic(-100.0, 3), 206.0);
        assert!((bic(-100.0, 2, 100) - (100f64.ln() * 2.0 + 200.0)).abs() < 1e-12);
        // fewer parameters, same likelihood: lower penalty
        assert!(aic(-50.0, 1) < aic(-50.0, 2));
    }
}
