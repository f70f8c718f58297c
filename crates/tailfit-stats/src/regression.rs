use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Variance below which the predictor is treated as constant.
const DEGENERATE_THRESHOLD: f64 = 1e-10;

/// Ordinary least squares fit of `y = slope * x + intercept`.
///
/// # Fields
///
/// Besides the line itself the fit keeps per-point residuals (in input order)
/// and the standard error of the estimate, `sqrt(SS_res / (n - 2))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination. Defined as 1.0 when `y` has no variance.
    pub r_squared: f64,
    pub residuals: Vec<f64>,
    pub sample_size: usize,
    pub standard_error: f64,
}

impl LinearRegression {
    /// Fits a line through `(x, y)` points.
    ///
    /// # Errors
    ///
    /// * [`StatsError::InsufficientData`] - fewer than 2 points
    /// * [`StatsError::DegenerateInput`] - all `x` values are identical
    ///
    /// # Examples
    ///
    /// ```
    /// use tailfit_stats::regression::LinearRegression;
    ///
    /// let fit = LinearRegression::fit([(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]).unwrap();
    /// assert!((fit.slope - 2.0).abs() < 1e-9);
    /// assert!(fit.intercept.abs() < 1e-9);
    /// assert!((fit.r_squared - 1.0).abs() < 1e-9);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn fit<I>(points: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        let sample_size = points.len();
        if sample_size < 2 {
            return Err(StatsError::InsufficientData {
                required: 2,
                actual: sample_size,
            });
        }

        let n = sample_size as f64;
        let sum_x = points.iter().map(|(x, _)| x).sum::<f64>();
        let sum_y = points.iter().map(|(_, y)| y).sum::<f64>();
        let sum_xy = points.iter().map(|(x, y)| x * y).sum::<f64>();
        let sum_xx = points.iter().map(|(x, _)| x * x).sum::<f64>();

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() < DEGENERATE_THRESHOLD {
            return Err(StatsError::degenerate(
                "all x values are identical; slope is undefined",
            ));
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let residuals = points
            .iter()
            .map(|(x, y)| y - (slope * x + intercept))
            .collect::<Vec<_>>();
        let ss_res = residuals.iter().map(|r| r * r).sum::<f64>();
        let ss_tot = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum::<f64>();
        let r_squared = if ss_tot == 0.0 {
            1.0
        } else {
            1.0 - ss_res / ss_tot
        };

        let standard_error = if sample_size > 2 {
            (ss_res / (n - 2.0)).sqrt()
        } else {
            0.0
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            residuals,
            sample_size,
            standard_error,
        })
    }

    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let fit = LinearRegression::fit([(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!(fit.intercept.abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.sample_size, 4);
        assert!(fit.standard_error.abs() < 1e-9);
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-9));
    }

    #[test]
    fn test_noisy_line() {
        let points = [(0.0, 1.1), (1.0, 2.9), (2.0, 5.2), (3.0, 6.8), (4.0, 9.1)];
        let fit = LinearRegression::fit(points).unwrap();
        assert!((fit.slope - 2.0).abs() < 0.1);
        assert!((fit.intercept - 1.0).abs() < 0.2);
        assert!(fit.r_squared > 0.99 && fit.r_squared < 1.0);
        assert!(fit.standard_error > 0.0);
        assert!((fit.predict(10.0) - (fit.slope * 10.0 + fit.intercept)).abs() < 1e-12);
    }

    #[test]
    fn test_constant_y_is_perfect_fit() {
        let fit = LinearRegression::fit([(1.0, 3.0), (2.0, 3.0), (3.0, 3.0)]).unwrap();
        assert_eq!(fit.r_squared, 1.0);
        assert!(fit.slope.abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_points() {
        assert_eq!(
            LinearRegression::fit([(1.0, 1.0)]),
            Err(StatsError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
        assert!(LinearRegression::fit(std::iter::empty()).is_err());
    }

    #[test]
    fn test_identical_x_is_degenerate() {
        let result = LinearRegression::fit([(2.0, 1.0), (2.0, 5.0), (2.0, 9.0)]);
        assert!(matches!(result, Err(StatsError::DegenerateInput { .. })));
    }
}
