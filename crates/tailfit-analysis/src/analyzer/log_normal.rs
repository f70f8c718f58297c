//! Log-normal analyzer.
//!
//! `ln X ~ Normal(μ, σ)`, so `P(X > x) = 1 - Φ((ln x - μ) / σ)`.
//!
//! μ and σ are moment estimates over `ln(value)`. The fit is judged on a
//! normal probability plot: sorted log values against the normal quantiles of
//! their Blom plotting positions `(i + 1 - 3/8) / (n + 1/4)`. A log-normal
//! sample lies on a straight line there, with intercept μ and slope σ.

use std::f64::consts::PI;

use tailfit_stats::{
    StatsError,
    numeric::{ln, mean, normal_cdf, normal_inverse_cdf, standard_deviation},
};

use super::{
    BoxedAnalyzer, Diagnostics, DistributionAnalyzer, FitInfo, GoodnessOfFit, MIN_VALID_POINTS,
    Parameters, PlotData, PlotKind, PlotPoint, ProbabilityPlot, RawAnalysis, TransformedPoint,
    Validation, goodness_of_fit, validate_counts,
};
use crate::{empirical::EmpiricalPoint, error::AnalysisError};

const PARAMETER_COUNT: usize = 2;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNormalAnalyzer;

impl LogNormalAnalyzer {
    fn params(parameters: &Parameters) -> Result<(f64, f64), AnalysisError> {
        match *parameters {
            Parameters::LogNormal { mu, sigma } => Ok((mu, sigma)),
            _ => Err(AnalysisError::ParameterMismatch {
                expected: "log-normal",
            }),
        }
    }

    /// Log-density of the log-normal distribution at `x > 0`.
    fn ln_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
        let ln_x = x.ln();
        let z = (ln_x - mu) / sigma;
        -ln_x - sigma.ln() - 0.5 * (2.0 * PI).ln() - 0.5 * z * z
    }
}

impl DistributionAnalyzer for LogNormalAnalyzer {
    fn name(&self) -> &str {
        "log_normal"
    }

    fn display_name(&self) -> &str {
        "Log-Normal"
    }

    fn description(&self) -> &str {
        "Distribution whose logarithm is normally distributed; \
         a straight line on a normal probability plot of ln(x)."
    }

    fn clone_boxed(&self) -> BoxedAnalyzer {
        Box::new(*self)
    }

    fn minimum_data_points(&self) -> usize {
        5
    }

    fn recommended_minimum_range(&self) -> f64 {
        2.0
    }

    fn analyze(&self, points: &[EmpiricalPoint]) -> Result<RawAnalysis, AnalysisError> {
        let valid = points
            .iter()
            .filter(|p| p.value > 0.0)
            .copied()
            .collect::<Vec<_>>();
        if valid.len() < MIN_VALID_POINTS {
            return Err(AnalysisError::InsufficientValidData {
                required: MIN_VALID_POINTS,
                actual: valid.len(),
            });
        }

        let ln_values = valid.iter().map(|p| p.value.ln()).collect::<Vec<_>>();
        let mu = mean(&ln_values)?;
        let sigma = standard_deviation(&ln_values, true)?;
        if sigma < 1e-12 {
            return Err(StatsError::DegenerateInput {
                message: "all values are identical; σ is zero".to_owned(),
            }
            .into());
        }
        let parameters = Parameters::LogNormal { mu, sigma };

        let normal_probability_plot = self.distribution_specific_plot(&valid)?;

        let values = valid.iter().map(|p| p.value).collect::<Vec<_>>();
        let theoretical_values = self.theoretical_ccdf(&values, &parameters)?;
        #[expect(clippy::cast_precision_loss)]
        let log_likelihood = valid
            .iter()
            .map(|p| p.frequency as f64 * Self::ln_pdf(p.value, mu, sigma))
            .sum::<f64>();

        let empirical = valid.iter().map(|p| p.ccdf).collect::<Vec<_>>();
        let goodness_of_fit = self.calculate_goodness_of_fit(
            &empirical,
            &theoretical_values,
            &FitInfo {
                r_squared: normal_probability_plot.r_squared,
                log_likelihood,
                parameter_count: PARAMETER_COUNT,
                sample_size: valid.len(),
            },
        )?;

        Ok(RawAnalysis {
            parameters,
            goodness_of_fit,
            theoretical_values,
            diagnostics: Diagnostics::LogNormal {
                estimated_mu: normal_probability_plot.intercept,
                estimated_sigma: normal_probability_plot.slope,
                normal_probability_plot,
            },
            valid_data_points: valid.len(),
            original_data_points: points.len(),
        })
    }

    fn validate_data(&self, points: &[EmpiricalPoint]) -> Validation {
        validate_counts(self, points, |p| p.value > 0.0, "positive values")
    }

    fn theoretical_ccdf(
        &self,
        x_values: &[f64],
        parameters: &Parameters,
    ) -> Result<Vec<f64>, AnalysisError> {
        let (mu, sigma) = Self::params(parameters)?;
        Ok(x_values
            .iter()
            .map(|&x| {
                if x <= 0.0 {
                    1.0
                } else {
                    1.0 - normal_cdf((x.ln() - mu) / sigma)
                }
            })
            .collect())
    }

    fn plot_data(
        &self,
        points: &[EmpiricalPoint],
        parameters: &Parameters,
    ) -> Result<PlotData, AnalysisError> {
        let empirical = points
            .iter()
            .map(|p| TransformedPoint {
                point: *p,
                x: ln(p.value),
                y: Some(p.ccdf),
            })
            .collect();

        let values = points
            .iter()
            .map(|p| p.value)
            .filter(|v| *v > 0.0)
            .collect::<Vec<_>>();
        let theoretical = values
            .iter()
            .zip(self.theoretical_ccdf(&values, parameters)?)
            .map(|(&x, ccdf)| PlotPoint { x: x.ln(), y: ccdf })
            .collect();

        Ok(PlotData {
            x_label: "ln(value)".to_owned(),
            y_label: "P(X > x)".to_owned(),
            empirical,
            theoretical,
        })
    }

    #[expect(clippy::cast_precision_loss)]
    fn distribution_specific_plot(
        &self,
        points: &[EmpiricalPoint],
    ) -> Result<ProbabilityPlot, AnalysisError> {
        let mut ln_values = points.iter().filter_map(|p| ln(p.value)).collect::<Vec<_>>();
        ln_values.sort_by(f64::total_cmp);

        let n = ln_values.len() as f64;
        let plot_points = ln_values
            .iter()
            .enumerate()
            .map(|(i, &ln_value)| {
                let position = (i as f64 + 1.0 - 0.375) / (n + 0.25);
                Ok(PlotPoint {
                    x: normal_inverse_cdf(position)?,
                    y: ln_value,
                })
            })
            .collect::<Result<Vec<_>, StatsError>>()?;

        ProbabilityPlot::fit(PlotKind::NormalProbability, plot_points)
    }

    fn calculate_goodness_of_fit(
        &self,
        empirical: &[f64],
        theoretical: &[f64],
        info: &FitInfo,
    ) -> Result<GoodnessOfFit, AnalysisError> {
        goodness_of_fit(empirical, theoretical, info)
    }
}
