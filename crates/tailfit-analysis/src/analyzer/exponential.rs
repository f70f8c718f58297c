//! Exponential analyzer.
//!
//! `P(X > x) = e^(-λx)`, so `-ln P(X > x) = λx` is a line through the origin.
//! λ is the moment estimate `1 / mean(value)`; the regression slope of
//! `-ln(ccdf)` on `value` is reported separately as a second estimate.
//!
//! With a single parameter the family pays a smaller AIC/BIC penalty than
//! the two-parameter families for the same likelihood.

use tailfit_stats::numeric::{ln, mean};

use super::{
    BoxedAnalyzer, Diagnostics, DistributionAnalyzer, FitInfo, GoodnessOfFit, MIN_VALID_POINTS,
    Parameters, PlotData, PlotKind, PlotPoint, ProbabilityPlot, RawAnalysis, TransformedPoint,
    Validation, goodness_of_fit, validate_counts,
};
use crate::{empirical::EmpiricalPoint, error::AnalysisError};

const PARAMETER_COUNT: usize = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExponentialAnalyzer;

impl ExponentialAnalyzer {
    fn params(parameters: &Parameters) -> Result<f64, AnalysisError> {
        match *parameters {
            Parameters::Exponential { lambda } => Ok(lambda),
            _ => Err(AnalysisError::ParameterMismatch {
                expected: "exponential",
            }),
        }
    }

    fn ccdf_at(x: f64, lambda: f64) -> f64 {
        if lambda == 0.0 || x < 0.0 {
            1.0
        } else {
            (-lambda * x).exp()
        }
    }
}

impl DistributionAnalyzer for ExponentialAnalyzer {
    fn name(&self) -> &str {
        "exponential"
    }

    fn display_name(&self) -> &str {
        "Exponential"
    }

    fn description(&self) -> &str {
        "Memoryless distribution with survival function e^(-λx); \
         a straight line when -ln(CCDF) is plotted against x."
    }

    fn clone_boxed(&self) -> BoxedAnalyzer {
        Box::new(*self)
    }

    fn minimum_data_points(&self) -> usize {
        3
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

        let values = valid.iter().map(|p| p.value).collect::<Vec<_>>();
        let lambda = 1.0 / mean(&values)?;
        let parameters = Parameters::Exponential { lambda };

        let exponential_probability_plot = self.distribution_specific_plot(&valid)?;

        let theoretical_values = self.theoretical_ccdf(&values, &parameters)?;
        #[expect(clippy::cast_precision_loss)]
        let log_likelihood = valid
            .iter()
            .map(|p| p.frequency as f64 * (lambda.ln() - lambda * p.value))
            .sum::<f64>();

        let empirical = valid.iter().map(|p| p.ccdf).collect::<Vec<_>>();
        let goodness_of_fit = self.calculate_goodness_of_fit(
            &empirical,
            &theoretical_values,
            &FitInfo {
                r_squared: exponential_probability_plot.r_squared,
                log_likelihood,
                parameter_count: PARAMETER_COUNT,
                sample_size: valid.len(),
            },
        )?;

        Ok(RawAnalysis {
            parameters,
            goodness_of_fit,
            theoretical_values,
            diagnostics: Diagnostics::Exponential {
                estimated_lambda: exponential_probability_plot.slope,
                exponential_probability_plot,
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
        let lambda = Self::params(parameters)?;
        Ok(x_values.iter().map(|&x| Self::ccdf_at(x, lambda)).collect())
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
                x: Some(p.value),
                y: ln(p.ccdf),
            })
            .collect();

        let values = points.iter().map(|p| p.value).collect::<Vec<_>>();
        let theoretical = values
            .iter()
            .zip(self.theoretical_ccdf(&values, parameters)?)
            .filter_map(|(&x, ccdf)| Some(PlotPoint { x, y: ln(ccdf)? }))
            .collect();

        Ok(PlotData {
            x_label: "value".to_owned(),
            y_label: "ln(P(X > x))".to_owned(),
            empirical,
            theoretical,
        })
    }

    fn distribution_specific_plot(
        &self,
        points: &[EmpiricalPoint],
    ) -> Result<ProbabilityPlot, AnalysisError> {
        let plot_points = points
            .iter()
            .filter(|p| p.value > 0.0)
            .filter_map(|p| {
                Some(PlotPoint {
                    x: p.value,
                    y: -ln(p.ccdf)?,
                })
            })
            .collect();
        ProbabilityPlot::fit(PlotKind::ExponentialProbability, plot_points)
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
