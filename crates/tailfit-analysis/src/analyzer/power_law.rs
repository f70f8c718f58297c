//! Power law analyzer.
//!
//! Fits `P(X > x) = C x^-α` by least squares on the log-log CCDF:
//!
//! ```text
//! log10 P(X > x) = log10 C - α log10 x
//! ```
//!
//! so `α = -slope` and `C = 10^intercept`. Points whose value or CCDF is not
//! strictly positive have no log-log coordinates and are left out of the fit.

use tailfit_stats::numeric::{ln_floored, log10};

use super::{
    BoxedAnalyzer, Diagnostics, DistributionAnalyzer, FitInfo, GoodnessOfFit, MIN_VALID_POINTS,
    Parameters, PlotData, PlotKind, PlotPoint, ProbabilityPlot, RawAnalysis, TransformedPoint,
    Validation, goodness_of_fit, validate_counts,
};
use crate::{empirical::EmpiricalPoint, error::AnalysisError};

const PARAMETER_COUNT: usize = 2;

#[derive(Debug, Default, Clone, Copy)]
pub struct PowerLawAnalyzer;

impl PowerLawAnalyzer {
    fn log_log_point(point: &EmpiricalPoint) -> Option<PlotPoint> {
        Some(PlotPoint {
            x: log10(point.value)?,
            y: log10(point.ccdf)?,
        })
    }

    fn params(parameters: &Parameters) -> Result<(f64, f64), AnalysisError> {
        match *parameters {
            Parameters::PowerLaw {
                exponent,
                scaling_constant,
            } => Ok((exponent, scaling_constant)),
            _ => Err(AnalysisError::ParameterMismatch {
                expected: "power law",
            }),
        }
    }
}

impl DistributionAnalyzer for PowerLawAnalyzer {
    fn name(&self) -> &str {
        "power_law"
    }

    fn display_name(&self) -> &str {
        "Power Law"
    }

    fn description(&self) -> &str {
        "Heavy-tailed distribution whose survival function decays as C·x^(-α); \
         a straight line on a log-log CCDF plot."
    }

    fn clone_boxed(&self) -> BoxedAnalyzer {
        Box::new(*self)
    }

    fn minimum_data_points(&self) -> usize {
        5
    }

    fn recommended_minimum_range(&self) -> f64 {
        // one order of magnitude
        10.0
    }

    fn analyze(&self, points: &[EmpiricalPoint]) -> Result<RawAnalysis, AnalysisError> {
        let valid = points
            .iter()
            .filter(|p| Self::log_log_point(p).is_some())
            .copied()
            .collect::<Vec<_>>();
        if valid.len() < MIN_VALID_POINTS {
            return Err(AnalysisError::InsufficientValidData {
                required: MIN_VALID_POINTS,
                actual: valid.len(),
            });
        }

        let log_log_plot = self.distribution_specific_plot(&valid)?;
        let parameters = Parameters::PowerLaw {
            exponent: -log_log_plot.slope,
            scaling_constant: 10f64.powf(log_log_plot.intercept),
        };

        let values = valid.iter().map(|p| p.value).collect::<Vec<_>>();
        let theoretical_values = self.theoretical_ccdf(&values, &parameters)?;
        // Quasi-likelihood over the fitted survival curve rather than a density.
        let log_likelihood = theoretical_values.iter().copied().map(ln_floored).sum::<f64>();

        let empirical = valid.iter().map(|p| p.ccdf).collect::<Vec<_>>();
        let goodness_of_fit = self.calculate_goodness_of_fit(
            &empirical,
            &theoretical_values,
            &FitInfo {
                r_squared: log_log_plot.r_squared,
                log_likelihood,
                parameter_count: PARAMETER_COUNT,
                sample_size: valid.len(),
            },
        )?;

        Ok(RawAnalysis {
            parameters,
            goodness_of_fit,
            theoretical_values,
            diagnostics: Diagnostics::PowerLaw { log_log_plot },
            valid_data_points: valid.len(),
            original_data_points: points.len(),
        })
    }

    fn validate_data(&self, points: &[EmpiricalPoint]) -> Validation {
        validate_counts(
            self,
            points,
            |p| Self::log_log_point(p).is_some(),
            "positive value and CCDF",
        )
    }

    fn theoretical_ccdf(
        &self,
        x_values: &[f64],
        parameters: &Parameters,
    ) -> Result<Vec<f64>, AnalysisError> {
        let (exponent, scaling_constant) = Self::params(parameters)?;
        Ok(x_values
            .iter()
            .map(|&x| {
                if x > 0.0 {
                    scaling_constant * x.powf(-exponent)
                } else {
                    1.0
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
                x: log10(p.value),
                y: log10(p.ccdf),
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
            .filter_map(|(&x, ccdf)| {
                Some(PlotPoint {
                    x: log10(x)?,
                    y: log10(ccdf)?,
                })
            })
            .collect();

        Ok(PlotData {
            x_label: "log10(value)".to_owned(),
            y_label: "log10(P(X > x))".to_owned(),
            empirical,
            theoretical,
        })
    }

    fn distribution_specific_plot(
        &self,
        points: &[EmpiricalPoint],
    ) -> Result<ProbabilityPlot, AnalysisError> {
        let plot_points = points.iter().filter_map(Self::log_log_point).collect();
        ProbabilityPlot::fit(PlotKind::LogLog, plot_points)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::empirical::{Observation, empirical_points};

    fn point(value: f64, frequency: u64, ccdf: f64) -> EmpiricalPoint {
        EmpiricalPoint {
            value,
            frequency,
            probability: 0.0,
            cdf: 1.0 - ccdf,
            ccdf,
        }
    }

    fn doubling_points() -> Vec<EmpiricalPoint> {
        vec![
            point(1.0, 1000, 0.9),
            point(2.0, 250, 0.7),
            point(4.0, 62, 0.5),
            point(8.0, 15, 0.3),
            point(16.0, 4, 0.1),
        ]
    }

    #[test]
    fn test_end_to_end_fit() {
        let analysis = PowerLawAnalyzer.analyze(&doubling_points()).unwrap();
        let Parameters::PowerLaw { exponent, .. } = analysis.parameters else {
            panic!("unexpected parameters: {:?}", analysis.parameters);
        };
        assert!(exponent > 0.0);
        let r2 = analysis.goodness_of_fit.r_squared;
        assert!((0.0..=1.0).contains(&r2));
        assert_eq!(analysis.theoretical_values.len(), 5);
        assert_eq!(analysis.valid_data_points, 5);
        assert_eq!(analysis.goodness_of_fit.parameter_count, 2);
    }

    #[test]
    fn test_recovers_exact_power_law() {
        // P(X > x) = 0.5 x^-1.5
        let points = [1.0, 2.0, 5.0, 10.0, 20.0, 50.0]
            .iter()
            .map(|&x: &f64| point(x, 1, 0.5 * x.powf(-1.5)))
            .collect::<Vec<_>>();
        let analysis = PowerLawAnalyzer.analyze(&points).unwrap();
        let Parameters::PowerLaw {
            exponent,
            scaling_constant,
        } = analysis.parameters
        else {
            panic!("unexpected parameters");
        };
        assert!((exponent - 1.5).abs() < 1e-9);
        assert!((scaling_constant - 0.5).abs() < 1e-9);
        assert!((analysis.goodness_of_fit.r_squared - 1.0).abs() < 1e-9);
        assert!(analysis.goodness_of_fit.is_distribution);
        assert!(PowerLawAnalyzer.is_good_fit(&analysis));
        assert!(analysis.goodness_of_fit.ks_test.statistic < 1e-9);
    }

    #[test]
    fn test_drops_points_without_log_coordinates() {
        let observations = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&v| Observation::new(v, 10))
            .collect::<Vec<_>>();
        // the last point has ccdf = 0 and is dropped
        let points = empirical_points(&observations).unwrap();
        let analysis = PowerLawAnalyzer.analyze(&points).unwrap();
        assert_eq!(analysis.valid_data_points, 3);
        assert_eq!(analysis.original_data_points, 4);
    }

    #[test]
    fn test_insufficient_valid_data() {
        let points = vec![point(1.0, 1, 0.5), point(-2.0, 1, 0.3), point(3.0, 1, 0.0)];
        assert_eq!(
            PowerLawAnalyzer.analyze(&points),
            Err(AnalysisError::InsufficientValidData {
                required: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_validate_data() {
        let too_few = &doubling_points()[..4];
        assert!(!PowerLawAnalyzer.validate_data(too_few).valid);

        let validation = PowerLawAnalyzer.validate_data(&doubling_points());
        assert!(validation.valid);
        assert!(validation.warning.is_none());

        let narrow = (0..6)
            .map(|i| point(1.0 + f64::from(i) * 0.1, 1, 0.9 - f64::from(i) * 0.1))
            .collect::<Vec<_>>();
        let validation = PowerLawAnalyzer.validate_data(&narrow);
        assert!(validation.valid);
        assert!(validation.warning.unwrap().contains("ratio"));
    }

    #[test]
    fn test_validate_transformed_series_without_warning() {
        let observations = (0..10u32)
            .map(|i| Observation::new(f64::from(1u32 << i), 1u64 << (12 - i)))
            .collect::<Vec<_>>();
        let points = empirical_points(&observations).unwrap();
        assert!(points.last().unwrap().ccdf.abs() < f64::EPSILON);

        let validation = PowerLawAnalyzer.validate_data(&points);
        assert!(validation.valid);
        assert_eq!(validation.warning, None);

        let mut points = doubling_points();
        points[1].value = -2.0;
        let warning = PowerLawAnalyzer.validate_data(&points).warning.unwrap();
        assert!(warning.contains("1 point(s) without positive value and CCDF"));
    }

    #[test]
    fn test_theoretical_ccdf_rejects_foreign_parameters() {
        let result = PowerLawAnalyzer.theoretical_ccdf(&[1.0], &Parameters::Exponential { lambda: 1.0 });
        assert!(matches!(result, Err(AnalysisError::ParameterMismatch { .. })));
    }

    #[test]
    fn test_plot_data_marks_undefined_coordinates() {
        let mut points = doubling_points();
        points.push(point(32.0, 1, 0.0));
        let analysis = PowerLawAnalyzer.analyze(&points).unwrap();
        let plot = PowerLawAnalyzer.plot_data(&points, &analysis.parameters).unwrap();
        assert_eq!(plot.empirical.len(), 6);
        assert!(plot.empirical[5].y.is_none());
        assert!(plot.empirical[0].x.is_some());
        assert_eq!(plot.theoretical.len(), 6);
    }
}
