//! Distribution analyzers.
//!
//! Each analyzer fits one parametric family to an empirical survival curve and
//! scores the fit. All of them implement [`DistributionAnalyzer`], so the
//! [`AnalysisEngine`](crate::engine::AnalysisEngine) can run them side by side.
//!
//! # Analyzer Architecture
//!
//! An analyzer owns four things for its family:
//!
//! 1. **Parameter estimation** - [`DistributionAnalyzer::analyze()`] turns
//!    [`EmpiricalPoint`]s into [`Parameters`]
//! 2. **Survival function** - [`DistributionAnalyzer::theoretical_ccdf()`]
//!    evaluates the fitted `P(X > x)`
//! 3. **Linearizing plot** - [`DistributionAnalyzer::distribution_specific_plot()`]
//!    builds the family's probability plot, whose regression R² is the
//!    authoritative fit score
//! 4. **Goodness of fit** - [`DistributionAnalyzer::calculate_goodness_of_fit()`]
//!    bundles R², the KS test and the information criteria
//!
//! The provided methods ([`DistributionAnalyzer::is_good_fit()`],
//! [`DistributionAnalyzer::confidence_score()`], [`DistributionAnalyzer::compare_with()`],
//! [`DistributionAnalyzer::summary()`]) derive verdicts from a finished analysis and
//! may be overridden.
//!
//! # Families
//!
//! | analyzer | model | plot | parameters |
//! |---|---|---|---|
//! | [`PowerLawAnalyzer`] | `P(X>x) = C x^-α` | log-log CCDF | 2 |
//! | [`LogNormalAnalyzer`] | `ln X ~ N(μ, σ)` | normal probability | 2 |
//! | [`ExponentialAnalyzer`] | `P(X>x) = e^-λx` | `x` vs `-ln CCDF` | 1 |

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use tailfit_stats::{
    descriptive::DescriptiveSummary,
    goodness_of_fit::{self as criteria, KsTest},
    regression::LinearRegression,
};

use crate::{empirical::EmpiricalPoint, error::AnalysisError};

pub use self::{
    exponential::ExponentialAnalyzer, log_normal::LogNormalAnalyzer,
    power_law::PowerLawAnalyzer,
};

pub mod exponential;
pub mod log_normal;
pub mod power_law;

/// R² (or confidence score) above which a family is accepted.
pub const GOOD_FIT_THRESHOLD: f64 = 0.9;

/// Minimum number of points that must survive a family's domain filter.
pub const MIN_VALID_POINTS: usize = 3;

/// Confidence score gap below which two fits are considered indistinguishable.
pub const INDISTINGUISHABLE_SCORE_GAP: f64 = 0.05;

/// Returns one instance of every built-in analyzer.
#[must_use]
pub fn default_analyzers() -> Vec<BoxedAnalyzer> {
    vec![
        Box::new(PowerLawAnalyzer),
        Box::new(LogNormalAnalyzer),
        Box::new(ExponentialAnalyzer),
    ]
}

/// Fitted parameters, keyed by family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Parameters {
    PowerLaw { exponent: f64, scaling_constant: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Exponential { lambda: f64 },
}

/// Qualitative confidence tier derived from R².
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Maps a score in `[0, 1]` to its tier.
    ///
    /// ```
    /// use tailfit_analysis::analyzer::ConfidenceLevel;
    ///
    /// assert_eq!(ConfidenceLevel::from_score(0.99), ConfidenceLevel::VeryHigh);
    /// assert_eq!(ConfidenceLevel::from_score(0.96), ConfidenceLevel::High);
    /// assert_eq!(ConfidenceLevel::from_score(0.90), ConfidenceLevel::Low);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.98 {
            Self::VeryHigh
        } else if score > 0.95 {
            Self::High
        } else if score > 0.90 {
            Self::Moderate
        } else if score > 0.80 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        };
        f.write_str(label)
    }
}

/// Inputs to [`DistributionAnalyzer::calculate_goodness_of_fit()`] beyond the curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitInfo {
    /// The family's authoritative R² (from its linearizing plot).
    pub r_squared: f64,
    pub log_likelihood: f64,
    pub parameter_count: usize,
    pub sample_size: usize,
}

/// Goodness-of-fit record produced at the end of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFit {
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// KS comparison of the empirical and theoretical CCDF.
    pub ks_test: KsTest,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub parameter_count: usize,
    pub confidence: ConfidenceLevel,
    /// Whether the family's own acceptance rule holds (`R² > 0.9`).
    pub is_distribution: bool,
    pub confidence_score: f64,
}

/// Result of a cheap pre-check run before fitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
    pub warning: Option<String>,
}

impl Validation {
    #[must_use]
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
            warning: None,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            warning: None,
        }
    }

    #[must_use]
    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }
}

/// Linearizing plot of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    /// `log10(value)` vs `log10(ccdf)`
    LogLog,
    /// Theoretical normal quantile vs `ln(value)`
    NormalProbability,
    /// `value` vs `-ln(ccdf)`
    ExponentialProbability,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// A probability plot together with the straight line fitted through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPlot {
    pub kind: PlotKind,
    pub points: Vec<PlotPoint>,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl ProbabilityPlot {
    /// Regresses `y` on `x` over `points`.
    pub fn fit(kind: PlotKind, points: Vec<PlotPoint>) -> Result<Self, AnalysisError> {
        let regression = LinearRegression::fit(points.iter().map(|p| (p.x, p.y)))?;
        Ok(Self {
            kind,
            points,
            slope: regression.slope,
            intercept: regression.intercept,
            r_squared: regression.r_squared,
        })
    }
}

/// Family-specific diagnostics attached to a raw analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Diagnostics {
    PowerLaw {
        log_log_plot: ProbabilityPlot,
    },
    LogNormal {
        normal_probability_plot: ProbabilityPlot,
        /// Plot intercept: a second estimate of μ.
        estimated_mu: f64,
        /// Plot slope: a second estimate of σ.
        estimated_sigma: f64,
    },
    Exponential {
        exponential_probability_plot: ProbabilityPlot,
        /// Plot slope: a regression estimate of λ, independent of the moment estimate.
        estimated_lambda: f64,
    },
}

impl Diagnostics {
    #[must_use]
    pub fn plot(&self) -> &ProbabilityPlot {
        match self {
            Self::PowerLaw { log_log_plot } => log_log_plot,
            Self::LogNormal {
                normal_probability_plot,
                ..
            } => normal_probability_plot,
            Self::Exponential {
                exponential_probability_plot,
                ..
            } => exponential_probability_plot,
        }
    }
}

/// Output of [`DistributionAnalyzer::analyze()`], before the engine attaches
/// the analyzer's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    pub parameters: Parameters,
    pub goodness_of_fit: GoodnessOfFit,
    /// Fitted CCDF evaluated at each valid point's value.
    pub theoretical_values: Vec<f64>,
    pub diagnostics: Diagnostics,
    /// Points that survived the family's domain filter.
    pub valid_data_points: usize,
    pub original_data_points: usize,
}

/// An empirical point with the coordinates it takes on a family's plot.
///
/// Coordinates are `None` where the transform is undefined (log of a
/// non-positive number); such points are kept for display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformedPoint {
    #[serde(flatten)]
    pub point: EmpiricalPoint,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Empirical and fitted survival curves in a family's plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub x_label: String,
    pub y_label: String,
    pub empirical: Vec<TransformedPoint>,
    pub theoretical: Vec<PlotPoint>,
}

pub trait DistributionAnalyzer: fmt::Debug + Send + Sync {
    /// Stable identifier used for registration and lookup.
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn display_name(&self) -> &str;
    #[must_use]
    fn description(&self) -> &str;
    #[must_use]
    fn clone_boxed(&self) -> BoxedAnalyzer;
    #[must_use]
    fn minimum_data_points(&self) -> usize;
    /// Recommended `max / min` ratio of the observed values.
    #[must_use]
    fn recommended_minimum_range(&self) -> f64;

    fn analyze(&self, points: &[EmpiricalPoint]) -> Result<RawAnalysis, AnalysisError>;

    #[must_use]
    fn validate_data(&self, points: &[EmpiricalPoint]) -> Validation;

    fn theoretical_ccdf(
        &self,
        x_values: &[f64],
        parameters: &Parameters,
    ) -> Result<Vec<f64>, AnalysisError>;

    fn plot_data(
        &self,
        points: &[EmpiricalPoint],
        parameters: &Parameters,
    ) -> Result<PlotData, AnalysisError>;

    fn distribution_specific_plot(
        &self,
        points: &[EmpiricalPoint],
    ) -> Result<ProbabilityPlot, AnalysisError>;

    fn calculate_goodness_of_fit(
        &self,
        empirical: &[f64],
        theoretical: &[f64],
        info: &FitInfo,
    ) -> Result<GoodnessOfFit, AnalysisError>;

    /// Whether the analysis clears the acceptance bar.
    ///
    /// The first available metric decides: R², then the recorded confidence
    /// score, then a non-significant KS test. The metrics are not OR-ed: a
    /// finite R² at or below the threshold rejects the fit even when the KS
    /// test is not significant, since small samples rarely reach significance.
    #[must_use]
    fn is_good_fit(&self, analysis: &RawAnalysis) -> bool {
        let gof = &analysis.goodness_of_fit;
        if gof.r_squared.is_finite() {
            gof.r_squared > GOOD_FIT_THRESHOLD
        } else if gof.confidence_score.is_finite() {
            gof.confidence_score > GOOD_FIT_THRESHOLD
        } else {
            !gof.ks_test.significant
        }
    }

    /// Confidence in `[0, 1]` taken from R², the recorded confidence score or
    /// the KS p-value, in that order; 0.5 when none is usable.
    #[must_use]
    fn confidence_score(&self, analysis: &RawAnalysis) -> f64 {
        let gof = &analysis.goodness_of_fit;
        [gof.r_squared, gof.confidence_score, gof.ks_test.p_value]
            .into_iter()
            .find(|v| v.is_finite())
            .unwrap_or(0.5)
            .clamp(0.0, 1.0)
    }

    /// Orders two analyses, `Less` meaning `a` is the better fit.
    ///
    /// Scores further apart than [`INDISTINGUISHABLE_SCORE_GAP`] decide
    /// directly; otherwise AIC, then BIC, the lower winning.
    #[must_use]
    fn compare_with(&self, a: &RawAnalysis, b: &RawAnalysis) -> Ordering {
        let (score_a, score_b) = (self.confidence_score(a), self.confidence_score(b));
        if (score_a - score_b).abs() > INDISTINGUISHABLE_SCORE_GAP {
            return score_b.total_cmp(&score_a);
        }
        let (gof_a, gof_b) = (&a.goodness_of_fit, &b.goodness_of_fit);
        gof_a
            .aic
            .total_cmp(&gof_b.aic)
            .then_with(|| gof_a.bic.total_cmp(&gof_b.bic))
    }

    #[must_use]
    fn summary(&self, analysis: &RawAnalysis) -> String {
        let score = self.confidence_score(analysis);
        let level = ConfidenceLevel::from_score(score);
        let verdict = if self.is_good_fit(analysis) {
            "is consistent with"
        } else {
            "does not convincingly follow"
        };
        format!(
            "{level} confidence: the data {verdict} a {} distribution (score {score:.3}).",
            self.display_name()
        )
    }
}

pub type BoxedAnalyzer = Box<dyn DistributionAnalyzer>;

impl Clone for BoxedAnalyzer {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Goodness-of-fit computation shared by the built-in analyzers.
///
/// `empirical` and `theoretical` are CCDF values aligned point by point.
pub fn goodness_of_fit(
    empirical: &[f64],
    theoretical: &[f64],
    info: &FitInfo,
) -> Result<GoodnessOfFit, AnalysisError> {
    let ks_test = KsTest::new(empirical, theoretical)?;
    let r_squared = info.r_squared;
    let aic = criteria::aic(info.log_likelihood, info.parameter_count);
    let bic = criteria::bic(info.log_likelihood, info.parameter_count, info.sample_size);
    let confidence_score = if r_squared.is_finite() {
        r_squared.clamp(0.0, 1.0)
    } else {
        0.0
    };

    Ok(GoodnessOfFit {
        r_squared,
        adjusted_r_squared: adjusted_r_squared(r_squared, info.sample_size, info.parameter_count),
        ks_test,
        log_likelihood: info.log_likelihood,
        aic,
        bic,
        parameter_count: info.parameter_count,
        confidence: ConfidenceLevel::from_score(r_squared),
        is_distribution: r_squared > GOOD_FIT_THRESHOLD,
        confidence_score,
    })
}

/// `1 - (1 - R²)(n - 1)/(n - k - 1)`, or R² itself when `n <= k + 1`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn adjusted_r_squared(r_squared: f64, sample_size: usize, parameter_count: usize) -> f64 {
    if sample_size <= parameter_count + 1 {
        return r_squared;
    }
    let n = sample_size as f64;
    let k = parameter_count as f64;
    1.0 - (1.0 - r_squared) * (n - 1.0) / (n - k - 1.0)
}

/// Shared pre-check: overall count, usable count and value range.
fn validate_counts(
    analyzer: &dyn DistributionAnalyzer,
    points: &[EmpiricalPoint],
    usable: impl Fn(&EmpiricalPoint) -> bool,
    usable_label: &str,
) -> Validation {
    let name = analyzer.display_name();
    let minimum = analyzer.minimum_data_points();
    if points.len() < minimum {
        return Validation::invalid(format!(
            "{name} analysis requires at least {minimum} data points, got {}",
            points.len()
        ));
    }

    let usable_values = points
        .iter()
        .filter(|p| usable(p))
        .map(|p| p.value)
        .collect::<Vec<_>>();
    if usable_values.len() < MIN_VALID_POINTS {
        return Validation::invalid(format!(
            "{name} analysis requires at least {MIN_VALID_POINTS} {usable_label}, got {}",
            usable_values.len()
        ));
    }

    let mut warnings = vec![];
    // the final point of a transformed series always has ccdf 0
    let dropped = points
        .iter()
        .enumerate()
        .filter(|&(i, p)| {
            let closing_point = i + 1 == points.len() && p.ccdf <= 0.0 && p.value > 0.0;
            !usable(p) && !closing_point
        })
        .count();
    if dropped > 0 {
        warnings.push(format!(
            "{dropped} point(s) without {usable_label} will be ignored"
        ));
    }
    let recommended = analyzer.recommended_minimum_range();
    let ratio = DescriptiveSummary::new(usable_values).and_then(|s| s.range_ratio());
    if let Some(ratio) = ratio.filter(|r| *r < recommended) {
        warnings.push(format!(
            "values span a ratio of {ratio:.2}, less than the recommended {recommended}"
        ));
    }

    let warning = (!warnings.is_empty()).then(|| warnings.join("; "));
    Validation::valid(format!("Data is suitable for {name} analysis")).with_warning(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::empirical::{Observation, empirical_points};

    fn analysis_with(r_squared: f64, aic: f64, bic: f64) -> RawAnalysis {
        let points = empirical_points(&[
            Observation::new(1.0, 50),
            Observation::new(2.0, 25),
            Observation::new(4.0, 12),
            Observation::new(8.0, 6),
            Observation::new(16.0, 3),
        ])
        .unwrap();
        let mut analysis = PowerLawAnalyzer.analyze(&points).unwrap();
        analysis.goodness_of_fit.r_squared = r_squared;
        analysis.goodness_of_fit.confidence_score = r_squared;
        analysis.goodness_of_fit.aic = aic;
        analysis.goodness_of_fit.bic = bic;
        analysis
    }

    #[test]
    fn test_confidence_level_tiers() {
        assert_eq!(ConfidenceLevel::from_score(0.985), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_score(0.96), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.91), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.5), ConfidenceLevel::VeryLow);
        assert_eq!(ConfidenceLevel::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn test_adjusted_r_squared() {
        assert!((adjusted_r_squared(0.9, 12, 1) - (1.0 - 0.1 * 11.0 / 10.0)).abs() < 1e-12);
        assert_eq!(adjusted_r_squared(0.9, 3, 2), 0.9);
    }

    #[test]
    fn test_confidence_score_fallbacks() {
        let mut analysis = analysis_with(1.2, 10.0, 10.0);
        assert_eq!(PowerLawAnalyzer.confidence_score(&analysis), 1.0);

        analysis.goodness_of_fit.r_squared = f64::NAN;
        analysis.goodness_of_fit.confidence_score = 0.7;
        assert!((PowerLawAnalyzer.confidence_score(&analysis) - 0.7).abs() < 1e-12);

        analysis.goodness_of_fit.confidence_score = f64::NAN;
        analysis.goodness_of_fit.ks_test.p_value = 0.3;
        assert!((PowerLawAnalyzer.confidence_score(&analysis) - 0.3).abs() < 1e-12);

        analysis.goodness_of_fit.ks_test.p_value = f64::NAN;
        assert_eq!(PowerLawAnalyzer.confidence_score(&analysis), 0.5);
    }

    #[test]
    fn test_is_good_fit_priority() {
        let mut analysis = analysis_with(0.95, 10.0, 10.0);
        assert!(PowerLawAnalyzer.is_good_fit(&analysis));

        analysis.goodness_of_fit.r_squared = 0.5;
        analysis.goodness_of_fit.ks_test.significant = false;
        assert!(!PowerLawAnalyzer.is_good_fit(&analysis));

        analysis.goodness_of_fit.r_squared = f64::NAN;
        analysis.goodness_of_fit.confidence_score = f64::NAN;
        assert!(PowerLawAnalyzer.is_good_fit(&analysis));
    }

    #[test]
    fn test_compare_with() {
        let strong = analysis_with(0.99, 50.0, 60.0);
        let weak = analysis_with(0.80, 10.0, 10.0);
        assert_eq!(PowerLawAnalyzer.compare_with(&strong, &weak), Ordering::Less);
        assert_eq!(PowerLawAnalyzer.compare_with(&weak, &strong), Ordering::Greater);

        // Indistinguishable scores fall back to AIC, then BIC.
        let a = analysis_with(0.95, 100.0, 80.0);
        let b = analysis_with(0.93, 120.0, 70.0);
        assert_eq!(PowerLawAnalyzer.compare_with(&b, &a), Ordering::Greater);
        let c = analysis_with(0.94, 100.0, 70.0);
        assert_eq!(PowerLawAnalyzer.compare_with(&a, &c), Ordering::Greater);
        assert_eq!(PowerLawAnalyzer.compare_with(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_summary_mentions_family() {
        let analysis = analysis_with(0.99, 10.0, 10.0);
        let summary = PowerLawAnalyzer.summary(&analysis);
        assert!(summary.contains("Power Law"));
        assert!(summary.starts_with("Very High"));
    }

    #[test]
    fn test_default_analyzers_have_unique_names() {
        let analyzers = default_analyzers();
        let mut names = analyzers.iter().map(|a| a.name()).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
        assert!(analyzers.iter().all(|a| !a.display_name().is_empty()));
    }
}
