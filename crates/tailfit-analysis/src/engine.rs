//! Coordinator that runs analyzers side by side and ranks their results.
//!
//! The engine keeps a registry of [`BoxedAnalyzer`]s in insertion order plus
//! the subset flagged as defaults. A batch run ([`AnalysisEngine::analyze_multiple()`])
//! never fails because one analyzer did: failures are collected next to the
//! successful results, which are then ranked by confidence with an AIC
//! tie-break.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::{
    analyzer::{BoxedAnalyzer, ConfidenceLevel, DistributionAnalyzer, default_analyzers},
    config::EngineConfig,
    empirical::{EmpiricalPoint, Observation, empirical_points},
    error::AnalysisError,
    result::{
        AnalysisResult, AnalysisSummary, AnalyzerFailure, MultiAnalysisResult, PreAnalysis,
        UnsuitableAnalyzer,
    },
};

#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    analyzers: Vec<BoxedAnalyzer>,
    defaults: Vec<String>,
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Creates an engine with no analyzers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with every built-in analyzer registered as a default.
    #[must_use]
    pub fn with_default_analyzers() -> Self {
        let mut engine = Self::new();
        for analyzer in default_analyzers() {
            engine.insert(analyzer, true);
        }
        engine
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers `analyzer` under its name, replacing any analyzer already
    /// registered under that name.
    pub fn register_analyzer(
        &mut self,
        analyzer: BoxedAnalyzer,
        is_default: bool,
    ) -> Result<(), AnalysisError> {
        if analyzer.name().trim().is_empty() {
            return Err(AnalysisError::MissingIdentity);
        }
        self.insert(analyzer, is_default);
        Ok(())
    }

    fn insert(&mut self, analyzer: BoxedAnalyzer, is_default: bool) {
        let name = analyzer.name().to_owned();
        match self.analyzers.iter().position(|a| a.name() == name) {
            Some(index) => self.analyzers[index] = analyzer,
            None => self.analyzers.push(analyzer),
        }
        if is_default && !self.defaults.contains(&name) {
            self.defaults.push(name);
        }
    }

    /// Removes the analyzer registered as `name`, if any.
    pub fn unregister_analyzer(&mut self, name: &str) {
        self.analyzers.retain(|a| a.name() != name);
        self.defaults.retain(|n| n != name);
    }

    #[must_use]
    pub fn analyzer(&self, name: &str) -> Option<&dyn DistributionAnalyzer> {
        self.analyzers
            .iter()
            .find(|a| a.name() == name)
            .map(|a| &**a)
    }

    /// Names of all registered analyzers, in registration order.
    #[must_use]
    pub fn analyzer_names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    #[must_use]
    pub fn default_names(&self) -> Vec<&str> {
        self.defaults.iter().map(String::as_str).collect()
    }

    /// Validates and fits `points` with one analyzer.
    pub fn analyze_single(
        &self,
        name: &str,
        points: &[EmpiricalPoint],
    ) -> Result<AnalysisResult, AnalysisError> {
        let analyzer = self
            .analyzer(name)
            .ok_or_else(|| AnalysisError::AnalyzerNotFound {
                name: name.to_owned(),
            })?;

        let validation = analyzer.validate_data(points);
        if !validation.valid {
            return Err(AnalysisError::ValidationFailed {
                message: validation.message,
            });
        }
        if let Some(warning) = &validation.warning {
            tracing::debug!(analyzer = name, %warning, "validation warning");
        }

        tracing::debug!(analyzer = name, points = points.len(), "running analyzer");
        let raw = analyzer.analyze(points)?;
        Ok(AnalysisResult::standardize(analyzer, raw))
    }

    /// Runs the named analyzers, or the defaults when `names` is `None`.
    ///
    /// Only an empty analyzer list is an error; per-analyzer failures are
    /// reported in [`MultiAnalysisResult::errors`].
    pub fn analyze_multiple(
        &self,
        points: &[EmpiricalPoint],
        names: Option<&[&str]>,
    ) -> Result<MultiAnalysisResult, AnalysisError> {
        let names = match names {
            Some(names) => names.to_vec(),
            None => self.default_names(),
        };
        if names.is_empty() {
            return Err(AnalysisError::NoAnalyzersConfigured);
        }

        let outcomes = if self.config.parallel {
            names
                .par_iter()
                .map(|name| (*name, self.analyze_single(name, points)))
                .collect::<Vec<_>>()
        } else {
            names
                .iter()
                .map(|name| (*name, self.analyze_single(name, points)))
                .collect::<Vec<_>>()
        };

        let mut results = vec![];
        let mut errors = vec![];
        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::warn!(analyzer = name, %error, "analyzer failed");
                    errors.push(AnalyzerFailure {
                        analyzer: name.to_owned(),
                        error: error.to_string(),
                    });
                }
            }
        }

        let results = self.rank_results(results);
        let best_fit = best_fit(&results).cloned();
        let summary = self.generate_summary(&results, best_fit.as_ref(), &errors);
        tracing::info!(
            best_fit = best_fit.as_ref().map(|r| r.distribution_type.as_str()),
            succeeded = results.len(),
            failed = errors.len(),
            "analysis complete"
        );

        Ok(MultiAnalysisResult {
            results,
            best_fit,
            errors,
            summary,
        })
    }

    /// Builds the empirical CCDF of `observations` and runs [`Self::analyze_multiple()`].
    ///
    /// Observations are taken in the given order; sort them by value first.
    pub fn analyze_observations(
        &self,
        observations: &[Observation],
        names: Option<&[&str]>,
    ) -> Result<MultiAnalysisResult, AnalysisError> {
        let points = empirical_points(observations)?;
        self.analyze_multiple(&points, names)
    }

    /// Orders results best first.
    ///
    /// Higher confidence wins unless two scores are within
    /// [`EngineConfig::tie_tolerance`]; such pairs go by lower AIC, then by
    /// more valid points.
    #[must_use]
    pub fn rank_results(&self, mut results: Vec<AnalysisResult>) -> Vec<AnalysisResult> {
        results.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

        // The tolerance makes the ordering non-transitive, so finish with an
        // insertion sort over adjacent pairs instead of `sort_by`.
        let tolerance = self.config.tie_tolerance;
        for i in 1..results.len() {
            let mut j = i;
            while j > 0 && rank_order(&results[j - 1], &results[j], tolerance).is_gt() {
                results.swap(j - 1, j);
                j -= 1;
            }
        }
        results
    }

    #[must_use]
    pub fn generate_summary(
        &self,
        ranked: &[AnalysisResult],
        best_fit: Option<&AnalysisResult>,
        errors: &[AnalyzerFailure],
    ) -> AnalysisSummary {
        if let Some(best) = best_fit {
            let level = ConfidenceLevel::from_score(best.confidence_score);
            let alternatives = ranked
                .iter()
                .filter(|r| r.distribution_type != best.distribution_type)
                .take(self.config.max_alternatives)
                .map(|r| format!("{} ({:.3})", r.display_name, r.confidence_score))
                .collect::<Vec<_>>();
            let recommendation = if alternatives.is_empty() {
                format!("Use the {} model.", best.display_name)
            } else {
                format!(
                    "Use the {} model. Alternatives: {}.",
                    best.display_name,
                    alternatives.join(", ")
                )
            };
            return AnalysisSummary {
                verdict: format!(
                    "The data is best described by a {} distribution ({level} confidence).",
                    best.display_name
                ),
                confidence: Some(best.confidence_score),
                recommendation,
            };
        }

        if let Some(closest) = ranked.first() {
            return AnalysisSummary {
                verdict: "Inconclusive: no distribution fits the data well.".to_owned(),
                confidence: Some(closest.confidence_score),
                recommendation: format!(
                    "The closest match is {} (score {:.3}); collect more data or consider another model.",
                    closest.display_name, closest.confidence_score
                ),
            };
        }

        let messages = errors
            .iter()
            .map(|e| format!("{}: {}", e.analyzer, e.error))
            .collect::<Vec<_>>();
        AnalysisSummary {
            verdict: "All analyses failed.".to_owned(),
            confidence: None,
            recommendation: messages.join("; "),
        }
    }

    /// Runs every registered analyzer's pre-check without fitting anything.
    #[must_use]
    pub fn pre_analyze(&self, points: &[EmpiricalPoint]) -> PreAnalysis {
        let mut suitable = vec![];
        let mut suitable_display = vec![];
        let mut unsuitable = vec![];
        let mut warnings = vec![];

        for analyzer in &self.analyzers {
            let validation = analyzer.validate_data(points);
            if let Some(warning) = validation.warning {
                warnings.push(format!("{}: {warning}", analyzer.display_name()));
            }
            if validation.valid {
                suitable.push(analyzer.name().to_owned());
                suitable_display.push(analyzer.display_name());
            } else {
                unsuitable.push(UnsuitableAnalyzer {
                    analyzer: analyzer.name().to_owned(),
                    reason: validation.message,
                });
            }
        }

        let recommendation = match suitable_display.as_slice() {
            [] => "None of the registered analyzers can process this data.".to_owned(),
            [only] => format!("Only {only} analysis can process this data."),
            many => format!("Suitable analyses: {}.", many.join(", ")),
        };

        PreAnalysis {
            suitable,
            unsuitable,
            warnings,
            recommendation,
        }
    }
}

fn rank_order(a: &AnalysisResult, b: &AnalysisResult, tolerance: f64) -> Ordering {
    if (a.confidence_score - b.confidence_score).abs() > tolerance {
        return b.confidence_score.total_cmp(&a.confidence_score);
    }
    a.goodness_of_fit
        .aic
        .total_cmp(&b.goodness_of_fit.aic)
        .then_with(|| b.valid_data_points.cmp(&a.valid_data_points))
}

/// The top-ranked result, provided it passes its own acceptance threshold.
#[must_use]
pub fn best_fit(ranked: &[AnalysisResult]) -> Option<&AnalysisResult> {
    ranked.first().filter(|r| r.is_good_fit)
}
