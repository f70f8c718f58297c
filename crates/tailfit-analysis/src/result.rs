//! Standardized analysis results consumed by ranking and presentation.

use serde::{Deserialize, Serialize};

use crate::analyzer::{
    Diagnostics, DistributionAnalyzer, GoodnessOfFit, Parameters, RawAnalysis,
};

/// One analyzer's result, tagged with the analyzer's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Name of the analyzer that produced the result.
    pub distribution_type: String,
    pub display_name: String,
    pub description: String,
    pub parameters: Parameters,
    pub goodness_of_fit: GoodnessOfFit,
    pub theoretical_values: Vec<f64>,
    pub diagnostics: Diagnostics,
    pub is_good_fit: bool,
    pub confidence_score: f64,
    pub summary: String,
    pub valid_data_points: usize,
    pub original_data_points: usize,
}

impl AnalysisResult {
    /// Attaches `analyzer`'s identity and derived verdicts to a raw result.
    #[must_use]
    pub fn standardize(analyzer: &dyn DistributionAnalyzer, raw: RawAnalysis) -> Self {
        let is_good_fit = analyzer.is_good_fit(&raw);
        let confidence_score = analyzer.confidence_score(&raw);
        let summary = analyzer.summary(&raw);
        Self {
            distribution_type: analyzer.name().to_owned(),
            display_name: analyzer.display_name().to_owned(),
            description: analyzer.description().to_owned(),
            parameters: raw.parameters,
            goodness_of_fit: raw.goodness_of_fit,
            theoretical_values: raw.theoretical_values,
            diagnostics: raw.diagnostics,
            is_good_fit,
            confidence_score,
            summary,
            valid_data_points: raw.valid_data_points,
            original_data_points: raw.original_data_points,
        }
    }
}

/// An analyzer that failed inside a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerFailure {
    pub analyzer: String,
    pub error: String,
}

/// Human-readable verdict over a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub verdict: String,
    /// Confidence score of the best (or closest) fit; `None` when nothing succeeded.
    pub confidence: Option<f64>,
    pub recommendation: String,
}

/// Outcome of running several analyzers against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAnalysisResult {
    /// Successful results, best first.
    pub results: Vec<AnalysisResult>,
    pub best_fit: Option<AnalysisResult>,
    pub errors: Vec<AnalyzerFailure>,
    pub summary: AnalysisSummary,
}

/// An analyzer judged unable to process the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsuitableAnalyzer {
    pub analyzer: String,
    pub reason: String,
}

/// Outcome of running every analyzer's pre-check without fitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAnalysis {
    pub suitable: Vec<String>,
    pub unsuitable: Vec<UnsuitableAnalyzer>,
    pub warnings: Vec<String>,
    pub recommendation: String,
}
