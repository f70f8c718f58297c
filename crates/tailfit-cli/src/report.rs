use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tailfit_analysis::{AnalysisResult, MultiAnalysisResult, Observation, analyzer::Parameters};
use tailfit_stats::descriptive::DescriptiveSummary;

const MAX_BAR_WIDTH: usize = 40;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Analysis outcome together with what was analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub observations: usize,
    pub total_frequency: u64,
    /// Summary of the distinct observed values, ignoring frequencies.
    pub values: Option<DescriptiveSummary>,
    #[serde(flatten)]
    pub outcome: MultiAnalysisResult,
}

impl AnalysisReport {
    pub fn new(input: PathBuf, observations: &[Observation], outcome: MultiAnalysisResult) -> Self {
        Self {
            generated_at: Utc::now(),
            input,
            observations: observations.len(),
            total_frequency: observations.iter().map(|o| o.frequency).sum(),
            values: DescriptiveSummary::new(observations.iter().map(|o| o.value)),
            outcome,
        }
    }

    pub fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writeln!(w, "Input: {}", self.input.display())?;
        writeln!(
            w,
            "  {} distinct values, total frequency {}",
            self.observations, self.total_frequency
        )?;
        if let Some(values) = &self.values {
            write!(w, "  range {} .. {}", values.min, values.max)?;
            match values.orders_of_magnitude() {
                Some(orders) => writeln!(w, " ({orders:.1} orders of magnitude)")?,
                None => writeln!(w)?,
            }
        }
        writeln!(w)?;

        let outcome = &self.outcome;
        if !outcome.results.is_empty() {
            writeln!(
                w,
                "{:>12} | {:>5} {:>8} {:>10} {:>4}",
                "distribution", "score", "R²", "AIC", "good"
            )?;
            for result in &outcome.results {
                let gof = &result.goodness_of_fit;
                writeln!(
                    w,
                    "{:>12} | {:.3} {:>8.4} {:>10.2} {:>4} {}",
                    result.display_name,
                    result.confidence_score,
                    gof.r_squared,
                    gof.aic,
                    if result.is_good_fit { "yes" } else { "no" },
                    score_bar(result.confidence_score),
                )?;
            }
            writeln!(w)?;
        }

        for failure in &outcome.errors {
            writeln!(w, "{} failed: {}", failure.analyzer, failure.error)?;
        }
        if !outcome.errors.is_empty() {
            writeln!(w)?;
        }

        if let Some(best) = &outcome.best_fit {
            writeln!(w, "Best fit parameters: {}", format_parameters(best))?;
        }
        writeln!(w, "{}", outcome.summary.verdict)?;
        writeln!(w, "{}", outcome.summary.recommendation)?;
        Ok(())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn score_bar(score: f64) -> String {
    let width = (score.clamp(0.0, 1.0) * MAX_BAR_WIDTH as f64).round() as usize;
    "#".repeat(width)
}

fn format_parameters(result: &AnalysisResult) -> String {
    match result.parameters {
        Parameters::PowerLaw {
            exponent,
            scaling_constant,
        } => format!("α = {exponent:.4}, C = {scaling_constant:.4}"),
        Parameters::LogNormal { mu, sigma } => format!("μ = {mu:.4}, σ = {sigma:.4}"),
        Parameters::Exponential { lambda } => format!("λ = {lambda:.4}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailfit_analysis::AnalysisEngine;

    fn observations() -> Vec<Observation> {
        (0..10u32)
            .map(|i| Observation::new(f64::from(1u32 << i), 1u64 << (12 - i)))
            .collect()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.0), "");
        assert_eq!(score_bar(1.0).len(), MAX_BAR_WIDTH);
        assert_eq!(score_bar(2.0).len(), MAX_BAR_WIDTH);
    }

    #[test]
    fn test_text_report() {
        let observations = observations();
        let outcome = AnalysisEngine::with_default_analyzers()
            .analyze_observations(&observations, None)
            .unwrap();
        let report = AnalysisReport::new(PathBuf::from("data.json"), &observations, outcome);

        let mut buf = vec![];
        report.write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("data.json"));
        assert!(text.contains("Power Law"));
        assert!(text.contains("Best fit parameters: α ="));
        assert!(text.contains(&report.outcome.summary.verdict));
    }

    #[test]
    fn test_json_report_flattens_outcome() {
        let observations = observations();
        let outcome = AnalysisEngine::with_default_analyzers()
            .analyze_observations(&observations, None)
            .unwrap();
        let report = AnalysisReport::new(PathBuf::from("data.json"), &observations, outcome);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["observations"], 10);
        assert!(json["results"].is_array());
        assert!(json["summary"]["verdict"].is_string());
        assert!(json["generated_at"].is_string());
    }
}
