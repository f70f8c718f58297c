use std::path::PathBuf;

use anyhow::Context;
use tailfit_analysis::{AnalysisEngine, empirical::empirical_points};

use crate::{
    report::{AnalysisReport, OutputFormat},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Observations JSON file: an array of `{ "value", "frequency" }` records
    input: PathBuf,
    /// Comma-separated analyzers to run instead of the defaults
    #[arg(long, value_delimiter = ',')]
    analyzers: Vec<String>,
    /// Output format (json or text)
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Engine configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run analyzers in parallel
    #[arg(long)]
    parallel: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let AnalyzeArg {
        input,
        analyzers,
        format,
        config,
        parallel,
        output,
    } = arg;

    let mut config = match config {
        Some(path) => util::read_engine_config_file(path)?,
        None => tailfit_analysis::EngineConfig::default(),
    };
    config.parallel |= *parallel;

    eprintln!("Loading observations from {}...", input.display());
    let observations = util::read_observations_file(input)?;
    eprintln!("Loaded {} observations", observations.len());

    let engine = AnalysisEngine::with_default_analyzers().with_config(config);
    let points = empirical_points(&observations)?;
    let names = analyzers.iter().map(String::as_str).collect::<Vec<_>>();
    let names = (!names.is_empty()).then_some(names.as_slice());

    eprintln!("Running analyzers...");
    let outcome = engine
        .analyze_multiple(&points, names)
        .context("Failed to run analyzers")?;
    eprintln!(
        "{} analyzers succeeded, {} failed",
        outcome.results.len(),
        outcome.errors.len()
    );

    let report = AnalysisReport::new(input.clone(), &observations, outcome);
    let mut output = Output::from_output_path(output.clone())?;
    match format {
        OutputFormat::Json => output.write_json(&report)?,
        OutputFormat::Text => output.write_text(|w| report.write_text(w))?,
    }

    Ok(())
}
