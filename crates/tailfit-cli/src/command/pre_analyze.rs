use std::{io::Write as _, path::PathBuf};

use tailfit_analysis::{AnalysisEngine, empirical::empirical_points};

use crate::{
    report::OutputFormat,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PreAnalyzeArg {
    /// Observations JSON file: an array of `{ "value", "frequency" }` records
    input: PathBuf,
    /// Output format (json or text)
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PreAnalyzeArg) -> anyhow::Result<()> {
    let PreAnalyzeArg {
        input,
        format,
        output,
    } = arg;

    let observations = util::read_observations_file(input)?;
    let points = empirical_points(&observations)?;
    let pre_analysis = AnalysisEngine::with_default_analyzers().pre_analyze(&points);

    let mut output = Output::from_output_path(output.clone())?;
    match format {
        OutputFormat::Json => output.write_json(&pre_analysis)?,
        OutputFormat::Text => output.write_text(|w| {
            writeln!(w, "{}", pre_analysis.recommendation)?;
            for name in &pre_analysis.suitable {
                writeln!(w, "  ok    {name}")?;
            }
            for unsuitable in &pre_analysis.unsuitable {
                writeln!(w, "  skip  {}: {}", unsuitable.analyzer, unsuitable.reason)?;
            }
            for warning in &pre_analysis.warnings {
                writeln!(w, "  warn  {warning}")?;
            }
            Ok(())
        })?,
    }

    Ok(())
}
