use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{analyze::AnalyzeArg, generate::GenerateArg, pre_analyze::PreAnalyzeArg};

mod analyze;
mod generate;
mod pre_analyze;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log analyzer runs to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit every distribution family and rank the fits
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Check which analyzers can process a dataset without fitting
    PreAnalyze(#[clap(flatten)] PreAnalyzeArg),
    /// Generate synthetic observations from a known distribution
    Generate(#[clap(flatten)] GenerateArg),
}

/// Installs a stderr subscriber; `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::PreAnalyze(arg) => pre_analyze::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
    }
    Ok(())
}
