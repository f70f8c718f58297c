use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, ensure};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, LogNormal, Pareto};
use rand_pcg::Pcg32;
use tailfit_analysis::Observation;

use crate::util::Output;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Family {
    #[default]
    PowerLaw,
    LogNormal,
    Exponential,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Distribution to sample from
    #[arg(long, value_enum, default_value_t)]
    family: Family,
    /// Number of samples to draw
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    /// Seed for reproducible output; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Decimal places kept when rounding samples into observations
    #[arg(long, default_value_t = 2)]
    precision: u8,
    /// Power law tail exponent of the density (Pareto shape)
    #[arg(long, default_value_t = 2.5)]
    alpha: f64,
    /// Power law minimum value (Pareto scale)
    #[arg(long, default_value_t = 1.0)]
    x_min: f64,
    /// Log-normal mean of ln(x)
    #[arg(long, default_value_t = 1.0)]
    mu: f64,
    /// Log-normal standard deviation of ln(x)
    #[arg(long, default_value_t = 0.5)]
    sigma: f64,
    /// Exponential rate
    #[arg(long, default_value_t = 0.5)]
    lambda: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    ensure!(arg.samples > 0, "--samples must be positive");
    ensure!(arg.precision <= 12, "--precision must be at most 12");

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    eprintln!(
        "Drawing {} {:?} samples (seed {seed})...",
        arg.samples, arg.family
    );

    let samples = match arg.family {
        Family::PowerLaw => {
            let pareto = Pareto::new(arg.x_min, arg.alpha).context("Invalid power law parameters")?;
            draw(&pareto, arg.samples, &mut rng)
        }
        Family::LogNormal => {
            let log_normal =
                LogNormal::new(arg.mu, arg.sigma).context("Invalid log-normal parameters")?;
            draw(&log_normal, arg.samples, &mut rng)
        }
        Family::Exponential => {
            let exp = Exp::new(arg.lambda).context("Invalid exponential parameters")?;
            draw(&exp, arg.samples, &mut rng)
        }
    };

    let observations = aggregate(samples, arg.precision);
    eprintln!(
        "Aggregated into {} distinct values",
        observations.len()
    );

    Output::save_json(&observations, arg.output.clone())?;

    Ok(())
}

fn draw<D, R>(distribution: &D, samples: usize, rng: &mut R) -> Vec<f64>
where
    D: Distribution<f64>,
    R: Rng,
{
    distribution.sample_iter(rng).take(samples).collect()
}

/// Rounds samples to `precision` decimals and counts each distinct value.
///
/// Samples that round to zero or below are discarded, since every fitted
/// family needs positive values. The result is sorted by ascending value.
#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn aggregate(samples: Vec<f64>, precision: u8) -> Vec<Observation> {
    let scale = 10f64.powi(i32::from(precision));
    let mut counts = BTreeMap::<i64, u64>::new();
    let mut discarded = 0usize;
    for sample in samples {
        let key = (sample * scale).round() as i64;
        if key > 0 {
            *counts.entry(key).or_insert(0) += 1;
        } else {
            discarded += 1;
        }
    }
    if discarded > 0 {
        tracing::warn!(discarded, precision, "discarding samples that round to zero");
    }
    counts
        .into_iter()
        .map(|(key, frequency)| Observation::new(key as f64 / scale, frequency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_rounds_and_counts() {
        let observations = aggregate(vec![1.004, 2.5, 0.996, 2.501, 10.0], 2);
        assert_eq!(
            observations,
            vec![
                Observation::new(1.0, 2),
                Observation::new(2.5, 2),
                Observation::new(10.0, 1),
            ]
        );
    }

    #[test]
    fn test_aggregate_discards_non_positive_values() {
        let observations = aggregate(vec![0.004, 0.0, -1.0, 0.006, 0.5], 2);
        assert_eq!(
            observations,
            vec![Observation::new(0.01, 1), Observation::new(0.5, 1)]
        );

        let exp = Exp::new(0.5).unwrap();
        let samples = draw(&exp, 10_000, &mut Pcg32::seed_from_u64(3));
        let observations = aggregate(samples, 2);
        assert!(observations.iter().all(|o| o.value > 0.0));
    }

    #[test]
    fn test_same_seed_same_samples() {
        let exp = Exp::new(0.5).unwrap();
        let a = draw(&exp, 100, &mut Pcg32::seed_from_u64(7));
        let b = draw(&exp, 100, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn test_pareto_samples_respect_minimum() {
        let pareto = Pareto::new(2.0, 1.5).unwrap();
        let samples = draw(&pareto, 500, &mut Pcg32::seed_from_u64(1));
        assert!(samples.iter().all(|x| *x >= 2.0));
        let observations = aggregate(samples, 1);
        assert!(observations.windows(2).all(|w| w[0].value < w[1].value));
        assert_eq!(observations.iter().map(|o| o.frequency).sum::<u64>(), 500);
    }
}
