//! Empirical survival statistics from `(value, frequency)` observations.
//!
//! The transform stage turns a frequency table into probabilities and the
//! empirical CDF/CCDF that every analyzer consumes.
//!
//! ```text
//! value  frequency  probability  cdf   ccdf
//!   1       6          0.6       0.6   0.4
//!   2       3          0.3       0.9   0.1
//!   4       1          0.1       1.0   0.0
//! ```
//!
//! The running sum follows input order, so callers sort observations by
//! ascending value first for the CDF to be meaningful.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A single parsed `(value, frequency)` record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: f64,
    pub frequency: u64,
}

impl Observation {
    #[must_use]
    pub fn new(value: f64, frequency: u64) -> Self {
        Self { value, frequency }
    }
}

/// An [`Observation`] extended with its empirical probability, CDF and CCDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalPoint {
    pub value: f64,
    pub frequency: u64,
    /// `frequency / total frequency`
    pub probability: f64,
    /// Cumulative probability up to and including this point.
    pub cdf: f64,
    /// `1 - cdf`
    pub ccdf: f64,
}

impl EmpiricalPoint {
    /// Returns the underlying observation, dropping the derived fields.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::new(self.value, self.frequency)
    }
}

impl From<&EmpiricalPoint> for Observation {
    fn from(point: &EmpiricalPoint) -> Self {
        point.observation()
    }
}

/// Computes probabilities, CDF and CCDF for a sequence of observations.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] if `observations` is empty or every
/// frequency is zero.
///
/// # Examples
///
/// ```
/// use tailfit_analysis::empirical::{Observation, empirical_points};
///
/// let data = [Observation::new(1.0, 6), Observation::new(2.0, 3), Observation::new(4.0, 1)];
/// let points = empirical_points(&data).unwrap();
/// assert!((points[0].probability - 0.6).abs() < 1e-12);
/// assert!((points[1].cdf - 0.9).abs() < 1e-12);
/// assert!(points[2].ccdf.abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn empirical_points(observations: &[Observation]) -> Result<Vec<EmpiricalPoint>, AnalysisError> {
    let total_count = observations.iter().map(|o| o.frequency).sum::<u64>();
    if total_count == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    // Accumulate counts, not probabilities, so the last CCDF is exactly zero.
    let total = total_count as f64;
    let mut cumulative = 0;
    let points = observations
        .iter()
        .map(|o| {
            cumulative += o.frequency;
            EmpiricalPoint {
                value: o.value,
                frequency: o.frequency,
                probability: o.frequency as f64 / total,
                cdf: cumulative as f64 / total,
                ccdf: (total_count - cumulative) as f64 / total,
            }
        })
        .collect();

    Ok(points)
}

/// Sorts observations by ascending value before running [`empirical_points`].
pub fn empirical_points_sorted(
    observations: &[Observation],
) -> Result<Vec<EmpiricalPoint>, AnalysisError> {
    let mut sorted = observations.to_vec();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    empirical_points(&sorted)
}
