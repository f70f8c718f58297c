//! Distribution fitting for frequency data.
//!
//! Given `(value, frequency)` observations, this crate builds the empirical
//! survival curve (CCDF), fits several parametric families to it, scores
//! every fit and ranks the families against each other.
//!
//! # Pipeline
//!
//! 1. **Empirical transform** ([`empirical`]): observations become
//!    [`EmpiricalPoint`]s carrying probability, CDF and CCDF
//! 2. **Analyzers** ([`analyzer`]): one per family (power law, log-normal,
//!    exponential), each estimating parameters and judging the fit on the
//!    family's linearizing probability plot
//! 3. **Engine** ([`engine`]): runs analyzers side by side, isolates their
//!    failures, ranks the results and writes a verdict
//!
//! # Modules
//!
//! - [`empirical`]: Observations and the empirical CCDF
//! - [`analyzer`]: The [`DistributionAnalyzer`] trait and the built-in families
//! - [`engine`]: [`AnalysisEngine`], registration, ranking and summaries
//! - [`result`]: Standardized result records
//! - [`config`]: [`EngineConfig`]
//! - [`error`]: [`AnalysisError`]
//!
//! # Examples
//!
//! ## Comparing all built-in families
//!
//! ```
//! use tailfit_analysis::{AnalysisEngine, Observation};
//!
//! let observations = (1..=10u32)
//!     .map(|v| Observation::new(f64::from(v), 1000 / u64::from(v * v)))
//!     .collect::<Vec<_>>();
//!
//! let engine = AnalysisEngine::with_default_analyzers();
//! let outcome = engine.analyze_observations(&observations, None).unwrap();
//! assert_eq!(outcome.results.len() + outcome.errors.len(), 3);
//! println!("{}", outcome.summary.verdict);
//! ```
//!
//! ## Running a single analyzer
//!
//! ```
//! use tailfit_analysis::{
//!     analyzer::{DistributionAnalyzer, Parameters, PowerLawAnalyzer},
//!     empirical::{Observation, empirical_points},
//! };
//!
//! let observations = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0]
//!     .map(|v| Observation::new(v, 10));
//! let points = empirical_points(&observations).unwrap();
//! let analysis = PowerLawAnalyzer.analyze(&points).unwrap();
//! assert!(matches!(analysis.parameters, Parameters::PowerLaw { .. }));
//! ```

pub mod analyzer;
pub mod config;
pub mod empirical;
pub mod engine;
pub mod error;
pub mod result;

pub use self::{
    analyzer::{BoxedAnalyzer, DistributionAnalyzer},
    config::EngineConfig,
    empirical::{EmpiricalPoint, Observation},
    engine::AnalysisEngine,
    error::AnalysisError,
    result::{AnalysisResult, MultiAnalysisResult},
};
