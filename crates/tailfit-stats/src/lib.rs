//! Statistical primitives for the tailfit distribution analysis engine.
//!
//! This crate provides the numeric building blocks the analyzers are made of:
//!
//! - **Numeric primitives**: domain-guarded logarithms, normal CDF and its inverse,
//!   mean and standard deviation
//! - **Regression**: ordinary least squares with R², residuals and standard error
//! - **Goodness of fit**: Kolmogorov-Smirnov statistic with p-value and critical value,
//!   Akaike and Bayesian information criteria
//! - **Descriptive summary**: min/max/mean/median and the spanned range of a dataset
//!
//! # Modules
//!
//! - [`numeric`]: Logarithms, normal distribution approximations, moments
//! - [`regression`]: Linear least-squares fitting
//! - [`goodness_of_fit`]: KS test, AIC and BIC
//! - [`descriptive`]: Descriptive summary of observed values
//! - [`error`]: Error type shared by the fallible functions
//!
//! # Examples
//!
//! ## Fitting a line
//!
//! ```
//! use tailfit_stats::regression::LinearRegression;
//!
//! let fit = LinearRegression::fit([(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!((fit.r_squared - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Comparing two CDFs
//!
//! ```
//! use tailfit_stats::goodness_of_fit::KsTest;
//!
//! let empirical = [0.25, 0.5, 0.75, 1.0];
//! let theoretical = [0.2, 0.55, 0.7, 1.0];
//! let test = KsTest::new(&empirical, &theoretical).unwrap();
//! assert!((test.statistic - 0.05).abs() < 1e-12);
//! assert!(!test.significant);
//! ```

pub mod descriptive;
pub mod error;
pub mod goodness_of_fit;
pub mod numeric;
pub mod regression;

pub use self::error::StatsError;
