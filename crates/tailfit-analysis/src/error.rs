use tailfit_stats::StatsError;

/// Errors produced by the analyzers and the analysis engine.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    /// A numeric primitive or the regression kernel failed.
    #[display("{_0}")]
    #[from]
    Stats(StatsError),
    /// The observation sequence handed to the empirical transform is empty.
    #[display("no observations to analyze")]
    EmptyInput,
    /// Too few points survived a family's domain filter.
    #[display("insufficient valid data: need at least {required} usable points, got {actual}")]
    InsufficientValidData { required: usize, actual: usize },
    /// An analyzer's pre-check rejected the dataset.
    #[display("{message}")]
    ValidationFailed { message: String },
    /// No analyzer is registered under the requested name.
    #[display("analyzer '{name}' not found")]
    AnalyzerNotFound { name: String },
    /// An analyzer without a name was registered.
    #[display("analyzer must have a non-empty name")]
    MissingIdentity,
    /// The resolved analyzer list is empty.
    #[display("no analyzers configured")]
    NoAnalyzersConfigured,
    /// Parameters of another distribution family were supplied.
    #[display("expected {expected} parameters")]
    ParameterMismatch { expected: &'static str },
}
