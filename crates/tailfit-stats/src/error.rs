/// Errors produced by the numeric primitives and the regression kernel.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// A parameter is outside the domain of the function.
    #[display("invalid argument: {message}")]
    InvalidArgument { message: String },
    /// The input sequence is empty.
    #[display("input is empty")]
    EmptyInput,
    /// Two sequences that must be aligned have different lengths.
    #[display("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Too few points for the requested computation.
    #[display("insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    /// The input has no variance where variance is required.
    #[display("degenerate input: {message}")]
    DegenerateInput { message: String },
}

impl StatsError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }
}
