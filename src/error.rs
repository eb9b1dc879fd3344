//! Error types.
//!
//! `FitError` is what every fallible operation in this crate returns.
//! `ModelFault` is what a model returns when it cannot be evaluated at a given
//! input; the merit function wraps it with the index of the offending point.

/// A model could not be evaluated (out-of-domain input, invalid parameters, ...).
#[derive(Clone, PartialEq)]
pub struct ModelFault {
    message: String,
}

impl ModelFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ModelFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for ModelFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFault")
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ModelFault {}

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// A percentile rank was requested from zero residuals.
    EmptyResidualSet,
    /// `k >= n`: the degrees-of-freedom correction `n / (n - k)` is undefined.
    DegenerateDegreesOfFreedom { n: usize, k: usize },
    /// The robust scale is zero while some residual is not.
    DegenerateScale,
    /// The model faulted (or returned a non-finite value) at point `index`.
    ModelEvaluation { index: usize, fault: ModelFault },
    InvalidInput(String),
    InvalidConfig(String),
    /// Every fit candidate faulted or was rejected.
    NoValidCandidate(String),
}

impl FitError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        FitError::InvalidInput(message.into())
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        FitError::InvalidConfig(message.into())
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::EmptyResidualSet => write!(f, "Residual set is empty."),
            FitError::DegenerateDegreesOfFreedom { n, k } => write!(
                f,
                "Degenerate degrees of freedom: n={n} points, k={k} parameters (need n > k)."
            ),
            FitError::DegenerateScale => {
                write!(f, "Robust scale is zero but residuals are not all zero.")
            }
            FitError::ModelEvaluation { index, fault } => {
                write!(f, "Model evaluation failed at point {index}: {fault}")
            }
            FitError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            FitError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            FitError::NoValidCandidate(msg) => write!(f, "No valid fit candidate: {msg}"),
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FitError::ModelEvaluation { fault, .. } => Some(fault),
            _ => None,
        }
    }
}
