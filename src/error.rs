//! Error types for the precip-indices library.

use thiserror::Error;

/// Result type alias for climatological operations.
pub type Result<T> = std::result::Result<T, ClimateError>;

/// Errors that can occur while computing precipitation indices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Data cannot support a distribution fit (constant, zero or negative values).
    #[error("degenerate data: {0}")]
    DegenerateData(String),

    /// Input failed an explicit validation check.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ClimateError {
    /// True for errors raised by the distribution fit rather than by the caller.
    pub fn is_fit_failure(&self) -> bool {
        matches!(
            self,
            ClimateError::InsufficientData { .. }
                | ClimateError::DegenerateData(_)
                | ClimateError::ComputationError(_)
        )
    }
}

impl From<toml::de::Error> for ClimateError {
    fn from(err: toml::de::Error) -> Self {
        ClimateError::Config(err.to_string())
    }
}
