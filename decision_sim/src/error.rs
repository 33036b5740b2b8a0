//! Error types for the decision_sim crate

use demand_forecast::ForecastError;
use thiserror::Error;

/// Custom error types for the decision_sim crate
#[derive(Debug, Error)]
pub enum SimError {
    /// The request is economically meaningless and was rejected, never
    /// clamped into range
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying forecast failed in a non-recoverable way
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SimError>;
