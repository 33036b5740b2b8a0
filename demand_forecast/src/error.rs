//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Series too short for the requested model fit; callers fall back to
    /// the naive model rather than aborting
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The model fit diverged or ran past its deadline; recoverable via the
    /// naive fallback
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// A malformed request (bad horizon, bad parameter); surfaced to the
    /// caller, never silently repaired
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error related to series content or structure
    #[error("Data error: {0}")]
    Data(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Polars(err.to_string())
    }
}

impl From<retail_math::MathError> for ForecastError {
    fn from(err: retail_math::MathError) -> Self {
        match err {
            retail_math::MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            retail_math::MathError::InvalidInput(msg) => ForecastError::Validation(msg),
            retail_math::MathError::CalculationError(msg) => ForecastError::ModelFit(msg),
        }
    }
}

impl From<retail_data::DataError> for ForecastError {
    fn from(err: retail_data::DataError) -> Self {
        ForecastError::Data(err.to_string())
    }
}
