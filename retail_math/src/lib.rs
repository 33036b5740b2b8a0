//! # Retail Math
//!
//! Numeric primitives for retail demand analysis. This crate provides the
//! incremental calculations shared by the forecasting and decision layers:
//! moving averages, linear trend estimation, dispersion measures, and
//! weekly seasonal index extraction.

use thiserror::Error;

pub mod dispersion;
pub mod moving_averages;
pub mod seasonality;
pub mod trend;

/// Errors that can occur in demand-math calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for demand-math operations
pub type Result<T> = std::result::Result<T, MathError>;
