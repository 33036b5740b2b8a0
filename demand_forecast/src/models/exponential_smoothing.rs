//! Simple exponential smoothing for daily demand
//!
//! No trend, no seasonality: a single smoothed level projected flat. Useful
//! for slow-moving products where the weekly cycle is noise.

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, FitBudget, FittedDemandModel, ModelForecast, INTERVAL_Z};
use crate::series::SalesHistory;
use retail_math::dispersion::std_dev;
use retail_math::moving_averages::ExponentialAverage;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    name: String,
    alpha: f64,
}

/// Fitted exponential smoothing state
#[derive(Debug, Clone)]
pub struct FittedExponentialSmoothing {
    name: String,
    level: f64,
    sigma: f64,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model; `alpha` must lie in (0, 1)
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::Validation(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
        })
    }
}

impl DemandModel for ExponentialSmoothing {
    type Fitted = FittedExponentialSmoothing;

    fn fit(&self, history: &SalesHistory, budget: &FitBudget) -> Result<Self::Fitted> {
        let quantities = history.quantities();
        if quantities.len() < 2 {
            return Err(ForecastError::InsufficientData(
                "Exponential smoothing needs at least 2 observations".to_string(),
            ));
        }

        let mut smoother = ExponentialAverage::new(self.alpha)?;
        smoother.update(quantities[0]);
        let mut residuals = Vec::with_capacity(quantities.len() - 1);

        for &observed in &quantities[1..] {
            if budget.expired() {
                return Err(FitBudget::exceeded_error(&self.name));
            }

            residuals.push(observed - smoother.value()?);
            smoother.update(observed);
        }

        let level = smoother.value()?;
        if !level.is_finite() {
            return Err(ForecastError::ModelFit(format!(
                "{} produced a non-finite level",
                self.name
            )));
        }

        Ok(FittedExponentialSmoothing {
            name: self.name.clone(),
            level,
            sigma: std_dev(&residuals)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedDemandModel for FittedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        if horizon == 0 {
            return Err(ForecastError::Validation(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let value = self.level.max(0.0);
        let mut values = Vec::with_capacity(horizon);
        let mut intervals = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let half_width = INTERVAL_Z * self.sigma * (k as f64).sqrt();
            values.push(value);
            intervals.push((value - half_width, value + half_width));
        }

        ModelForecast::new(values, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
