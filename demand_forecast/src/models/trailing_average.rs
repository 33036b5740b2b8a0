//! Trailing-average naive model
//!
//! Flat-line forecast at the mean of the trailing window, with a constant
//! interval from the trailing deviation. This is the fallback the provider
//! reaches for when the primary model cannot fit: the UI must always have
//! something to render.

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, FitBudget, FittedDemandModel, ModelForecast, INTERVAL_Z};
use crate::series::SalesHistory;
use retail_math::dispersion::trailing_std_dev;
use retail_math::moving_averages::trailing_mean;

/// Naive trailing-average model
#[derive(Debug, Clone)]
pub struct TrailingAverage {
    name: String,
    window: usize,
}

/// Fitted trailing-average state
#[derive(Debug, Clone)]
pub struct FittedTrailingAverage {
    name: String,
    mean: f64,
    deviation: f64,
}

impl TrailingAverage {
    /// Create a naive model averaging over the trailing `window` days
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::Validation(
                "Trailing window must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Trailing Average (window={})", window),
            window,
        })
    }
}

impl DemandModel for TrailingAverage {
    type Fitted = FittedTrailingAverage;

    fn fit(&self, history: &SalesHistory, _budget: &FitBudget) -> Result<Self::Fitted> {
        let quantities = history.quantities();
        if quantities.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot average an empty sales history".to_string(),
            ));
        }

        Ok(FittedTrailingAverage {
            name: self.name.clone(),
            mean: trailing_mean(&quantities, self.window)?,
            deviation: trailing_std_dev(&quantities, self.window)?,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedDemandModel for FittedTrailingAverage {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        if horizon == 0 {
            return Err(ForecastError::Validation(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let value = self.mean.max(0.0);
        let half_width = INTERVAL_Z * self.deviation;
        let values = vec![value; horizon];
        let intervals = vec![(value - half_width, value + half_width); horizon];

        ModelForecast::new(values, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
