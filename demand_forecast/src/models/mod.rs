//! Demand models for daily sales series
//!
//! A model splits into an untrained configuration (`DemandModel`) and the
//! artifact produced by fitting it to a series (`FittedDemandModel`). The
//! forecast provider only speaks to these traits; swapping the statistical
//! model never touches the risk or simulation layers.

use crate::error::{ForecastError, Result};
use crate::series::SalesHistory;
use std::fmt::Debug;
use std::time::{Duration, Instant};

pub mod exponential_smoothing;
pub mod seasonal_smoothing;
pub mod trailing_average;

/// z-width used by models when turning a residual deviation into a
/// prediction interval (95% two-sided)
pub const INTERVAL_Z: f64 = 1.96;

/// Raw model output: per-step point estimates with prediction intervals
#[derive(Debug, Clone)]
pub struct ModelForecast {
    values: Vec<f64>,
    intervals: Vec<(f64, f64)>,
}

impl ModelForecast {
    /// Create a model forecast; values and intervals must align
    pub fn new(values: Vec<f64>, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::Validation(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        Ok(Self { values, intervals })
    }

    /// Point estimates, one per forecast step
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// (lower, upper) prediction interval per forecast step
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.values.len()
    }
}

/// Wall-clock budget for a model fit. Fitting loops check `expired`
/// between iterations; an exhausted budget turns into a `ModelFit` error,
/// which the provider downgrades to the naive fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitBudget {
    deadline: Option<Instant>,
}

impl FitBudget {
    /// Unlimited budget
    pub fn none() -> Self {
        Self { deadline: None }
    }

    /// Budget that expires `limit` from now
    pub fn with_limit(limit: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + limit),
        }
    }

    /// Whether the deadline has passed
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }

    /// Error to return when a fitting loop hits the deadline
    pub(crate) fn exceeded_error(model: &str) -> ForecastError {
        ForecastError::ModelFit(format!("{} fit exceeded its deadline", model))
    }
}

/// A demand model configuration that can be fitted to a sales history
pub trait DemandModel: Debug + Clone {
    /// The fitted artifact this model produces
    type Fitted: FittedDemandModel;

    /// Fit the model to a dense, chronological sales history
    fn fit(&self, history: &SalesHistory, budget: &FitBudget) -> Result<Self::Fitted>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A fitted demand model that can project future demand
pub trait FittedDemandModel: Debug + Send + Sync {
    /// Project demand for the next `horizon` days
    fn forecast(&self, horizon: usize) -> Result<ModelForecast>;

    /// Name of the model
    fn name(&self) -> &str;
}
