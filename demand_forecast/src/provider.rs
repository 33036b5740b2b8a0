//! The forecast provider: policy, fallback, and forecast assembly
//!
//! The provider owns the fitting workflow around a pluggable model:
//! repairing the input series, enforcing the minimum-history policy,
//! bounding the fit by a deadline, absorbing fit failures into the naive
//! fallback, and assembling the final `Forecast` with its invariants.

use crate::cache::FitCache;
use crate::error::{ForecastError, Result};
use crate::forecast::{Forecast, ForecastPoint};
use crate::models::trailing_average::TrailingAverage;
use crate::models::{DemandModel, FitBudget, FittedDemandModel, ModelForecast};
use crate::series::SalesHistory;
use chrono::Duration as ChronoDuration;
use log::warn;
use std::time::Duration;

/// Tunable forecasting policy. Defaults: weekly cycle, two full cycles of
/// history for a seasonal fit, 30-day naive window, 2-second fit deadline.
#[derive(Debug, Clone)]
pub struct ForecastPolicy {
    /// Length of the assumed demand cycle, in days
    pub seasonal_period: usize,
    /// Full cycles of history required before the primary model fits
    pub min_cycles: usize,
    /// Trailing window of the naive fallback model
    pub naive_window: usize,
    /// Wall-clock budget for a single model fit; `None` disables the bound
    pub fit_deadline: Option<Duration>,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            seasonal_period: 7,
            min_cycles: 2,
            naive_window: 30,
            fit_deadline: Some(Duration::from_secs(2)),
        }
    }
}

impl ForecastPolicy {
    /// Observations required before the primary model is attempted
    pub fn min_history(&self) -> usize {
        self.seasonal_period * self.min_cycles
    }

    fn budget(&self) -> FitBudget {
        match self.fit_deadline {
            Some(limit) => FitBudget::with_limit(limit),
            None => FitBudget::none(),
        }
    }
}

/// Forecast provider around a pluggable demand model
#[derive(Debug)]
pub struct ForecastProvider<M: DemandModel> {
    model: M,
    policy: ForecastPolicy,
    cache: FitCache<M::Fitted>,
}

impl<M: DemandModel> ForecastProvider<M> {
    /// Create a provider with the default policy
    pub fn new(model: M) -> Self {
        Self::with_policy(model, ForecastPolicy::default())
    }

    /// Create a provider with an explicit policy
    pub fn with_policy(model: M, policy: ForecastPolicy) -> Self {
        Self {
            model,
            policy,
            cache: FitCache::new(),
        }
    }

    /// The active policy
    pub fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    /// Forecast daily demand for the next `horizon` days.
    ///
    /// The series is gap-filled before fitting. Fit failures (too little
    /// history, divergence, deadline expiry) fall back to the trailing
    /// average and mark the forecast low-confidence; only an unusable
    /// series surfaces an error.
    pub fn forecast(
        &self,
        product_id: &str,
        history: &SalesHistory,
        horizon: usize,
    ) -> Result<Forecast> {
        if horizon == 0 {
            return Err(ForecastError::Validation(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let filled = history.gap_filled()?;

        if filled.len() >= self.policy.min_history() {
            match self.fit_primary(product_id, &filled) {
                Ok(fitted) => {
                    let projection = fitted.forecast(horizon)?;
                    return assemble(product_id, &filled, projection, false, fitted.name());
                }
                Err(ForecastError::InsufficientData(msg))
                | Err(ForecastError::ModelFit(msg)) => {
                    warn!(
                        "{} fit failed for {}, using naive fallback: {}",
                        self.model.name(),
                        product_id,
                        msg
                    );
                }
                Err(other) => return Err(other),
            }
        } else {
            warn!(
                "{} has {} observations, below the {} required; using naive fallback",
                product_id,
                filled.len(),
                self.policy.min_history()
            );
        }

        let naive = TrailingAverage::new(self.policy.naive_window)?;
        let fitted = naive.fit(&filled, &FitBudget::none())?;
        let projection = fitted.forecast(horizon)?;
        assemble(product_id, &filled, projection, true, fitted.name())
    }

    fn fit_primary(&self, product_id: &str, filled: &SalesHistory) -> Result<std::sync::Arc<M::Fitted>> {
        let fingerprint = filled.fingerprint();
        self.cache.get_or_fit(product_id, fingerprint, || {
            self.model.fit(filled, &self.policy.budget())
        })
    }

    /// Populated entries in the fitted-model cache
    pub fn cached_fits(&self) -> usize {
        self.cache.len()
    }
}

fn assemble(
    product_id: &str,
    history: &SalesHistory,
    projection: ModelForecast,
    low_confidence: bool,
    model_name: &str,
) -> Result<Forecast> {
    let last = history.last_date()?;

    let points = projection
        .values()
        .iter()
        .zip(projection.intervals())
        .enumerate()
        .map(|(i, (&estimate, &(lower, upper)))| ForecastPoint {
            date: last + ChronoDuration::days(i as i64 + 1),
            estimate,
            lower,
            upper,
        })
        .collect();

    Forecast::new(product_id, points, low_confidence, model_name)
}
