//! Seasonal smoothing model for daily retail demand
//!
//! Level + linear trend + multiplicative weekly seasonality, updated by
//! exponential smoothing. This is the primary model: retail demand is
//! dominated by the weekly cycle, and the smoothing recursions are cheap
//! enough to re-fit on every request.

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, FitBudget, FittedDemandModel, ModelForecast, INTERVAL_Z};
use crate::series::SalesHistory;
use retail_math::dispersion::std_dev;
use retail_math::seasonality::{deseasonalize, seasonal_indices};
use retail_math::trend::slope_of;

const MIN_SEASONAL_INDEX: f64 = 0.05;
const MIN_LEVEL: f64 = 1e-9;

/// Seasonal smoothing model configuration
#[derive(Debug, Clone)]
pub struct SeasonalSmoothing {
    name: String,
    /// Level smoothing factor
    alpha: f64,
    /// Trend smoothing factor
    beta: f64,
    /// Seasonal smoothing factor
    gamma: f64,
    /// Cycle length in days
    period: usize,
}

/// Fitted seasonal smoothing state
#[derive(Debug, Clone)]
pub struct FittedSeasonalSmoothing {
    name: String,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    /// Cycle position of the day after the last observation
    phase: usize,
    /// One-step-ahead residual deviation
    sigma: f64,
}

impl SeasonalSmoothing {
    /// Create a seasonal smoothing model; factors must lie in (0, 1) and
    /// the period must be at least 2 days
    pub fn new(alpha: f64, beta: f64, gamma: f64, period: usize) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ForecastError::Validation(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if period < 2 {
            return Err(ForecastError::Validation(
                "Seasonal period must be at least 2 days".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Seasonal Smoothing (period={})", period),
            alpha,
            beta,
            gamma,
            period,
        })
    }

    /// Weekly-cycle model with conservative smoothing factors
    pub fn weekly() -> Self {
        Self {
            name: "Seasonal Smoothing (period=7)".to_string(),
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.2,
            period: 7,
        }
    }

    /// Cycle length in days
    pub fn period(&self) -> usize {
        self.period
    }
}

impl DemandModel for SeasonalSmoothing {
    type Fitted = FittedSeasonalSmoothing;

    fn fit(&self, history: &SalesHistory, budget: &FitBudget) -> Result<Self::Fitted> {
        let quantities = history.quantities();
        if quantities.len() < 2 * self.period {
            return Err(ForecastError::InsufficientData(format!(
                "Seasonal fit needs at least {} observations ({} full cycles), have {}",
                2 * self.period,
                2,
                quantities.len()
            )));
        }

        // Initial state from the first two cycles
        let mut seasonal = seasonal_indices(&quantities[..2 * self.period], self.period)?;
        for idx in &mut seasonal {
            *idx = idx.max(MIN_SEASONAL_INDEX);
        }

        let warmup = deseasonalize(&quantities[..2 * self.period], &seasonal)?;
        let mut level = (warmup[..self.period].iter().sum::<f64>() / self.period as f64)
            .max(MIN_LEVEL);
        let mut trend = slope_of(&warmup)?;

        let mut residuals = Vec::with_capacity(quantities.len());

        for (t, &observed) in quantities.iter().enumerate() {
            if budget.expired() {
                return Err(FitBudget::exceeded_error(&self.name));
            }

            let pos = t % self.period;
            let expected = (level + trend) * seasonal[pos];
            residuals.push(observed - expected);

            let deseasonalized = observed / seasonal[pos];
            let prior_level = level;
            level = self.alpha * deseasonalized + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prior_level) + (1.0 - self.beta) * trend;

            if level > MIN_LEVEL {
                seasonal[pos] = (self.gamma * observed / level
                    + (1.0 - self.gamma) * seasonal[pos])
                    .max(MIN_SEASONAL_INDEX);
            }

            if !level.is_finite() || !trend.is_finite() {
                return Err(ForecastError::ModelFit(format!(
                    "{} diverged at observation {}",
                    self.name, t
                )));
            }
        }

        let sigma = std_dev(&residuals)?;

        Ok(FittedSeasonalSmoothing {
            name: self.name.clone(),
            level,
            trend,
            seasonal,
            phase: quantities.len() % self.period,
            sigma,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedDemandModel for FittedSeasonalSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        if horizon == 0 {
            return Err(ForecastError::Validation(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let period = self.seasonal.len();
        let mut values = Vec::with_capacity(horizon);
        let mut intervals = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let pos = (self.phase + k - 1) % period;
            let raw = (self.level + k as f64 * self.trend) * self.seasonal[pos];
            let value = raw.max(0.0);

            // Uncertainty widens with the projection distance
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use retail_data::DailySales;

    fn history(quantities: &[f64]) -> SalesHistory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| DailySales {
                date: start + chrono::Duration::days(i as i64),
                quantity: q,
            })
            .collect();
        SalesHistory::from_observations(observations).unwrap()
    }

    #[test]
    fn flat_series_projects_flat() {
        let model = SeasonalSmoothing::weekly();
        let fitted = model.fit(&history(&[10.0; 60]), &FitBudget::none()).unwrap();
        let forecast = fitted.forecast(7).unwrap();

        for &v in forecast.values() {
            assert!((v - 10.0).abs() < 0.1, "expected ~10, got {}", v);
        }
    }

    #[test]
    fn weekly_cycle_is_reproduced() {
        let mut quantities = Vec::new();
        for _ in 0..8 {
            quantities.extend_from_slice(&[8.0, 8.0, 8.0, 8.0, 8.0, 16.0, 16.0]);
        }
        let model = SeasonalSmoothing::weekly();
        let fitted = model.fit(&history(&quantities), &FitBudget::none()).unwrap();
        let forecast = fitted.forecast(7).unwrap();

        // Series length is a multiple of 7, so forecast day k maps to cycle
        // position k-1; positions 5 and 6 are the spike days.
        let values = forecast.values();
        assert!(values[5] > values[0] * 1.5);
        assert!(values[6] > values[0] * 1.5);
    }

    #[test]
    fn short_series_is_insufficient() {
        let model = SeasonalSmoothing::weekly();
        let result = model.fit(&history(&[5.0; 10]), &FitBudget::none());
        assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
    }

    #[test]
    fn expired_budget_is_a_fit_error() {
        let model = SeasonalSmoothing::weekly();
        let budget = FitBudget::with_limit(std::time::Duration::from_secs(0));
        let result = model.fit(&history(&[10.0; 60]), &budget);
        assert!(matches!(result, Err(ForecastError::ModelFit(_))));
    }

    #[test]
    fn intervals_bracket_estimates() {
        let mut quantities = Vec::new();
        for week in 0..8 {
            for d in 0..7 {
                quantities.push(10.0 + (week * 7 + d) as f64 * 0.1 + if d >= 5 { 4.0 } else { 0.0 });
            }
        }
        let model = SeasonalSmoothing::weekly();
        let fitted = model.fit(&history(&quantities), &FitBudget::none()).unwrap();
        let forecast = fitted.forecast(14).unwrap();

        for (&v, &(lo, hi)) in forecast.values().iter().zip(forecast.intervals()) {
            assert!(lo <= v && v <= hi);
        }
    }
}
