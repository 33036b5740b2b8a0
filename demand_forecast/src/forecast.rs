//! The forecast value type returned to callers

use crate::error::{ForecastError, Result};
use crate::models::INTERVAL_Z;
use chrono::NaiveDate;
use retail_data::ProductId;
use serde::{Deserialize, Serialize};

/// One projected day of demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Calendar day of the projection
    pub date: NaiveDate,
    /// Expected units sold
    pub estimate: f64,
    /// Lower prediction bound
    pub lower: f64,
    /// Upper prediction bound
    pub upper: f64,
}

impl ForecastPoint {
    /// Implied per-day standard deviation, recovered from the interval width
    pub fn implied_sigma(&self) -> f64 {
        ((self.upper - self.lower) / (2.0 * INTERVAL_Z)).max(0.0)
    }
}

/// Demand forecast for one product over a horizon of consecutive days.
///
/// Invariants enforced at construction: `estimate >= 0` and
/// `lower <= estimate <= upper` on every point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Product the forecast belongs to
    pub product_id: ProductId,
    /// Number of projected days
    pub horizon: usize,
    /// Projected days, oldest first
    pub points: Vec<ForecastPoint>,
    /// Set when the forecast came from the naive fallback or an otherwise
    /// degraded fit; the presentation layer warns the operator
    pub low_confidence: bool,
    /// Name of the model that produced the projection
    pub model: String,
}

impl Forecast {
    /// Assemble a forecast, normalising each point to the invariants
    pub fn new(
        product_id: impl Into<ProductId>,
        points: Vec<ForecastPoint>,
        low_confidence: bool,
        model: impl Into<String>,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::Validation(
                "A forecast must cover at least one day".to_string(),
            ));
        }

        let points: Vec<ForecastPoint> = points
            .into_iter()
            .map(|p| {
                let estimate = p.estimate.max(0.0);
                ForecastPoint {
                    date: p.date,
                    estimate,
                    lower: p.lower.max(0.0).min(estimate),
                    upper: p.upper.max(estimate),
                }
            })
            .collect();

        Ok(Self {
            product_id: product_id.into(),
            horizon: points.len(),
            points,
            low_confidence,
            model: model.into(),
        })
    }

    /// Total expected demand over the first `days` of the horizon (the
    /// whole horizon when shorter)
    pub fn cumulative_estimate(&self, days: usize) -> f64 {
        self.points
            .iter()
            .take(days)
            .map(|p| p.estimate)
            .sum()
    }

    /// Standard deviation of cumulative demand over the first `days`,
    /// treating per-day errors as independent
    pub fn cumulative_sigma(&self, days: usize) -> f64 {
        self.points
            .iter()
            .take(days)
            .map(|p| {
                let s = p.implied_sigma();
                s * s
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Headline statistics for the presentation layer
    pub fn summary(&self, recent_daily_avg: f64) -> ForecastSummary {
        let forecast_daily_avg = self.cumulative_estimate(self.horizon) / self.horizon as f64;
        let growth_pct = if recent_daily_avg > 0.0 {
            (forecast_daily_avg - recent_daily_avg) / recent_daily_avg * 100.0
        } else {
            0.0
        };

        let peak_day = self
            .points
            .iter()
            .max_by(|a, b| a.estimate.total_cmp(&b.estimate))
            .map(|p| p.date)
            .unwrap_or_default();

        ForecastSummary {
            recent_daily_avg,
            forecast_daily_avg,
            growth_pct,
            peak_day,
        }
    }
}

/// Headline forecast statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Trailing average of observed daily demand
    pub recent_daily_avg: f64,
    /// Average projected daily demand over the horizon
    pub forecast_daily_avg: f64,
    /// Projected growth versus the trailing average, in percent
    pub growth_pct: f64,
    /// Horizon day with the highest projected demand
    pub peak_day: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn point(d: u32, estimate: f64, lower: f64, upper: f64) -> ForecastPoint {
        ForecastPoint {
            date: date(d),
            estimate,
            lower,
            upper,
        }
    }

    #[test]
    fn construction_normalises_invariants() {
        let forecast = Forecast::new(
            "sku-1",
            vec![point(1, -2.0, -5.0, -1.0), point(2, 10.0, 12.0, 8.0)],
            false,
            "test",
        )
        .unwrap();

        let first = forecast.points[0];
        assert_eq!(first.estimate, 0.0);
        assert!(first.lower <= first.estimate && first.estimate <= first.upper);

        let second = forecast.points[1];
        assert!(second.lower <= second.estimate && second.estimate <= second.upper);
    }

    #[test]
    fn cumulative_estimate_respects_window() {
        let forecast = Forecast::new(
            "sku-1",
            vec![point(1, 5.0, 4.0, 6.0), point(2, 7.0, 6.0, 8.0)],
            false,
            "test",
        )
        .unwrap();

        assert_eq!(forecast.cumulative_estimate(1), 5.0);
        assert_eq!(forecast.cumulative_estimate(10), 12.0);
    }

    #[test]
    fn serializes_with_iso_dates() {
        let forecast = Forecast::new(
            "sku-1",
            vec![point(1, 5.0, 4.0, 6.0)],
            true,
            "test",
        )
        .unwrap();

        let json = serde_json::to_string(&forecast).unwrap();
        assert!(json.contains("\"2024-06-01\""));
        assert!(json.contains("\"low_confidence\":true"));

        let back: Forecast = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points, forecast.points);
    }

    #[test]
    fn summary_reports_growth_and_peak() {
        let forecast = Forecast::new(
            "sku-1",
            vec![point(1, 10.0, 9.0, 11.0), point(2, 14.0, 13.0, 15.0)],
            false,
            "test",
        )
        .unwrap();

        let summary = forecast.summary(10.0);
        assert!((summary.forecast_daily_avg - 12.0).abs() < 1e-9);
        assert!((summary.growth_pct - 20.0).abs() < 1e-9);
        assert_eq!(summary.peak_day, date(2));
    }
}
