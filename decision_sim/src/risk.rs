//! Stock-risk classification from a demand forecast
//!
//! Pure and deterministic: the same forecast, stock level, and lead time
//! always produce the same assessment. Recomputed whenever a new forecast
//! lands; never stored.

use demand_forecast::Forecast;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Discrete stock-risk tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Projected demand over the reorder window outruns the stock on hand
    StockoutRisk,
    /// Stock on hand far exceeds projected demand over the overstock window
    OverstockRisk,
    /// Supply and projected demand are in balance
    Healthy,
}

/// Tunable classification thresholds
#[derive(Debug, Clone)]
pub struct RiskConfig {
    /// Demand may exceed stock by this fraction before a stockout call
    pub safety_margin: f64,
    /// Stock may exceed demand by this fraction before an overstock call
    pub surplus_margin: f64,
    /// Days of projected demand considered for the overstock check
    pub overstock_window_days: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            safety_margin: 0.10,
            surplus_margin: 0.50,
            overstock_window_days: 30,
        }
    }
}

/// Result of classifying one product's stock position
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The assigned tier
    pub tier: RiskTier,
    /// Normalised magnitude: deficit over stock for stockouts, surplus over
    /// projected demand for overstocks, 0 for healthy
    pub severity: f64,
    /// Probability that demand over the reorder window exceeds the stock on
    /// hand, from the forecast's uncertainty
    pub stockout_probability: f64,
}

/// Classify a product's stock position against its demand forecast.
///
/// Both windows are evaluated; when a volatile forecast trips both, the
/// stockout call wins as the operationally urgent one.
pub fn classify(
    forecast: &Forecast,
    current_stock: u32,
    reorder_lead_days: u32,
    config: &RiskConfig,
) -> RiskAssessment {
    let stock = current_stock as f64;
    let lead_days = reorder_lead_days as usize;

    let lead_demand = forecast.cumulative_estimate(lead_days);
    let stockout_probability = stockout_probability(forecast, stock, lead_days);

    if lead_demand > stock * (1.0 + config.safety_margin) {
        let severity = (lead_demand - stock) / stock.max(1.0);
        return RiskAssessment {
            tier: RiskTier::StockoutRisk,
            severity,
            stockout_probability,
        };
    }

    let window_demand = forecast.cumulative_estimate(config.overstock_window_days);
    if stock > window_demand * (1.0 + config.surplus_margin) {
        let severity = (stock - window_demand) / window_demand.max(1.0);
        return RiskAssessment {
            tier: RiskTier::OverstockRisk,
            severity,
            stockout_probability,
        };
    }

    RiskAssessment {
        tier: RiskTier::Healthy,
        severity: 0.0,
        stockout_probability,
    }
}

/// P(demand over the lead window > stock), treating cumulative demand as
/// Normal with the mean and variance implied by the forecast intervals.
fn stockout_probability(forecast: &Forecast, stock: f64, lead_days: usize) -> f64 {
    let mean = forecast.cumulative_estimate(lead_days);
    let sigma = forecast.cumulative_sigma(lead_days);

    if sigma < 1e-9 {
        // Degenerate forecast: demand is treated as certain
        return if mean > stock { 1.0 } else { 0.0 };
    }

    match Normal::new(0.0, 1.0) {
        Ok(standard) => {
            let z = (stock - mean) / sigma;
            1.0 - standard.cdf(z)
        }
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demand_forecast::ForecastPoint;

    fn forecast_with(daily: &[(f64, f64, f64)]) -> Forecast {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let points = daily
            .iter()
            .enumerate()
            .map(|(i, &(estimate, lower, upper))| ForecastPoint {
                date: start + chrono::Duration::days(i as i64),
                estimate,
                lower,
                upper,
            })
            .collect();
        Forecast::new("sku-1", points, false, "test").unwrap()
    }

    fn flat_forecast(daily: f64, days: usize) -> Forecast {
        forecast_with(&vec![(daily, daily, daily); days])
    }

    #[test]
    fn heavy_demand_is_a_stockout_call() {
        // 7-day demand of 80 against 50 on hand: severity (80-50)/50 = 0.6
        let forecast = flat_forecast(80.0 / 7.0, 7);
        let assessment = classify(&forecast, 50, 7, &RiskConfig::default());

        assert_eq!(assessment.tier, RiskTier::StockoutRisk);
        assert!((assessment.severity - 0.6).abs() < 1e-9);
        assert_eq!(assessment.stockout_probability, 1.0);
    }

    #[test]
    fn deep_stock_is_an_overstock_call() {
        // 30-day demand of 60 against 200 on hand
        let forecast = flat_forecast(2.0, 30);
        let assessment = classify(&forecast, 200, 7, &RiskConfig::default());

        assert_eq!(assessment.tier, RiskTier::OverstockRisk);
        assert!((assessment.severity - (200.0 - 60.0) / 60.0).abs() < 1e-9);
    }

    #[test]
    fn balanced_position_is_healthy() {
        let forecast = flat_forecast(10.0, 30);
        let assessment = classify(&forecast, 320, 7, &RiskConfig::default());

        assert_eq!(assessment.tier, RiskTier::Healthy);
        assert_eq!(assessment.severity, 0.0);
    }

    #[test]
    fn stockout_takes_precedence_over_overstock() {
        // A demand spike inside the lead window with a dead tail. The
        // stockout check runs first, so the urgent call wins regardless of
        // what the longer window would say.
        let mut daily = vec![(40.0, 40.0, 40.0); 3];
        daily.extend(vec![(0.0, 0.0, 0.0); 27]);
        let forecast = forecast_with(&daily);

        let assessment = classify(&forecast, 100, 3, &RiskConfig::default());
        assert_eq!(assessment.tier, RiskTier::StockoutRisk);
    }

    #[test]
    fn classification_is_idempotent() {
        let forecast = flat_forecast(9.0, 14);
        let config = RiskConfig::default();
        let a = classify(&forecast, 70, 5, &config);
        let b = classify(&forecast, 70, 5, &config);

        assert_eq!(a.tier, b.tier);
        assert_eq!(a.severity, b.severity);
        assert_eq!(a.stockout_probability, b.stockout_probability);
    }

    #[test]
    fn uncertainty_raises_stockout_probability_near_the_edge() {
        // Mean lead demand just below stock: certain forecast says safe,
        // an uncertain one leaves real stockout mass
        let certain = flat_forecast(9.0, 7);
        let uncertain = forecast_with(&vec![(9.0, 4.0, 14.0); 7]);

        let a = classify(&certain, 65, 7, &RiskConfig::default());
        let b = classify(&uncertain, 65, 7, &RiskConfig::default());

        assert_eq!(a.stockout_probability, 0.0);
        assert!(b.stockout_probability > 0.1);
    }

    #[test]
    fn less_stock_means_more_stockout_probability() {
        let forecast = forecast_with(&vec![(10.0, 6.0, 14.0); 7]);
        let config = RiskConfig::default();

        let rich = classify(&forecast, 90, 7, &config);
        let poor = classify(&forecast, 60, 7, &config);

        assert!(poor.stockout_probability > rich.stockout_probability);
    }
}
