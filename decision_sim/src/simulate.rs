//! What-if simulation: baseline versus counterfactual projection
//!
//! The engine never re-fits a model for the counterfactual case. It takes
//! the baseline forecast and layers deterministic adjustment factors on
//! top, in a fixed order: price elasticity, promotion lift, stock ceiling,
//! synergy. Every simulated effect stays visible and auditable instead of
//! hiding inside model weights. Baseline and counterfactual are built by
//! the same pipeline with different factors, which makes the neutral
//! intervention reproduce the baseline exactly.

use crate::error::{Result, SimError};
use crate::risk::{classify, RiskAssessment, RiskConfig};
use crate::signals::{SignalBundle, NEUTRAL_ELASTICITY};
use demand_forecast::{DemandModel, Forecast, ForecastPoint, ForecastProvider, SalesHistory};
use log::debug;
use retail_data::{Product, ProductId};
use serde::{Deserialize, Serialize};

/// A proposed change to one product over one horizon. Never mutates the
/// product; it exists only for the duration of one simulation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Relative price change, e.g. 0.10 for +10%
    pub price_delta_pct: f64,
    /// Units added to (or removed from) the stock on hand
    pub stock_delta_units: i64,
    /// Whether a promotion runs over the horizon
    pub promotion: bool,
}

impl Intervention {
    /// The do-nothing intervention
    pub fn none() -> Self {
        Self {
            price_delta_pct: 0.0,
            stock_delta_units: 0,
            promotion: false,
        }
    }

    /// A pure price change
    pub fn price_change(price_delta_pct: f64) -> Self {
        Self {
            price_delta_pct,
            ..Self::none()
        }
    }

    /// A pure restock (or destock, when negative)
    pub fn restock(stock_delta_units: i64) -> Self {
        Self {
            stock_delta_units,
            ..Self::none()
        }
    }

    /// A pure promotion
    pub fn promotion() -> Self {
        Self {
            promotion: true,
            ..Self::none()
        }
    }

    /// Whether this intervention changes nothing
    pub fn is_neutral(&self) -> bool {
        self.price_delta_pct == 0.0 && self.stock_delta_units == 0 && !self.promotion
    }
}

/// Tunable simulation constants
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Demand multiplier while a promotion runs
    pub promotion_lift: f64,
    /// Lowest accepted relative price change
    pub min_price_delta_pct: f64,
    /// Highest accepted relative price change
    pub max_price_delta_pct: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            promotion_lift: 1.15,
            min_price_delta_pct: -0.90,
            max_price_delta_pct: 5.00,
        }
    }
}

/// Demand impact on a synergy partner, projected with the same adjustment
/// pipeline scaled by the lift coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyImpact {
    /// The partner product
    pub product_id: ProductId,
    /// Partner profit under no intervention
    pub baseline_profit: f64,
    /// Partner profit under the propagated intervention
    pub counterfactual_profit: f64,
    /// Change in partner units demanded over the horizon
    pub demand_delta_units: f64,
}

impl SynergyImpact {
    /// Partner profit change attributable to the propagated intervention
    pub fn profit_delta(&self) -> f64 {
        self.counterfactual_profit - self.baseline_profit
    }
}

/// Outcome of one simulation call. Ephemeral: returned to the caller and
/// discarded, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Projection with no intervention applied
    pub baseline: Forecast,
    /// Projection under the intervention
    pub counterfactual: Forecast,
    /// Projected profit with no intervention
    pub baseline_profit: f64,
    /// Projected profit under the intervention
    pub counterfactual_profit: f64,
    /// Counterfactual minus baseline profit
    pub profit_delta: f64,
    /// Risk position with no intervention
    pub baseline_risk: RiskAssessment,
    /// Risk position under the intervention
    pub counterfactual_risk: RiskAssessment,
    /// Change in stockout probability caused by the intervention
    pub stockout_probability_delta: f64,
    /// The intervention that produced this result
    pub intervention: Intervention,
    /// Set when the baseline forecast came from the naive fallback
    pub low_confidence: bool,
    /// Impact propagated to synergy partners (depth 1, never further)
    pub synergy_effects: Vec<SynergyImpact>,
}

/// Catalog data for a synergy partner, supplied by the caller
#[derive(Debug, Clone, Copy)]
pub struct PartnerInput<'a> {
    /// The partner's reference data
    pub product: &'a Product,
    /// The partner's sales history
    pub history: &'a SalesHistory,
}

/// Everything one simulation call reads; all borrowed, nothing mutated
#[derive(Debug, Clone, Copy)]
pub struct SimulationInput<'a> {
    /// Product under intervention
    pub product: &'a Product,
    /// Its sales history
    pub history: &'a SalesHistory,
    /// Merged detector signals for the product
    pub bundle: &'a SignalBundle,
    /// Catalog data for potential synergy partners
    pub partners: &'a [PartnerInput<'a>],
}

// Multiplicative/additive factors for one pipeline run. Computed once per
// case so baseline and counterfactual flow through identical code.
#[derive(Debug, Clone, Copy)]
struct AdjustmentFactors {
    demand_multiplier: f64,
    stock_ceiling: f64,
    unit_price: f64,
}

/// The what-if simulation engine
#[derive(Debug)]
pub struct SimulationEngine<M: DemandModel> {
    provider: ForecastProvider<M>,
    risk_config: RiskConfig,
    config: SimulationConfig,
}

impl<M: DemandModel> SimulationEngine<M> {
    /// Create an engine with default risk and simulation constants
    pub fn new(provider: ForecastProvider<M>) -> Self {
        Self {
            provider,
            risk_config: RiskConfig::default(),
            config: SimulationConfig::default(),
        }
    }

    /// Create an engine with explicit configuration
    pub fn with_config(
        provider: ForecastProvider<M>,
        risk_config: RiskConfig,
        config: SimulationConfig,
    ) -> Self {
        Self {
            provider,
            risk_config,
            config,
        }
    }

    /// The underlying forecast provider
    pub fn provider(&self) -> &ForecastProvider<M> {
        &self.provider
    }

    /// The active risk thresholds
    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk_config
    }

    /// Project the outcome of `intervention` over `horizon` days and
    /// contrast it with the no-intervention baseline.
    pub fn simulate(
        &self,
        input: SimulationInput<'_>,
        intervention: Intervention,
        horizon: usize,
    ) -> Result<SimulationResult> {
        self.validate(input.product, &intervention)?;

        let product = input.product;
        let base = self
            .provider
            .forecast(&product.id, input.history, horizon)?;

        // The seasonality-break correction is a demand signal, not an
        // intervention effect: it scales both cases identically so the
        // neutral intervention still reproduces the baseline.
        let seasonality = input.bundle.seasonality_break_factor;

        let baseline_factors = AdjustmentFactors {
            demand_multiplier: seasonality,
            stock_ceiling: product.stock_level as f64,
            unit_price: product.unit_price,
        };
        let counterfactual_factors = AdjustmentFactors {
            demand_multiplier: seasonality
                * price_effect(intervention.price_delta_pct, input.bundle.price_elasticity)
                * promotion_effect(intervention.promotion, self.config.promotion_lift),
            stock_ceiling: (product.stock_level as f64
                + intervention.stock_delta_units as f64)
                .max(0.0),
            unit_price: product.unit_price * (1.0 + intervention.price_delta_pct),
        };

        let baseline = adjust(&base, baseline_factors)?;
        let counterfactual = adjust(&base, counterfactual_factors)?;

        let baseline_profit = projected_profit(&baseline, baseline_factors.unit_price, product.unit_cost);
        let counterfactual_profit =
            projected_profit(&counterfactual, counterfactual_factors.unit_price, product.unit_cost);

        let post_stock = (product.stock_level as i64 + intervention.stock_delta_units) as u32;
        let baseline_risk = classify(
            &baseline,
            product.stock_level,
            product.reorder_lead_days,
            &self.risk_config,
        );
        let counterfactual_risk = classify(
            &counterfactual,
            post_stock,
            product.reorder_lead_days,
            &self.risk_config,
        );

        let synergy_effects =
            self.propagate_synergy(&input, &intervention, horizon)?;

        debug!(
            "simulated {} over {} days: profit delta {:.2}",
            product.id,
            horizon,
            counterfactual_profit - baseline_profit
        );

        Ok(SimulationResult {
            low_confidence: base.low_confidence,
            baseline,
            counterfactual,
            baseline_profit,
            counterfactual_profit,
            profit_delta: counterfactual_profit - baseline_profit,
            stockout_probability_delta: counterfactual_risk.stockout_probability
                - baseline_risk.stockout_probability,
            baseline_risk,
            counterfactual_risk,
            intervention,
            synergy_effects,
        })
    }

    fn validate(&self, product: &Product, intervention: &Intervention) -> Result<()> {
        if intervention.price_delta_pct < self.config.min_price_delta_pct
            || intervention.price_delta_pct > self.config.max_price_delta_pct
        {
            return Err(SimError::Validation(format!(
                "Price delta {:.0}% is outside the accepted range [{:.0}%, {:.0}%]",
                intervention.price_delta_pct * 100.0,
                self.config.min_price_delta_pct * 100.0,
                self.config.max_price_delta_pct * 100.0
            )));
        }

        if product.stock_level as i64 + intervention.stock_delta_units < 0 {
            return Err(SimError::Validation(format!(
                "Stock delta {} would drive stock of {} below zero",
                intervention.stock_delta_units, product.stock_level
            )));
        }

        Ok(())
    }

    // Depth-1 ripple onto synergy partners: an explicit loop over a fixed
    // partner set, applying the scaled price and promotion effects through
    // the same pipeline. Partner runs never propagate further, so a
    // partner pointing back at the trigger product cannot cascade.
    fn propagate_synergy(
        &self,
        input: &SimulationInput<'_>,
        intervention: &Intervention,
        horizon: usize,
    ) -> Result<Vec<SynergyImpact>> {
        let mut effects = Vec::new();

        for (partner_id, &lift) in &input.bundle.synergy_partners {
            if lift == 0.0 {
                continue;
            }

            let Some(partner) = input
                .partners
                .iter()
                .find(|p| &p.product.id == partner_id)
            else {
                debug!("no catalog data for synergy partner {}, skipping", partner_id);
                continue;
            };

            let base = self
                .provider
                .forecast(&partner.product.id, partner.history, horizon)?;

            // Partner keeps its own price; only the demand effects travel,
            // scaled by the lift coefficient. Elasticity of the partner is
            // unknown here, so the neutral default applies.
            let scaled_price_effect =
                price_effect(intervention.price_delta_pct * lift, NEUTRAL_ELASTICITY);
            let scaled_promotion_effect = 1.0
                + (promotion_effect(intervention.promotion, self.config.promotion_lift) - 1.0)
                    * lift;

            let baseline_factors = AdjustmentFactors {
                demand_multiplier: 1.0,
                stock_ceiling: partner.product.stock_level as f64,
                unit_price: partner.product.unit_price,
            };
            let counterfactual_factors = AdjustmentFactors {
                demand_multiplier: scaled_price_effect * scaled_promotion_effect,
                ..baseline_factors
            };

            let baseline = adjust(&base, baseline_factors)?;
            let counterfactual = adjust(&base, counterfactual_factors)?;

            let baseline_profit = projected_profit(
                &baseline,
                partner.product.unit_price,
                partner.product.unit_cost,
            );
            let counterfactual_profit = projected_profit(
                &counterfactual,
                partner.product.unit_price,
                partner.product.unit_cost,
            );

            effects.push(SynergyImpact {
                product_id: partner.product.id.clone(),
                baseline_profit,
                counterfactual_profit,
                demand_delta_units: counterfactual.cumulative_estimate(horizon)
                    - baseline.cumulative_estimate(horizon),
            });
        }

        effects.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Ok(effects)
    }
}

/// Demand multiplier of a price change under the given elasticity
fn price_effect(price_delta_pct: f64, elasticity: f64) -> f64 {
    (1.0 + price_delta_pct * elasticity).max(0.0)
}

/// Demand multiplier of a promotion
fn promotion_effect(promotion: bool, lift: f64) -> f64 {
    if promotion {
        lift
    } else {
        1.0
    }
}

// The shared projection pipeline: scale every point, then cap each day at
// the stock ceiling (units that are not on the shelf cannot sell).
fn adjust(base: &Forecast, factors: AdjustmentFactors) -> Result<Forecast> {
    let points = base
        .points
        .iter()
        .map(|p| {
            let estimate = (p.estimate * factors.demand_multiplier).min(factors.stock_ceiling);
            ForecastPoint {
                date: p.date,
                estimate,
                lower: (p.lower * factors.demand_multiplier).min(estimate),
                upper: (p.upper * factors.demand_multiplier).min(factors.stock_ceiling),
            }
        })
        .collect();

    Ok(Forecast::new(
        base.product_id.clone(),
        points,
        base.low_confidence,
        base.model.clone(),
    )?)
}

/// Projected profit of a demand projection at the given unit economics
fn projected_profit(projection: &Forecast, unit_price: f64, unit_cost: f64) -> f64 {
    let margin = unit_price - unit_cost;
    projection.cumulative_estimate(projection.horizon) * margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_intervention_is_detected() {
        assert!(Intervention::none().is_neutral());
        assert!(!Intervention::price_change(0.1).is_neutral());
        assert!(!Intervention::restock(5).is_neutral());
        assert!(!Intervention::promotion().is_neutral());
    }

    #[test]
    fn price_effect_shrinks_demand_when_elastic() {
        // +10% price at elasticity -1.2 removes 12% of demand
        assert!((price_effect(0.10, -1.2) - 0.88).abs() < 1e-12);
    }

    #[test]
    fn price_effect_never_goes_negative() {
        assert_eq!(price_effect(3.0, -1.0), 0.0);
    }

    #[test]
    fn promotion_effect_is_inert_when_off() {
        assert_eq!(promotion_effect(false, 1.15), 1.0);
        assert_eq!(promotion_effect(true, 1.15), 1.15);
    }
}
