//! Signal aggregation: merging optional detector outputs per product
//!
//! Detectors for competitive price sensitivity, seasonality breaks, and
//! cross-product synergy run independently and may not have run at all.
//! Aggregation is a pure merge over whatever subset arrived: no ordering
//! dependency between detectors, and a missing detector leaves its neutral
//! default in place.

use retail_data::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Neutral price elasticity: a 1% price increase costs 1% of demand
pub const NEUTRAL_ELASTICITY: f64 = -1.0;
/// Neutral seasonality correction: no deviation from the historical cycle
pub const NEUTRAL_SEASONALITY_FACTOR: f64 = 1.0;

/// One detector's output for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetectorOutput {
    /// Competitive pricing detector: demand elasticity versus own price
    PriceElasticity(f64),
    /// Seasonality-break detector: multiplicative correction to projected
    /// demand (1.0 = the historical pattern holds)
    SeasonalityBreak(f64),
    /// Synergy detector: demand lift on a partner product per unit of
    /// intervention on this one
    SynergyLift {
        /// The partner product receiving the lift
        partner: ProductId,
        /// Lift coefficient; 0.0 means no coupling
        lift: f64,
    },
}

/// Merged per-product signal coefficients used by the simulation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    /// Product these signals describe
    pub product_id: ProductId,
    /// Demand elasticity versus own price (negative in normal goods)
    pub price_elasticity: f64,
    /// Multiplicative near-term demand correction from seasonality breaks
    pub seasonality_break_factor: f64,
    /// Partner product -> lift coefficient
    pub synergy_partners: HashMap<ProductId, f64>,
}

impl SignalBundle {
    /// A bundle with every signal at its neutral default
    pub fn neutral(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            price_elasticity: NEUTRAL_ELASTICITY,
            seasonality_break_factor: NEUTRAL_SEASONALITY_FACTOR,
            synergy_partners: HashMap::new(),
        }
    }

    /// Merge the available detector outputs into a bundle. Idempotent and
    /// commutative over distinct detector kinds and distinct partners.
    pub fn aggregate(
        product_id: impl Into<ProductId>,
        outputs: impl IntoIterator<Item = DetectorOutput>,
    ) -> Self {
        let mut bundle = Self::neutral(product_id);

        for output in outputs {
            match output {
                DetectorOutput::PriceElasticity(elasticity) => {
                    bundle.price_elasticity = elasticity;
                }
                DetectorOutput::SeasonalityBreak(factor) => {
                    bundle.seasonality_break_factor = factor;
                }
                DetectorOutput::SynergyLift { partner, lift } => {
                    bundle.synergy_partners.insert(partner, lift);
                }
            }
        }

        bundle
    }

    /// Whether every signal is still at its neutral default
    pub fn is_neutral(&self) -> bool {
        self.price_elasticity == NEUTRAL_ELASTICITY
            && self.seasonality_break_factor == NEUTRAL_SEASONALITY_FACTOR
            && self.synergy_partners.values().all(|&lift| lift == 0.0)
    }
}
