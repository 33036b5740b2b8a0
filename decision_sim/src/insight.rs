//! Plain-English summaries of risk and simulation outputs
//!
//! Consumes engine output and renders short operator-facing sentences;
//! nothing here feeds back into any computation. Deterministic: the same
//! numbers always produce the same words.

use crate::risk::{RiskAssessment, RiskTier};
use crate::simulate::SimulationResult;
use retail_data::Product;
use serde::{Deserialize, Serialize};

/// Operator guidance distilled from a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// The intervention improves the projection; worth applying
    Apply,
    /// The projection is roughly unchanged; no action needed
    Hold,
    /// The intervention hurts the projection; avoid it
    Avoid,
}

/// Stockout-probability increase above which a profitable intervention is
/// still flagged rather than recommended
const STOCKOUT_SHIFT_TOLERANCE: f64 = 0.10;

/// One-line summary of a product's risk position
pub fn risk_summary(product: &Product, assessment: &RiskAssessment) -> String {
    match assessment.tier {
        RiskTier::StockoutRisk => format!(
            "{}: stockout risk. Projected demand over the next {} days exceeds \
             the {} units on hand by {:.0}%; reorder now ({:.0}% chance of running out).",
            product.name,
            product.reorder_lead_days,
            product.stock_level,
            assessment.severity * 100.0,
            assessment.stockout_probability * 100.0
        ),
        RiskTier::OverstockRisk => format!(
            "{}: overstock. Stock on hand is {:.0}% above projected demand; \
             consider a discount or a smaller next order.",
            product.name,
            assessment.severity * 100.0
        ),
        RiskTier::Healthy => format!(
            "{}: healthy. Supply and projected demand are in balance; maintain \
             current levels.",
            product.name
        ),
    }
}

/// Recommendation derived from the simulated deltas
pub fn recommend(result: &SimulationResult) -> Recommendation {
    if result.profit_delta > 0.0 {
        if result.stockout_probability_delta > STOCKOUT_SHIFT_TOLERANCE {
            Recommendation::Hold
        } else {
            Recommendation::Apply
        }
    } else if result.profit_delta < 0.0 {
        Recommendation::Avoid
    } else {
        Recommendation::Hold
    }
}

/// One-line summary of a simulation outcome
pub fn simulation_summary(product: &Product, result: &SimulationResult) -> String {
    let direction = if result.profit_delta > 0.0 {
        "raises"
    } else if result.profit_delta < 0.0 {
        "lowers"
    } else {
        "leaves"
    };

    let stockout_clause = if result.stockout_probability_delta > 0.005 {
        format!(
            " and raises stockout probability by {:.0} points",
            result.stockout_probability_delta * 100.0
        )
    } else if result.stockout_probability_delta < -0.005 {
        format!(
            " and lowers stockout probability by {:.0} points",
            -result.stockout_probability_delta * 100.0
        )
    } else {
        String::new()
    };

    let confidence_clause = if result.low_confidence {
        " (low-confidence forecast)"
    } else {
        ""
    };

    let verdict = match recommend(result) {
        Recommendation::Apply => "APPLY",
        Recommendation::Hold => "HOLD",
        Recommendation::Avoid => "AVOID",
    };

    format!(
        "{}: the intervention {} projected profit by {:.2}{}{}. Verdict: {}.",
        product.name,
        direction,
        result.profit_delta.abs(),
        stockout_clause,
        confidence_clause,
        verdict
    )
}
