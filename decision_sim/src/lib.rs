//! # Decision Sim
//!
//! The decision layer of the retail decision-support workspace: classify
//! each product's stock risk from its demand forecast, merge optional
//! detector signals, and simulate hypothetical interventions (price
//! changes, restocks, promotions) before the operator commits to them.
//!
//! ## Design
//!
//! A simulation never re-fits a statistical model. The engine computes one
//! baseline forecast through `demand_forecast`, then derives the
//! counterfactual by applying deterministic adjustment factors in a fixed
//! order: price elasticity, promotion lift, stock ceiling, depth-limited
//! synergy ripple. Adjustments stay visible in the result, so an operator
//! can audit exactly why the projection moved.
//!
//! ## Quick Start
//!
//! ```no_run
//! use decision_sim::signals::SignalBundle;
//! use decision_sim::simulate::{Intervention, SimulationEngine, SimulationInput};
//! use demand_forecast::models::seasonal_smoothing::SeasonalSmoothing;
//! use demand_forecast::{ForecastProvider, SalesHistory};
//! use retail_data::Product;
//!
//! # fn main() -> decision_sim::Result<()> {
//! # let product = Product::new("sku-1", "Coffee", "beverages", 5.0, 9.0, 40, 3).unwrap();
//! # let history = SalesHistory::from_csv("sales.csv")?;
//! let engine = SimulationEngine::new(ForecastProvider::new(SeasonalSmoothing::weekly()));
//! let bundle = SignalBundle::neutral(&product.id);
//!
//! let input = SimulationInput {
//!     product: &product,
//!     history: &history,
//!     bundle: &bundle,
//!     partners: &[],
//! };
//! let result = engine.simulate(input, Intervention::price_change(0.05), 14)?;
//! println!("profit delta: {:.2}", result.profit_delta);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod insight;
pub mod risk;
pub mod signals;
pub mod simulate;

// Re-export commonly used types
pub use crate::error::{Result, SimError};
pub use crate::insight::{recommend, risk_summary, simulation_summary, Recommendation};
pub use crate::risk::{classify, RiskAssessment, RiskConfig, RiskTier};
pub use crate::signals::{DetectorOutput, SignalBundle};
pub use crate::simulate::{
    Intervention, PartnerInput, SimulationConfig, SimulationEngine, SimulationInput,
    SimulationResult, SynergyImpact,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
