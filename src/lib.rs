//! # StockCast
//!
//! Facade over the retail decision-support workspace. `DecisionSupport`
//! holds an in-memory catalog (products, their sales histories, and any
//! detector signals) and exposes the three operations the request layer
//! calls: `forecast`, `risk`, and `simulate`. Nothing is persisted; the
//! catalog lives for the life of the process.
//!
//! ## Example
//!
//! ```no_run
//! use decision_sim::Intervention;
//! use demand_forecast::SalesHistory;
//! use retail_data::Product;
//! use stockcast::DecisionSupport;
//!
//! # fn main() -> Result<(), stockcast::CatalogError> {
//! let mut desk = DecisionSupport::new();
//! let product = Product::new("sku-1", "Coffee", "beverages", 5.0, 9.0, 40, 3)?;
//! let history = SalesHistory::from_csv("sales.csv")?;
//! desk.register(product, history);
//!
//! let forecast = desk.forecast("sku-1", 14)?;
//! let risk = desk.risk("sku-1")?;
//! let outcome = desk.simulate("sku-1", Intervention::price_change(0.05), 14)?;
//! println!("{:?} / profit delta {:.2}", risk.tier, outcome.profit_delta);
//! # Ok(())
//! # }
//! ```

use decision_sim::simulate::{PartnerInput, SimulationInput};
use decision_sim::{
    classify, risk_summary, simulation_summary, Intervention, RiskAssessment, SignalBundle,
    SimError, SimulationEngine, SimulationResult,
};
use demand_forecast::models::seasonal_smoothing::SeasonalSmoothing;
use demand_forecast::{Forecast, ForecastError, ForecastProvider, SalesHistory};
use retail_data::{DataError, Product, ProductId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by the facade
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested product is not in the catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Invalid reference data
    #[error(transparent)]
    Data(#[from] DataError),

    /// Forecasting failed in a non-recoverable way
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// Simulation rejected or failed the request
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// The default engine configuration: weekly seasonal smoothing
pub type DefaultEngine = SimulationEngine<SeasonalSmoothing>;

/// In-memory decision-support desk over a product catalog
pub struct DecisionSupport {
    engine: DefaultEngine,
    products: HashMap<ProductId, Product>,
    histories: HashMap<ProductId, SalesHistory>,
    signals: HashMap<ProductId, SignalBundle>,
}

impl DecisionSupport {
    /// Create a desk with the default weekly-seasonal engine
    pub fn new() -> Self {
        Self::with_engine(SimulationEngine::new(ForecastProvider::new(
            SeasonalSmoothing::weekly(),
        )))
    }

    /// Create a desk around a custom-configured engine
    pub fn with_engine(engine: DefaultEngine) -> Self {
        Self {
            engine,
            products: HashMap::new(),
            histories: HashMap::new(),
            signals: HashMap::new(),
        }
    }

    /// Add or replace a product and its sales history
    pub fn register(&mut self, product: Product, history: SalesHistory) {
        self.histories.insert(product.id.clone(), history);
        self.products.insert(product.id.clone(), product);
    }

    /// Attach detector signals for a product
    pub fn set_signals(&mut self, bundle: SignalBundle) {
        self.signals.insert(bundle.product_id.clone(), bundle);
    }

    /// Product ids currently in the catalog
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.products.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Demand forecast for the next `horizon` days
    pub fn forecast(&self, product_id: &str, horizon: usize) -> Result<Forecast> {
        let (_, history) = self.lookup(product_id)?;
        Ok(self
            .engine
            .provider()
            .forecast(product_id, history, horizon)?)
    }

    /// Current stock-risk assessment, derived from a fresh forecast
    pub fn risk(&self, product_id: &str) -> Result<RiskAssessment> {
        let (product, history) = self.lookup(product_id)?;

        let risk_config = self.engine.risk_config();
        let horizon = risk_config
            .overstock_window_days
            .max(product.reorder_lead_days as usize);
        let forecast = self
            .engine
            .provider()
            .forecast(product_id, history, horizon)?;

        Ok(classify(
            &forecast,
            product.stock_level,
            product.reorder_lead_days,
            risk_config,
        ))
    }

    /// Headline forecast statistics: trailing average, projected average,
    /// growth, and peak day
    pub fn forecast_summary(
        &self,
        product_id: &str,
        horizon: usize,
    ) -> Result<demand_forecast::ForecastSummary> {
        let (_, history) = self.lookup(product_id)?;
        let forecast = self.forecast(product_id, horizon)?;
        let recent = history.trailing_mean(30)?;
        Ok(forecast.summary(recent))
    }

    /// One-line risk summary for the operator
    pub fn risk_report(&self, product_id: &str) -> Result<String> {
        let (product, _) = self.lookup(product_id)?;
        let assessment = self.risk(product_id)?;
        Ok(risk_summary(product, &assessment))
    }

    /// Project the outcome of an intervention against the no-change
    /// baseline. Synergy partners named by the product's signal bundle are
    /// resolved from the catalog automatically.
    pub fn simulate(
        &self,
        product_id: &str,
        intervention: Intervention,
        horizon: usize,
    ) -> Result<SimulationResult> {
        let (product, history) = self.lookup(product_id)?;

        let bundle = self
            .signals
            .get(product_id)
            .cloned()
            .unwrap_or_else(|| SignalBundle::neutral(product_id));

        let mut partners = Vec::new();
        for partner_id in bundle.synergy_partners.keys() {
            if let (Some(partner), Some(partner_history)) = (
                self.products.get(partner_id),
                self.histories.get(partner_id),
            ) {
                partners.push(PartnerInput {
                    product: partner,
                    history: partner_history,
                });
            }
        }

        let input = SimulationInput {
            product,
            history,
            bundle: &bundle,
            partners: &partners,
        };

        Ok(self.engine.simulate(input, intervention, horizon)?)
    }

    /// One-line simulation summary for the operator
    pub fn simulation_report(
        &self,
        product_id: &str,
        intervention: Intervention,
        horizon: usize,
    ) -> Result<String> {
        let (product, _) = self.lookup(product_id)?;
        let result = self.simulate(product_id, intervention, horizon)?;
        Ok(simulation_summary(product, &result))
    }

    fn lookup(&self, product_id: &str) -> Result<(&Product, &SalesHistory)> {
        let product = self
            .products
            .get(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;
        let history = self
            .histories
            .get(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;
        Ok((product, history))
    }
}

impl Default for DecisionSupport {
    fn default() -> Self {
        Self::new()
    }
}
