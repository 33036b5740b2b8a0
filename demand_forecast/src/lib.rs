//! # Demand Forecast
//!
//! Demand forecasting for retail decision support: per-product sales
//! history handling and pluggable forecast models with uncertainty bounds.
//!
//! ## Features
//!
//! - `SalesHistory`: validated daily series with CSV ingestion and
//!   zero-fill gap repair
//! - Models behind the `DemandModel`/`FittedDemandModel` trait pair
//!   (seasonal smoothing, exponential smoothing, trailing average)
//! - `ForecastProvider`: fitting policy, deadline-bounded fits, naive
//!   fallback, and a single-flight fitted-model cache
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::models::seasonal_smoothing::SeasonalSmoothing;
//! use demand_forecast::{ForecastProvider, SalesHistory};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let history = SalesHistory::from_csv("sales.csv")?;
//! let provider = ForecastProvider::new(SeasonalSmoothing::weekly());
//!
//! let forecast = provider.forecast("sku-42", &history, 14)?;
//! for point in &forecast.points {
//!     println!("{}: {:.1} [{:.1}, {:.1}]", point.date, point.estimate, point.lower, point.upper);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod forecast;
pub mod models;
pub mod provider;
pub mod series;

// Re-export commonly used types
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{Forecast, ForecastPoint, ForecastSummary};
pub use crate::models::{DemandModel, FitBudget, FittedDemandModel, ModelForecast};
pub use crate::provider::{ForecastPolicy, ForecastProvider};
pub use crate::series::SalesHistory;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
