//! # Retail Data
//!
//! Reference data types for the retail decision-support workspace: the
//! product catalog entry, the per-day sales observation, and a synthetic
//! demand generator used by tests and demos.
//!
//! Products and their sales history are owned by the surrounding data
//! layer; the analytical crates borrow them read-only for the duration of a
//! computation and never mutate them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod synthetic;

/// Identifier for a product in the catalog
pub type ProductId = String;

/// Errors raised while constructing reference data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// Result type for reference-data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// A catalog product. Immutable for the duration of any analytical run;
/// price or stock updates happen between runs, never during one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Merchandising category
    pub category: String,
    /// Cost per unit paid to the supplier
    pub unit_cost: f64,
    /// Shelf price per unit
    pub unit_price: f64,
    /// Units currently on hand
    pub stock_level: u32,
    /// Days between placing and receiving a restock order
    pub reorder_lead_days: u32,
}

impl Product {
    /// Create a product, validating the economics
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        unit_cost: f64,
        unit_price: f64,
        stock_level: u32,
        reorder_lead_days: u32,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DataError::InvalidProduct(
                "Product id must not be empty".to_string(),
            ));
        }
        if unit_cost < 0.0 || !unit_cost.is_finite() {
            return Err(DataError::InvalidProduct(format!(
                "Unit cost must be a non-negative number, got {}",
                unit_cost
            )));
        }
        if unit_price <= 0.0 || !unit_price.is_finite() {
            return Err(DataError::InvalidProduct(format!(
                "Unit price must be a positive number, got {}",
                unit_price
            )));
        }
        if reorder_lead_days == 0 {
            return Err(DataError::InvalidProduct(
                "Reorder lead time must be at least one day".to_string(),
            ));
        }

        Ok(Self {
            id,
            name: name.into(),
            category: category.into(),
            unit_cost,
            unit_price,
            stock_level,
            reorder_lead_days,
        })
    }

    /// Per-unit margin at the current shelf price
    pub fn unit_margin(&self) -> f64 {
        self.unit_price - self.unit_cost
    }
}

/// One day of sales for one product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Units sold that day
    pub quantity: f64,
}

impl DailySales {
    /// Create a sales observation; quantities must be finite and non-negative
    pub fn new(date: NaiveDate, quantity: f64) -> Result<Self> {
        if quantity < 0.0 || !quantity.is_finite() {
            return Err(DataError::InvalidSeries(format!(
                "Quantity on {} must be a non-negative number, got {}",
                date, quantity
            )));
        }
        Ok(Self { date, quantity })
    }
}
