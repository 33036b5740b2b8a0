//! Sales history handling for demand forecasting
//!
//! A `SalesHistory` is the canonical per-product daily series: strictly
//! chronological, duplicate-free, with a known date column and quantity
//! column. Construction validates; `gap_filled` repairs missing days with
//! explicit zero-sales entries so models see a dense daily grid.

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use retail_data::DailySales;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::path::Path;

const DATE_COLUMN: &str = "date";
const QUANTITY_COLUMN: &str = "quantity";
const MS_PER_DAY: i64 = 86_400_000;

/// Daily sales series for one product, backed by a polars DataFrame
#[derive(Debug, Clone)]
pub struct SalesHistory {
    df: DataFrame,
}

impl SalesHistory {
    /// Build a history from raw observations.
    ///
    /// Observations are sorted chronologically; duplicate dates and
    /// negative or non-finite quantities are rejected.
    pub fn from_observations(mut observations: Vec<DailySales>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::Data(
                "Sales history must contain at least one observation".to_string(),
            ));
        }

        observations.sort_by_key(|obs| obs.date);

        for pair in observations.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(ForecastError::Data(format!(
                    "Duplicate date in sales history: {}",
                    pair[0].date
                )));
            }
        }
        for obs in &observations {
            if obs.quantity < 0.0 || !obs.quantity.is_finite() {
                return Err(ForecastError::Data(format!(
                    "Quantity on {} must be a non-negative number, got {}",
                    obs.date, obs.quantity
                )));
            }
        }

        Self::from_canonical(&observations)
    }

    /// Load a history from a CSV file with a date column and a quantity
    /// column. Column names are detected; dates may be ISO-8601 strings or
    /// native date types.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let date_column = detect_date_column(&df)?;
        let quantity_column = detect_quantity_column(&df, &date_column)?;

        let dates = extract_dates(df.column(&date_column)?)?;
        let quantities = extract_f64(df.column(&quantity_column)?)?;

        if dates.len() != quantities.len() {
            return Err(ForecastError::Data(format!(
                "Column lengths differ: {} dates vs {} quantities",
                dates.len(),
                quantities.len()
            )));
        }

        let observations = dates
            .into_iter()
            .zip(quantities)
            .map(|(date, quantity)| DailySales { date, quantity })
            .collect();

        Self::from_observations(observations)
    }

    // Observations are already sorted and validated here.
    fn from_canonical(observations: &[DailySales]) -> Result<Self> {
        let date_series = Series::new(
            DATE_COLUMN,
            observations
                .iter()
                .map(|obs| epoch_millis(obs.date))
                .collect::<Vec<i64>>(),
        );
        let quantity_series = Series::new(
            QUANTITY_COLUMN,
            observations.iter().map(|obs| obs.quantity).collect::<Vec<f64>>(),
        );

        let df = DataFrame::new(vec![date_series, quantity_series])?;
        Ok(Self { df })
    }

    /// Return a copy with every missing calendar day filled in as a
    /// zero-sales observation. Missing days are absent sales, not absent
    /// knowledge.
    pub fn gap_filled(&self) -> Result<Self> {
        let dates = self.dates();
        let quantities = self.quantities();

        let first = dates[0];
        let last = dates[dates.len() - 1];
        let span = (last - first).num_days() as usize + 1;

        if span == dates.len() {
            return Ok(self.clone());
        }

        let mut filled = Vec::with_capacity(span);
        let mut cursor = 0usize;
        let mut day = first;
        while day <= last {
            if cursor < dates.len() && dates[cursor] == day {
                filled.push(DailySales {
                    date: day,
                    quantity: quantities[cursor],
                });
                cursor += 1;
            } else {
                filled.push(DailySales {
                    date: day,
                    quantity: 0.0,
                });
            }
            day = day + Duration::days(1);
        }

        Self::from_canonical(&filled)
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Daily quantities, oldest first
    pub fn quantities(&self) -> Vec<f64> {
        match self.df.column(QUANTITY_COLUMN) {
            Ok(col) => col.f64().map(|ca| ca.into_iter().flatten().collect()).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Observation dates, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        match self.df.column(DATE_COLUMN) {
            Ok(col) => col
                .i64()
                .map(|ca| {
                    ca.into_iter()
                        .flatten()
                        .map(|ms| NaiveDate::default() + Duration::days(ms / MS_PER_DAY))
                        .collect()
                })
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Rebuild the raw observation list
    pub fn to_observations(&self) -> Vec<DailySales> {
        self.dates()
            .into_iter()
            .zip(self.quantities())
            .map(|(date, quantity)| DailySales { date, quantity })
            .collect()
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Result<NaiveDate> {
        self.dates().last().copied().ok_or_else(|| {
            ForecastError::Data("Sales history has no observations".to_string())
        })
    }

    /// Mean daily quantity over the whole history
    pub fn mean(&self) -> Result<f64> {
        Ok(retail_math::dispersion::mean(&self.quantities())?)
    }

    /// Mean daily quantity over the trailing `window` days
    pub fn trailing_mean(&self, window: usize) -> Result<f64> {
        Ok(retail_math::moving_averages::trailing_mean(
            &self.quantities(),
            window,
        )?)
    }

    /// Standard deviation of daily quantity over the whole history
    pub fn std_dev(&self) -> Result<f64> {
        Ok(retail_math::dispersion::std_dev(&self.quantities())?)
    }

    /// Stable content fingerprint for cache keying; changes whenever any
    /// observation changes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (date, quantity) in self.dates().iter().zip(self.quantities()) {
            date.hash(&mut hasher);
            quantity.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    (date - NaiveDate::default()).num_days() * MS_PER_DAY
}

fn detect_date_column(df: &DataFrame) -> Result<String> {
    let column_names = df.get_column_names();

    for name in &column_names {
        let lower_name = name.to_lowercase();
        if lower_name.contains("date") || lower_name.contains("day") {
            return Ok(name.to_string());
        }
    }

    if let Some(first_col) = df.get_columns().first() {
        if first_col.dtype().is_temporal() {
            return Ok(first_col.name().to_string());
        }
    }

    Err(ForecastError::Data(
        "No date column found in data".to_string(),
    ))
}

fn detect_quantity_column(df: &DataFrame, date_column: &str) -> Result<String> {
    let column_names = df.get_column_names();

    for candidate in ["quantity", "sales", "units", "sold"] {
        for name in &column_names {
            if name.to_lowercase().contains(candidate) {
                return Ok(name.to_string());
            }
        }
    }

    // Fall back to the first numeric column that is not the date
    for col in df.get_columns() {
        if col.name() != date_column && col.dtype().is_numeric() {
            return Ok(col.name().to_string());
        }
    }

    Err(ForecastError::Data(
        "No quantity column found in data".to_string(),
    ))
}

fn extract_dates(col: &Series) -> Result<Vec<NaiveDate>> {
    match col.dtype() {
        DataType::Utf8 => col
            .utf8()?
            .into_iter()
            .map(|opt| {
                let raw = opt.ok_or_else(|| {
                    ForecastError::Data("Missing date value".to_string())
                })?;
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                    ForecastError::Data(format!("Unparseable date '{}': {}", raw, e))
                })
            })
            .collect(),
        DataType::Date => col
            .date()?
            .into_iter()
            .map(|opt| {
                opt.map(|days| NaiveDate::default() + Duration::days(days as i64))
                    .ok_or_else(|| ForecastError::Data("Missing date value".to_string()))
            })
            .collect(),
        DataType::Datetime(unit, _) => {
            let per_day = match unit {
                TimeUnit::Milliseconds => 86_400_000i64,
                TimeUnit::Microseconds => 86_400_000_000i64,
                TimeUnit::Nanoseconds => 86_400_000_000_000i64,
            };
            col.datetime()?
                .into_iter()
                .map(|opt| {
                    opt.map(|ts| NaiveDate::default() + Duration::days(ts / per_day))
                        .ok_or_else(|| ForecastError::Data("Missing date value".to_string()))
                })
                .collect()
        }
        DataType::Int64 => col
            .i64()?
            .into_iter()
            .map(|opt| {
                opt.map(|ms| NaiveDate::default() + Duration::days(ms / MS_PER_DAY))
                    .ok_or_else(|| ForecastError::Data("Missing date value".to_string()))
            })
            .collect(),
        other => Err(ForecastError::Data(format!(
            "Date column has unsupported type {:?}",
            other
        ))),
    }
}

fn extract_f64(col: &Series) -> Result<Vec<f64>> {
    match col.dtype() {
        DataType::Float64 => Ok(col.f64()?.into_iter().flatten().collect()),
        DataType::Float32 => Ok(col.f32()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::Int64 => Ok(col.i64()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::Int32 => Ok(col.i32()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::UInt64 => Ok(col.u64()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::UInt32 => Ok(col.u32()?.into_iter().flatten().map(|v| v as f64).collect()),
        other => Err(ForecastError::Data(format!(
            "Quantity column has unsupported type {:?}",
            other
        ))),
    }
}
