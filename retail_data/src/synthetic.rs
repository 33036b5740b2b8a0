//! Synthetic daily demand series for tests and demos
//!
//! Generates plausible retail sales: a base level, a weekly cycle, a slow
//! linear trend, and Gaussian noise. Seeded, so test assertions stay
//! deterministic.

use crate::{DailySales, DataError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Shape parameters for a generated demand series
#[derive(Debug, Clone)]
pub struct DemandProfile {
    /// Average units per day before seasonality
    pub base_level: f64,
    /// Strength of the weekly cycle; 0.3 means weekend days sell ~30% more
    pub weekly_amplitude: f64,
    /// Linear drift in units per day (positive = growing product)
    pub daily_trend: f64,
    /// Standard deviation of the day-to-day noise, in units
    pub noise: f64,
}

impl Default for DemandProfile {
    fn default() -> Self {
        Self {
            base_level: 20.0,
            weekly_amplitude: 0.25,
            daily_trend: 0.0,
            noise: 2.0,
        }
    }
}

/// Generate `days` of daily sales starting at `start`, seeded for
/// reproducibility. Quantities are clamped at zero; a noisy draw can not
/// produce negative sales.
pub fn generate_demand_series(
    start: NaiveDate,
    days: usize,
    profile: &DemandProfile,
    seed: u64,
) -> Result<Vec<DailySales>> {
    if profile.base_level < 0.0 {
        return Err(DataError::InvalidSeries(
            "Base demand level must be non-negative".to_string(),
        ));
    }
    let normal = Normal::new(0.0, profile.noise.max(1e-9))
        .map_err(|e| DataError::InvalidSeries(format!("Bad noise parameter: {}", e)))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut series = Vec::with_capacity(days);

    for i in 0..days {
        let date = start
            .checked_add_days(Days::new(i as u64))
            .ok_or_else(|| DataError::InvalidSeries("Date overflow".to_string()))?;

        // Weekend positions (5, 6 of the cycle) carry the amplitude bump
        let cycle_pos = i % 7;
        let seasonal = if cycle_pos >= 5 {
            1.0 + profile.weekly_amplitude
        } else {
            1.0 - profile.weekly_amplitude * 2.0 / 5.0
        };

        let level = profile.base_level + profile.daily_trend * i as f64;
        let noise = normal.sample(&mut rng);
        let quantity = (level * seasonal + noise).max(0.0);

        series.push(DailySales { date, quantity });
    }

    Ok(series)
}

/// A flat series with no cycle and no noise; handy for exactness tests
pub fn flat_series(start: NaiveDate, days: usize, level: f64) -> Vec<DailySales> {
    (0..days)
        .map(|i| DailySales {
            date: start + chrono::Duration::days(i as i64),
            quantity: level,
        })
        .collect()
}
