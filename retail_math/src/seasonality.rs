//! Seasonal index extraction for cyclic demand patterns
//!
//! Retail demand runs on a weekly cycle; these helpers turn a daily series
//! into multiplicative per-position indices (index 1.0 = an average day).

use crate::dispersion::mean;
use crate::{MathError, Result};

/// Multiplicative seasonal indices for a cycle of `period` positions.
///
/// Each index is the average ratio of observations at that cycle position
/// to the overall series mean, normalised so the indices average to 1.0.
/// Requires at least two full cycles.
pub fn seasonal_indices(values: &[f64], period: usize) -> Result<Vec<f64>> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Seasonal period must be at least 2".to_string(),
        ));
    }
    if values.len() < 2 * period {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} observations for a period of {}, have {}",
            2 * period,
            period,
            values.len()
        )));
    }

    let overall = mean(values)?;
    if overall.abs() < 1e-12 {
        // An all-zero series is flat by definition
        return Ok(vec![1.0; period]);
    }

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &v) in values.iter().enumerate() {
        sums[i % period] += v / overall;
        counts[i % period] += 1;
    }

    let mut indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| s / c as f64)
        .collect();

    // Re-normalise so the cycle averages to exactly 1.0
    let index_mean = indices.iter().sum::<f64>() / period as f64;
    if index_mean.abs() < 1e-12 {
        return Ok(vec![1.0; period]);
    }
    for idx in &mut indices {
        *idx /= index_mean;
    }

    Ok(indices)
}

/// Divide each observation by its seasonal index, flattening the cycle
pub fn deseasonalize(values: &[f64], indices: &[f64]) -> Result<Vec<f64>> {
    if indices.is_empty() {
        return Err(MathError::InvalidInput(
            "Seasonal indices must not be empty".to_string(),
        ));
    }

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let idx = indices[i % indices.len()];
            if idx.abs() < 1e-12 {
                v
            } else {
                v / idx
            }
        })
        .collect())
}
