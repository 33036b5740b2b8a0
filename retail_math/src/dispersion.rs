//! Dispersion measures over demand series

use crate::{MathError, Result};

/// Arithmetic mean of the slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation of the slice
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Coefficient of variation (std dev over mean); demand series with a zero
/// mean are reported as having zero dispersion rather than an error, since
/// a dead product is not a volatile one.
pub fn coefficient_of_variation(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    if m.abs() < 1e-12 {
        return Ok(0.0);
    }
    Ok(std_dev(values)? / m)
}

/// Standard deviation of the trailing `window` values
pub fn trailing_std_dev(values: &[f64], window: usize) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot measure dispersion of an empty series".to_string(),
        ));
    }

    let tail = &values[values.len().saturating_sub(window)..];
    std_dev(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values).unwrap(), 5.0);
        assert!((std_dev(&values).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_mean_series_has_zero_cv() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(mean(&[]).is_err());
        assert!(trailing_std_dev(&[], 5).is_err());
    }
}
