//! Linear trend estimation for demand series

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Ordinary least squares over a sliding window of demand observations,
/// with the observation index as the independent variable.
#[derive(Debug, Clone)]
pub struct LinearTrend {
    window: usize,
    values: VecDeque<f64>,
    slope: Option<f64>,
    intercept: Option<f64>,
}

impl LinearTrend {
    /// Create a new trend estimator over the given window
    pub fn new(window: usize) -> Result<Self> {
        if window < 2 {
            return Err(MathError::InvalidInput(
                "Window must be at least 2 for trend estimation".to_string(),
            ));
        }

        Ok(Self {
            window,
            values: VecDeque::with_capacity(window),
            slope: None,
            intercept: None,
        })
    }

    /// Feed a new observation and refresh the fitted line
    pub fn update(&mut self, value: f64) -> Result<()> {
        self.values.push_back(value);

        if self.values.len() > self.window {
            self.values.pop_front();
        }

        if self.values.len() >= 2 {
            self.refit()?;
        }

        Ok(())
    }

    fn refit(&mut self) -> Result<()> {
        let n = self.values.len() as f64;

        let x_mean = (0..self.values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = self.values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in self.values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Degenerate window: observation indices are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        self.slope = Some(slope);
        self.intercept = Some(y_mean - slope * x_mean);

        Ok(())
    }

    /// Project the fitted line `periods_ahead` past the end of the window
    pub fn project(&self, periods_ahead: usize) -> Result<f64> {
        match (self.slope, self.intercept) {
            (Some(slope), Some(intercept)) => {
                let x = (self.values.len() + periods_ahead - 1) as f64;
                Ok(slope * x + intercept)
            }
            _ => Err(MathError::InsufficientData(
                "Need at least 2 observations before projecting".to_string(),
            )),
        }
    }

    /// Per-day change of the fitted line
    pub fn slope(&self) -> Result<f64> {
        self.slope.ok_or_else(|| {
            MathError::InsufficientData("Need at least 2 observations for a slope".to_string())
        })
    }
}

/// Slope of a least-squares line fitted to the whole slice
pub fn slope_of(values: &[f64]) -> Result<f64> {
    let mut trend = LinearTrend::new(values.len().max(2))?;
    for &v in values {
        trend.update(v)?;
    }
    trend.slope()
}
