//! Moving average implementations over daily demand
//!
//! Contains the two averaging primitives used by the demand models:
//! - Simple Moving Average (windowed)
//! - Exponentially Weighted Average (alpha-smoothed)

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Windowed simple moving average over a demand stream
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new simple moving average with the specified window
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(MathError::InvalidInput(
                "Window must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        })
    }

    /// Feed a new observation into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.window {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Current average over a full window
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.window {
            return Err(MathError::InsufficientData(format!(
                "Need {} values for the window, have {}",
                self.window,
                self.values.len()
            )));
        }

        Ok(self.sum / self.window as f64)
    }

    /// The configured window length
    pub fn window(&self) -> usize {
        self.window
    }
}

/// Exponentially weighted average with a direct smoothing factor
#[derive(Debug, Clone)]
pub struct ExponentialAverage {
    alpha: f64,
    current: Option<f64>,
}

impl ExponentialAverage {
    /// Create a new exponential average; `alpha` must lie in (0, 1)
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(MathError::InvalidInput(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            alpha,
            current: None,
        })
    }

    /// Feed a new observation; the first one seeds the average
    pub fn update(&mut self, value: f64) {
        self.current = Some(match self.current {
            None => value,
            Some(current) => self.alpha * value + (1.0 - self.alpha) * current,
        });
    }

    /// Current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.current.ok_or_else(|| {
            MathError::InsufficientData("No observations seen yet".to_string())
        })
    }
}

/// Mean of the trailing `window` values, or of the whole slice when shorter
pub fn trailing_mean(values: &[f64], window: usize) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }

    let tail = &values[values.len().saturating_sub(window)..];
    Ok(tail.iter().sum::<f64>() / tail.len() as f64)
}
