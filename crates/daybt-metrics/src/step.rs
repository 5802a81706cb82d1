//! The per-day record the simulator emits and every metric computer
//! folds over.

use chrono::NaiveDate;
use daybt_portfolio::Portfolio;
use daybt_types::{Order, Trade};

#[derive(Clone, Debug)]
pub struct StepResult {
    pub date: NaiveDate,
    pub portfolio: Portfolio,
    pub portfolio_value: f64,
    pub trades: Vec<Trade>,
    pub orders_submitted: Vec<Order>,
}

/// Config shared by every metric computer's `init`. Kept minimal: just
/// what the required built-ins need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricConfig {
    pub risk_free_rate: f64,
}

impl MetricConfig {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self { risk_free_rate: 0.0 }
    }
}
