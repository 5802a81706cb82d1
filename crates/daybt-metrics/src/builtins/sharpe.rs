//! Sharpe ratio built-in.

use daybt_types::{Metric, MetricKind, Unit};

use crate::fold::MetricComputer;
use crate::step::{MetricConfig, StepResult};

#[derive(Default)]
pub struct SharpeState {
    values: Vec<f64>,
}

pub struct SharpeRatio;

impl MetricComputer for SharpeRatio {
    type State = SharpeState;

    fn name(&self) -> &'static str {
        "sharpe_ratio"
    }

    fn init(&self, _config: &MetricConfig) -> Self::State {
        SharpeState::default()
    }

    fn update(&self, mut state: Self::State, step: &StepResult) -> Self::State {
        state.values.push(step.portfolio_value);
        state
    }

    fn finalize(&self, state: Self::State, config: &MetricConfig) -> Vec<Metric> {
        let returns: Vec<f64> = state
            .values
            .windows(2)
            .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
            .collect();

        if returns.len() < 2 {
            return vec![Metric::new(MetricKind::SharpeRatio, 0.0, Unit::Ratio)];
        }

        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        let stdev = variance.sqrt();

        let sharpe = if stdev == 0.0 {
            0.0
        } else {
            (mean - config.risk_free_rate / 252.0) / stdev * (252.0_f64).sqrt()
        };

        vec![Metric::new(MetricKind::SharpeRatio, sharpe, Unit::Ratio)]
    }
}
