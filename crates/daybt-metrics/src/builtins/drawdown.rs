//! Max drawdown built-in, 0-100 percent scale.

use daybt_types::{Metric, MetricKind, Unit};

use crate::fold::MetricComputer;
use crate::step::{MetricConfig, StepResult};

#[derive(Default)]
pub struct DrawdownState {
    peak: Option<f64>,
    max_drawdown_pct: f64,
}

pub struct MaxDrawdown;

impl MetricComputer for MaxDrawdown {
    type State = DrawdownState;

    fn name(&self) -> &'static str {
        "max_drawdown"
    }

    fn init(&self, _config: &MetricConfig) -> Self::State {
        DrawdownState::default()
    }

    fn update(&self, mut state: Self::State, step: &StepResult) -> Self::State {
        let value = step.portfolio_value;
        let peak = state.peak.map_or(value, |p| p.max(value));
        if peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            state.max_drawdown_pct = state.max_drawdown_pct.max(dd);
        }
        state.peak = Some(peak);
        state
    }

    fn finalize(&self, state: Self::State, _config: &MetricConfig) -> Vec<Metric> {
        vec![Metric::new(MetricKind::MaxDrawdown, round2(state.max_drawdown_pct), Unit::Percent)]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
