//! Type-erased fold-based metric computer framework.
//!
//! Each computer keeps its own `State` type private; `run` folds
//! `update` over the step list and calls `finalize`. Erasing the state
//! type behind a trait object is what lets a heterogeneous list of
//! computers share one `Vec<Box<dyn ErasedMetricComputer>>`.

use daybt_types::Metric;

use crate::step::{MetricConfig, StepResult};

pub trait MetricComputer {
    type State;

    fn name(&self) -> &'static str;
    fn init(&self, config: &MetricConfig) -> Self::State;
    fn update(&self, state: Self::State, step: &StepResult) -> Self::State;
    fn finalize(&self, state: Self::State, config: &MetricConfig) -> Vec<Metric>;
}

pub trait ErasedMetricComputer {
    fn name(&self) -> &'static str;
    fn run(&self, config: &MetricConfig, steps: &[StepResult]) -> Vec<Metric>;
}

struct Erased<C>(C);

impl<C: MetricComputer> ErasedMetricComputer for Erased<C> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn run(&self, config: &MetricConfig, steps: &[StepResult]) -> Vec<Metric> {
        let mut state = self.0.init(config);
        for step in steps {
            state = self.0.update(state, step);
        }
        self.0.finalize(state, config)
    }
}

pub fn erase<C: MetricComputer + 'static>(computer: C) -> Box<dyn ErasedMetricComputer> {
    Box::new(Erased(computer))
}

/// Run every computer over `steps` and concatenate their metrics, in
/// computer order.
pub fn run_all(computers: &[Box<dyn ErasedMetricComputer>], config: &MetricConfig, steps: &[StepResult]) -> Vec<Metric> {
    computers.iter().flat_map(|c| c.run(config, steps)).collect()
}
