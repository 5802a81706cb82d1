//! daybt-metrics
//!
//! The type-erased fold-based metric computer framework (C12) and its
//! three required built-ins: Summary, Sharpe ratio, Max drawdown.

pub mod builtins;
pub mod fold;
pub mod step;

pub use builtins::{MaxDrawdown, SharpeRatio, Summary};
pub use fold::{erase, run_all, ErasedMetricComputer, MetricComputer};
pub use step::{MetricConfig, StepResult};

/// The standard set of built-in computers, erased and ready to fold.
pub fn default_computers() -> Vec<Box<dyn ErasedMetricComputer>> {
    vec![erase(Summary), erase(SharpeRatio), erase(MaxDrawdown)]
}
