//! daybt-backtest
//!
//! The simulator step loop (C11): wires the market-data adapter, fill
//! engine, position state machine, portfolio, strategy, order generator,
//! and metric framework together into one deterministic per-day loop.

pub mod config;
pub mod engine;

pub use config::BacktestConfig;
pub use engine::{RunResult, Simulator, StepOutcome};
