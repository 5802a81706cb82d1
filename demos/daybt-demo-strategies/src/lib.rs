//! daybt-demo-strategies
//!
//! Two reference `Strategy` implementations used by the CLI and by the
//! simulator's own scenario tests: a buy-and-hold and an EMA crossover.

pub mod buy_and_hold;
pub mod ema_crossover;

pub use buy_and_hold::BuyAndHold;
pub use ema_crossover::EmaCrossover;
