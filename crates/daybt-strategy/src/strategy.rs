//! Strategy interface: one operation, called synchronously by
//! the simulator with a date-scoped market view and the current
//! position set. Strategies are plug-ins, not hosts — the core calls
//! them, never the other way around.

use daybt_portfolio::{Position, Transition};
use daybt_status::Result;

use crate::market_view::MarketView;

pub trait Strategy {
    /// Called once per step, after fills and portfolio updates for the
    /// day have been applied. May not perform I/O. Returns the
    /// transitions it wants applied; the simulator validates and applies
    /// them.
    fn on_market_close(&mut self, market: &MarketView, positions: &[Position]) -> Result<Vec<Transition>>;
}
