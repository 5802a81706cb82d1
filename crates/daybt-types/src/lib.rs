//! daybt-types
//!
//! Shared value types for the backtesting workspace: bars and price
//! series, cadence/indicator identifiers, order and trade records, and
//! the metric tag set. Every other crate in the workspace depends on
//! this one instead of redefining these shapes.

mod bar;
mod cadence;
mod indicator;
mod metric;
mod order;
mod trade;

pub use bar::{Bar, PriceSeries};
pub use cadence::Cadence;
pub use indicator::{IndicatorCacheEntry, IndicatorPoint, IndicatorSpec};
pub use metric::{Metric, MetricKind, Unit};
pub use order::{Order, OrderStatus, OrderType, Side, TimeInForce};
pub use trade::Trade;
