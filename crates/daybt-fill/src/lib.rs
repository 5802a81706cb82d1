//! daybt-fill
//!
//! Intraday path synthesis and fill decisions (C6), plus the order book
//! that holds pending orders and flips them to `Filled` (C7).

pub mod book;
pub mod engine;
pub mod fill;
pub mod path;

pub use book::{OrderBook, OrderFilter};
pub use engine::{match_orders, CommissionSchedule};
pub use fill::{commission, would_fill, FillResult};
pub use path::{intraday_path, PathPoint};
