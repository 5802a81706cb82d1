//! daybt-strategy
//!
//! The strategy interface and market view strategies see (neither
//! performs I/O), plus the order generator that turns applied
//! transitions into concrete orders (C10).

pub mod market_view;
pub mod order_gen;
pub mod strategy;

pub use market_view::MarketView;
pub use order_gen::generate_orders;
pub use strategy::Strategy;
