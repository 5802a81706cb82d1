//! Ties the intraday path and fill-decision logic to a day's bars,
//! producing trades for whichever active orders fill.

use std::collections::HashMap;

use chrono::NaiveDate;
use daybt_types::{Bar, Order, Trade};

use crate::fill::{commission, would_fill};
use crate::path::intraday_path;

pub struct CommissionSchedule {
    pub per_share: f64,
    pub minimum: f64,
}

/// Match every active order in `orders` (already filtered to `ActiveOnly`
/// by the caller) against today's bar for its symbol, in the given
/// (submission) order, producing one trade per order that fills.
///
/// Orders for symbols with no bar today are skipped, not failed — a
/// missing bar is a benign gap (holiday), not an error.
pub fn match_orders(
    orders: &[&Order],
    bars_by_symbol: &HashMap<String, Bar>,
    schedule: &CommissionSchedule,
    date: NaiveDate,
) -> Vec<(uuid::Uuid, Trade)> {
    let mut trades = Vec::new();
    for order in orders {
        let Some(bar) = bars_by_symbol.get(&order.symbol) else {
            continue;
        };
        let path = intraday_path(bar);
        let Some(result) = would_fill(&path, &order.order_type, order.side) else {
            continue;
        };
        let comm = commission(order.quantity, schedule.per_share, schedule.minimum);
        let trade = Trade::new(order.id, order.symbol.clone(), order.side, order.quantity, result.price, comm, date);
        trades.push((order.id, trade));
    }
    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybt_types::{OrderType, Side};

    fn bar(y: i32, m: u32, d: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), open, high, low, close, close, 100).unwrap()
    }

    #[test]
    fn skips_orders_with_no_bar_today() {
        let order = Order::new("ZZZZ", Side::Buy, OrderType::Market, 10).unwrap();
        let schedule = CommissionSchedule { per_share: 0.01, minimum: 1.0 };
        let trades = match_orders(&[&order], &HashMap::new(), &schedule, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(trades.is_empty());
    }

    #[test]
    fn market_order_fills_with_commission() {
        let order = Order::new("AAPL", Side::Buy, OrderType::Market, 100).unwrap();
        let mut bars = HashMap::new();
        bars.insert("AAPL".to_string(), bar(2024, 1, 2, 10.0, 11.0, 9.0, 10.5));
        let schedule = CommissionSchedule { per_share: 0.01, minimum: 1.0 };
        let trades = match_orders(&[&order], &bars, &schedule, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].1.price, 10.0);
        assert_eq!(trades[0].1.commission, 1.0);
    }
}
