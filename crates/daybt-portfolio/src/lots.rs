//! Portfolio & P&L: cash and FIFO lot accounting, keyed by symbol.
//! `BTreeMap` gives deterministic iteration order for valuation and
//! reporting instead of a hash map's unspecified order.

use std::collections::BTreeMap;

use daybt_status::{Result, Status};
use daybt_types::{Side, Trade};

/// A FIFO lot. `signed_qty` carries direction: positive is long,
/// negative is short.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lot {
    pub signed_qty: i64,
    pub entry_price: f64,
}

impl Lot {
    fn long(qty: i64, entry_price: f64) -> Self {
        Self { signed_qty: qty, entry_price }
    }

    fn short(qty: i64, entry_price: f64) -> Self {
        Self { signed_qty: -qty, entry_price }
    }

    fn is_long(&self) -> bool {
        self.signed_qty > 0
    }

    fn is_short(&self) -> bool {
        self.signed_qty < 0
    }

    fn abs_qty(&self) -> i64 {
        self.signed_qty.abs()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioPosition {
    pub lots: Vec<Lot>,
}

impl PortfolioPosition {
    pub fn signed_qty(&self) -> i64 {
        self.lots.iter().map(|l| l.signed_qty).sum()
    }

    pub fn is_flat(&self) -> bool {
        self.signed_qty() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Portfolio {
    pub initial_cash: f64,
    pub current_cash: f64,
    pub realized_pnl: f64,
    pub positions: BTreeMap<String, PortfolioPosition>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            current_cash: initial_cash,
            realized_pnl: 0.0,
            positions: BTreeMap::new(),
        }
    }

    /// Apply a batch of trades, in order. Buy reduces cash by
    /// `qty*price + commission` and covers short lots / opens a long lot
    /// FIFO; Sell increases cash by `qty*price - commission` and reduces
    /// long lots / opens a short lot FIFO. Cash is allowed to go negative
    /// (the engine does not reject overdrawing buys).
    pub fn apply_trades(&mut self, trades: &[Trade]) -> Result<()> {
        for trade in trades {
            self.apply_trade(trade)?;
        }
        Ok(())
    }

    fn apply_trade(&mut self, trade: &Trade) -> Result<()> {
        if !trade.price.is_finite() || !trade.commission.is_finite() {
            return Err(Status::internal(format!(
                "trade {} has a non-finite price or commission",
                trade.id
            )));
        }

        match trade.side {
            Side::Buy => {
                self.current_cash -= trade.quantity as f64 * trade.price + trade.commission;
            }
            Side::Sell => {
                self.current_cash += trade.quantity as f64 * trade.price - trade.commission;
            }
        }

        if !self.current_cash.is_finite() {
            return Err(Status::internal("cash became non-finite applying a trade"));
        }

        let position = self.positions.entry(trade.symbol.clone()).or_default();
        match trade.side {
            Side::Buy => buy_fifo(position, &mut self.realized_pnl, trade.quantity, trade.price),
            Side::Sell => sell_fifo(position, &mut self.realized_pnl, trade.quantity, trade.price),
        }
        if position.is_flat() {
            self.positions.remove(&trade.symbol);
        }
        Ok(())
    }

    /// Cash plus mark-to-close of every open position. A symbol absent
    /// from `price_by_symbol` contributes zero.
    pub fn portfolio_value(&self, price_by_symbol: &BTreeMap<String, f64>) -> Result<f64> {
        let mut total = self.current_cash;
        for (symbol, position) in &self.positions {
            let mark = price_by_symbol.get(symbol).copied().unwrap_or(0.0);
            total += position.signed_qty() as f64 * mark;
        }
        if !total.is_finite() {
            return Err(Status::internal("portfolio_value overflowed to a non-finite number"));
        }
        Ok(total)
    }
}

fn buy_fifo(position: &mut PortfolioPosition, realized_pnl: &mut f64, mut qty: i64, buy_price: f64) {
    let mut i = 0usize;
    while qty > 0 && i < position.lots.len() {
        if !position.lots[i].is_short() {
            i += 1;
            continue;
        }
        let coverable = position.lots[i].abs_qty().min(qty);
        let entry_price = position.lots[i].entry_price;
        *realized_pnl += (entry_price - buy_price) * coverable as f64;

        let remaining = position.lots[i].abs_qty() - coverable;
        if remaining == 0 {
            position.lots.remove(i);
        } else {
            position.lots[i].signed_qty = -remaining;
            i += 1;
        }
        qty -= coverable;
    }
    if qty > 0 {
        position.lots.push(Lot::long(qty, buy_price));
    }
}

fn sell_fifo(position: &mut PortfolioPosition, realized_pnl: &mut f64, mut qty: i64, sell_price: f64) {
    let mut i = 0usize;
    while qty > 0 && i < position.lots.len() {
        if !position.lots[i].is_long() {
            i += 1;
            continue;
        }
        let sellable = position.lots[i].abs_qty().min(qty);
        let entry_price = position.lots[i].entry_price;
        *realized_pnl += (sell_price - entry_price) * sellable as f64;

        let remaining = position.lots[i].abs_qty() - sellable;
        if remaining == 0 {
            position.lots.remove(i);
        } else {
            position.lots[i].signed_qty = remaining;
            i += 1;
        }
        qty -= sellable;
    }
    if qty > 0 {
        position.lots.push(Lot::short(qty, sell_price));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn trade(symbol: &str, side: Side, qty: i64, price: f64, commission: f64) -> Trade {
        Trade::new(Uuid::new_v4(), symbol, side, qty, price, commission, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    #[test]
    fn buy_reduces_cash_and_opens_long_lot() {
        let mut pf = Portfolio::new(10_000.0);
        pf.apply_trades(&[trade("AAPL", Side::Buy, 10, 154.0, 1.0)]).unwrap();
        assert_eq!(pf.current_cash, 10_000.0 - 10.0 * 154.0 - 1.0);
        assert_eq!(pf.positions["AAPL"].signed_qty(), 10);
    }

    #[test]
    fn round_trip_net_qty_matches_buy_minus_sell() {
        let mut pf = Portfolio::new(10_000.0);
        pf.apply_trades(&[
            trade("AAPL", Side::Buy, 10, 150.0, 1.0),
            trade("AAPL", Side::Sell, 4, 155.0, 1.0),
        ])
        .unwrap();
        assert_eq!(pf.positions["AAPL"].signed_qty(), 6);
    }

    #[test]
    fn full_round_trip_flattens_and_drops_position() {
        let mut pf = Portfolio::new(10_000.0);
        pf.apply_trades(&[
            trade("AAPL", Side::Buy, 10, 150.0, 1.0),
            trade("AAPL", Side::Sell, 10, 155.0, 1.0),
        ])
        .unwrap();
        assert!(!pf.positions.contains_key("AAPL"));
        assert_eq!(pf.realized_pnl, 50.0);
    }

    #[test]
    fn buy_allows_cash_to_go_negative() {
        let mut pf = Portfolio::new(100.0);
        pf.apply_trades(&[trade("AAPL", Side::Buy, 10, 150.0, 1.0)]).unwrap();
        assert!(pf.current_cash < 0.0);
    }

    #[test]
    fn portfolio_value_marks_open_positions_and_zeroes_unpriced() {
        let mut pf = Portfolio::new(10_000.0);
        pf.apply_trades(&[trade("AAPL", Side::Buy, 10, 150.0, 1.0)]).unwrap();
        let mut prices = BTreeMap::new();
        prices.insert("AAPL".to_string(), 160.0);
        let value = pf.portfolio_value(&prices).unwrap();
        assert_eq!(value, pf.current_cash + 10.0 * 160.0);

        let value_unpriced = pf.portfolio_value(&BTreeMap::new()).unwrap();
        assert_eq!(value_unpriced, pf.current_cash);
    }
}
