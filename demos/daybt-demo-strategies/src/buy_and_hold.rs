//! Enters one long position the first day a price is available, then
//! never trades again.

use daybt_portfolio::{Position, Transition};
use daybt_status::Result;
use daybt_strategy::{MarketView, Strategy};
use daybt_types::Side;

pub struct BuyAndHold {
    symbol: String,
    quantity: i64,
    opened: bool,
}

impl BuyAndHold {
    pub fn new(symbol: impl Into<String>, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            opened: false,
        }
    }
}

impl Strategy for BuyAndHold {
    fn on_market_close(&mut self, market: &MarketView, _positions: &[Position]) -> Result<Vec<Transition>> {
        if self.opened {
            return Ok(vec![]);
        }
        let Some(bar) = market.get_price(&self.symbol) else {
            return Ok(vec![]);
        };
        self.opened = true;
        Ok(vec![Transition::CreateEntering {
            symbol: self.symbol.clone(),
            side: Side::Buy,
            target_qty: self.quantity,
            entry_price: bar.close,
            reasoning: "buy and hold".to_string(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use daybt_md::MarketDataAdapter;
    use daybt_types::{Bar, PriceSeries};

    fn bar(y: i32, m: u32, d: u32, close: f64) -> Bar {
        Bar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), close, close + 1.0, close - 1.0, close, close, 100).unwrap()
    }

    #[test]
    fn buys_once_then_stays_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let series = PriceSeries::new(vec![bar(2024, 1, 2, 100.0), bar(2024, 1, 3, 101.0)]).unwrap();
        daybt_md::csv::save(dir.path(), "AAPL", &series, false).unwrap();
        let adapter = MarketDataAdapter::new(dir.path());

        let mut strategy = BuyAndHold::new("AAPL", 10);
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        let first = strategy.on_market_close(&MarketView::new(&adapter, d1), &[]).unwrap();
        assert_eq!(first.len(), 1);

        let second = strategy.on_market_close(&MarketView::new(&adapter, d2), &[]).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn waits_for_a_bar_before_opening() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = MarketDataAdapter::new(dir.path());
        let mut strategy = BuyAndHold::new("ZZZZ", 10);
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let transitions = strategy.on_market_close(&MarketView::new(&adapter, d1), &[]).unwrap();
        assert!(transitions.is_empty());
    }
}
