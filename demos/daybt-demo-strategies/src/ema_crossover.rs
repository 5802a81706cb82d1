//! Enters long on an upward EMA(fast)/EMA(slow) cross, exits on a
//! downward cross. Holds at most one position per symbol at a time.

use daybt_portfolio::{Position, PositionState, Transition};
use daybt_status::Result;
use daybt_strategy::{MarketView, Strategy};
use daybt_types::{Cadence, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trend {
    Above,
    Below,
    Unknown,
}

pub struct EmaCrossover {
    symbol: String,
    fast_period: u32,
    slow_period: u32,
    quantity: i64,
    last_trend: Trend,
}

impl EmaCrossover {
    pub fn new(symbol: impl Into<String>, fast_period: u32, slow_period: u32, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            fast_period,
            slow_period,
            quantity,
            last_trend: Trend::Unknown,
        }
    }
}

impl Strategy for EmaCrossover {
    fn on_market_close(&mut self, market: &MarketView, positions: &[Position]) -> Result<Vec<Transition>> {
        let Some(fast) = market.get_indicator(&self.symbol, "ema", self.fast_period, Cadence::Daily)? else {
            return Ok(vec![]);
        };
        let Some(slow) = market.get_indicator(&self.symbol, "ema", self.slow_period, Cadence::Daily)? else {
            return Ok(vec![]);
        };

        let trend = if fast > slow { Trend::Above } else { Trend::Below };
        let crossed_up = self.last_trend == Trend::Below && trend == Trend::Above;
        let crossed_down = self.last_trend == Trend::Above && trend == Trend::Below;
        self.last_trend = trend;

        let Some(bar) = market.get_price(&self.symbol) else {
            return Ok(vec![]);
        };

        let has_open_position = positions.iter().any(|p| p.symbol == self.symbol && !p.is_closed());

        if crossed_up && !has_open_position {
            return Ok(vec![Transition::CreateEntering {
                symbol: self.symbol.clone(),
                side: Side::Buy,
                target_qty: self.quantity,
                entry_price: bar.close,
                reasoning: format!("ema{} crossed above ema{}", self.fast_period, self.slow_period),
            }]);
        }

        if crossed_down {
            let holding = positions
                .iter()
                .find(|p| p.symbol == self.symbol && matches!(p.state, PositionState::Holding { .. }));
            if let Some(position) = holding {
                return Ok(vec![Transition::TriggerExit {
                    position_id: position.id,
                    exit_reason: format!("ema{} crossed below ema{}", self.fast_period, self.slow_period),
                    exit_price: bar.close,
                }]);
            }
        }

        Ok(vec![])
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
    fn no_signal_before_enough_history() {
        let dir = tempfile::tempdir().unwrap();
        let series = PriceSeries::new(vec![bar(2024, 1, 2, 100.0)]).unwrap();
        daybt_md::csv::save(dir.path(), "AAPL", &series, false).unwrap();
        let adapter = MarketDataAdapter::new(dir.path());

        let mut strategy = EmaCrossover::new("AAPL", 2, 3, 10);
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let transitions = strategy.on_market_close(&MarketView::new(&adapter, d1), &[]).unwrap();
        assert!(transitions.is_empty());
    }
}
