//! A buy-and-hold strategy's order fills on the next day's open, not the
//! day it was submitted.

use chrono::NaiveDate;

use daybt_backtest::{BacktestConfig, Simulator, StepOutcome};
use daybt_md::MarketDataAdapter;
use daybt_portfolio::{Position, PositionState, Transition};
use daybt_status::Result;
use daybt_strategy::{MarketView, Strategy};
use daybt_types::{Bar, PriceSeries, Side};

struct BuyOnce {
    done: bool,
}

impl Strategy for BuyOnce {
    fn on_market_close(&mut self, _market: &MarketView, _positions: &[Position]) -> Result<Vec<Transition>> {
        if self.done {
            return Ok(vec![]);
        }
        self.done = true;
        Ok(vec![Transition::CreateEntering {
            symbol: "AAPL".to_string(),
            side: Side::Buy,
            target_qty: 10,
            entry_price: 150.0,
            reasoning: "breakout".to_string(),
        }])
    }
}

fn bar(y: i32, m: u32, d: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), open, high, low, close, close, 1_000).unwrap()
}

#[test]
fn buy_and_hold_fills_on_the_next_days_open() {
    let dir = tempfile::tempdir().unwrap();
    let series = PriceSeries::new(vec![
        bar(2024, 1, 2, 150.0, 151.0, 149.0, 150.5),
        bar(2024, 1, 3, 154.0, 155.0, 153.0, 154.5),
        bar(2024, 1, 4, 157.0, 158.0, 156.0, 157.5),
    ])
    .unwrap();
    daybt_md::csv::save(dir.path(), "AAPL", &series, false).unwrap();

    let adapter = MarketDataAdapter::new(dir.path());
    let config = BacktestConfig {
        initial_cash: 10_000.0,
        commission_per_share: 0.0,
        commission_minimum: 1.0,
        risk_free_rate: 0.0,
    };
    let mut sim = Simulator::new(
        adapter,
        vec!["AAPL".to_string()],
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        &config,
    );
    let mut strategy = BuyOnce { done: false };

    // Day 1: strategy opens the position, no trade yet.
    let StepOutcome::Stepped(day1) = sim.step(&mut strategy).unwrap() else {
        panic!("expected Stepped");
    };
    assert!(day1.trades.is_empty());
    assert_eq!(day1.orders_submitted.len(), 1);

    // Day 2: the order submitted on day 1 fills at day 2's open.
    let StepOutcome::Stepped(day2) = sim.step(&mut strategy).unwrap() else {
        panic!("expected Stepped");
    };
    assert_eq!(day2.trades.len(), 1);
    assert_eq!(day2.trades[0].quantity, 10);
    assert_eq!(day2.trades[0].price, 154.0);
    assert_eq!(day2.trades[0].commission, 1.0);
    assert_eq!(day2.portfolio.current_cash, 10_000.0 - 10.0 * 154.0 - 1.0);

    let position = sim.positions().all().next().unwrap();
    assert!(matches!(position.state, PositionState::Holding { qty: 10, .. }));
}
