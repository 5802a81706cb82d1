//! Summary built-in: round-trip trade pairing and aggregate P&L (spec
//! §4.12).

use std::collections::{HashMap, VecDeque};

use daybt_types::{Metric, MetricKind, Side, Trade, Unit};

use crate::fold::MetricComputer;
use crate::step::{MetricConfig, StepResult};

#[derive(Clone, Debug)]
struct RoundTrip {
    pnl_dollars: f64,
    days_held: i64,
}

#[derive(Default)]
pub struct SummaryState {
    /// Per-symbol trade history in chronological order, as seen so far.
    trades_by_symbol: HashMap<String, Vec<Trade>>,
}

pub struct Summary;

impl MetricComputer for Summary {
    type State = SummaryState;

    fn name(&self) -> &'static str {
        "summary"
    }

    fn init(&self, _config: &MetricConfig) -> Self::State {
        SummaryState::default()
    }

    fn update(&self, mut state: Self::State, step: &StepResult) -> Self::State {
        for trade in &step.trades {
            state.trades_by_symbol.entry(trade.symbol.clone()).or_default().push(trade.clone());
        }
        state
    }

    fn finalize(&self, state: Self::State, _config: &MetricConfig) -> Vec<Metric> {
        let mut round_trips = Vec::new();
        let mut symbols: Vec<&String> = state.trades_by_symbol.keys().collect();
        symbols.sort();
        for symbol in symbols {
            let trades = &state.trades_by_symbol[symbol];
            let mut pending_buys: VecDeque<&Trade> = VecDeque::new();
            for trade in trades {
                match trade.side {
                    Side::Buy => pending_buys.push_back(trade),
                    Side::Sell => {
                        if let Some(buy) = pending_buys.pop_front() {
                            let qty = buy.quantity.min(trade.quantity) as f64;
                            let pnl_dollars = (trade.price - buy.price) * qty;
                            let days_held = (trade.timestamp - buy.timestamp).num_days();
                            round_trips.push(RoundTrip { pnl_dollars, days_held });
                        }
                    }
                }
            }
        }

        if round_trips.is_empty() {
            return Vec::new();
        }

        let total_pnl: f64 = round_trips.iter().map(|r| r.pnl_dollars).sum();
        let win_count = round_trips.iter().filter(|r| r.pnl_dollars > 0.0).count();
        let loss_count = round_trips.len() - win_count;
        let win_rate = win_count as f64 / round_trips.len() as f64 * 100.0;
        let avg_holding_days =
            round_trips.iter().map(|r| r.days_held as f64).sum::<f64>() / round_trips.len() as f64;

        vec![
            Metric::new(MetricKind::TotalPnl, round2(total_pnl), Unit::Dollars),
            Metric::new(MetricKind::WinCount, win_count as f64, Unit::Count),
            Metric::new(MetricKind::LossCount, loss_count as f64, Unit::Count),
            Metric::new(MetricKind::WinRate, win_rate, Unit::Percent),
            Metric::new(MetricKind::AvgHoldingDays, avg_holding_days, Unit::Days),
        ]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
