//! The simulator step loop: the one place that knows
//! the order every other component must run in. Everything else in the
//! workspace is a leaf the loop calls; none of them know about each
//! other.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use daybt_fill::{match_orders, CommissionSchedule, OrderBook, OrderFilter};
use daybt_md::MarketDataAdapter;
use daybt_metrics::{run_all, ErasedMetricComputer, MetricConfig, StepResult};
use daybt_portfolio::{Portfolio, Position, PositionManager, PositionState, RiskParams, Transition};
use daybt_status::{Code, Result};
use daybt_strategy::{generate_orders, MarketView, Strategy};
use daybt_types::{Bar, Metric, Order};

use crate::config::BacktestConfig;

/// What one `step` produced: either today's record, or the signal that
/// `end_date` has been passed and the run is over.
pub enum StepOutcome {
    Stepped(StepResult),
    Completed,
}

/// The `run` result: every step, the portfolio as it stood
/// at the end, and the folded metrics.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub steps: Vec<StepResult>,
    pub final_portfolio: Portfolio,
    pub metrics: Vec<Metric>,
}

/// Owns every mutable piece of a run: the market data adapter, order
/// book, position map, portfolio, and the accumulated step history.
/// Single-threaded and synchronous throughout — `step` is the
/// only entry point that mutates anything.
pub struct Simulator {
    adapter: MarketDataAdapter,
    symbols: Vec<String>,
    schedule: CommissionSchedule,
    book: OrderBook,
    positions: PositionManager,
    portfolio: Portfolio,
    current_date: NaiveDate,
    end_date: NaiveDate,
    steps: Vec<StepResult>,
}

impl Simulator {
    pub fn new(
        adapter: MarketDataAdapter,
        symbols: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        config: &BacktestConfig,
    ) -> Self {
        Self {
            adapter,
            symbols,
            schedule: CommissionSchedule {
                per_share: config.commission_per_share,
                minimum: config.commission_minimum,
            },
            book: OrderBook::new(),
            positions: PositionManager::new(),
            portfolio: Portfolio::new(config.initial_cash),
            current_date: start_date,
            end_date,
            steps: Vec::new(),
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn positions(&self) -> &PositionManager {
        &self.positions
    }

    /// Advance exactly one trading day. Returns `Completed` once
    /// `current_date` has passed `end_date`; every call before that
    /// returns `Stepped` with that day's record.
    ///
    /// Ordering guarantee: fills from orders submitted on a
    /// prior step are matched and applied *before* the strategy runs;
    /// orders the strategy emits today are submitted *after* fill
    /// application and only become fill-eligible on the next step. This
    /// is what rules out same-day lookahead.
    pub fn step(&mut self, strategy: &mut dyn Strategy) -> Result<StepOutcome> {
        let date = self.current_date;
        if date > self.end_date {
            return Ok(StepOutcome::Completed);
        }

        // Step 2: assemble today's bars. A missing bar (holiday,
        // pre-listing, unknown symbol) is silently skipped, not an error.
        let bars_by_symbol: HashMap<String, Bar> = self
            .symbols
            .iter()
            .filter_map(|s| self.adapter.price(s, date).map(|b| (s.clone(), b)))
            .collect();

        // Step 3: match every active order against today's intraday path.
        let active_orders: Vec<Order> = self
            .book
            .list_orders(OrderFilter::ActiveOnly)
            .into_iter()
            .cloned()
            .collect();
        let active_refs: Vec<&Order> = active_orders.iter().collect();
        let fills = match_orders(&active_refs, &bars_by_symbol, &self.schedule, date);

        let mut trades = Vec::with_capacity(fills.len());
        for (order_id, trade) in fills {
            self.book.apply_fill(order_id, trade.price);
            trades.push(trade);
        }

        // Step 4: route each trade to the position it fills, by symbol
        // and by state. Entry fills always land on an `Entering`
        // position; exit fills on an `Exiting` one. Risk params start
        // all-None — placing protective orders is a future extension,
        // not required here.
        for trade in &trades {
            let Some(position) = self.positions.find_active_by_symbol(&trade.symbol).cloned() else {
                tracing::warn!(symbol = %trade.symbol, "trade with no matching open position, dropping");
                continue;
            };
            match &position.state {
                PositionState::Entering { .. } => {
                    self.positions.apply(
                        Transition::EntryFill {
                            position_id: position.id,
                            filled_qty: trade.quantity,
                            fill_price: trade.price,
                        },
                        date,
                    )?;
                    self.positions.apply(
                        Transition::EntryComplete {
                            position_id: position.id,
                            risk_params: RiskParams::default(),
                        },
                        date,
                    )?;
                }
                PositionState::Exiting { .. } => {
                    self.positions.apply(
                        Transition::ExitFill {
                            position_id: position.id,
                            filled_qty: trade.quantity,
                            fill_price: trade.price,
                        },
                        date,
                    )?;
                    self.positions.apply(Transition::ExitComplete { position_id: position.id }, date)?;
                }
                _ => {
                    tracing::warn!(symbol = %trade.symbol, "trade matched a position outside Entering/Exiting");
                }
            }
        }

        // Step 5: apply trades to the portfolio.
        self.portfolio.apply_trades(&trades)?;

        // Step 6: call the strategy with a date-scoped, read-only view.
        let positions_snapshot: Vec<Position> = self.positions.all().cloned().collect();
        let market = MarketView::new(&self.adapter, date);
        let transitions = strategy.on_market_close(&market, &positions_snapshot)?;

        // Step 7: only `CreateEntering` and `TriggerExit` are driven by
        // the strategy directly; every other kind is driven by fills
        // (step 4). A transition naming a position id that no longer
        // exists is a `FailedPrecondition` and is ignored, not fatal
        // ignored, not fatal; any other error short-circuits the step.
        let mut applied = Vec::new();
        for transition in transitions {
            if !matches!(transition, Transition::CreateEntering { .. } | Transition::TriggerExit { .. }) {
                continue;
            }
            match self.positions.apply(transition.clone(), date) {
                Ok(_) => applied.push(transition),
                Err(status) if status.code == Code::FailedPrecondition => {
                    tracing::warn!(message = %status.message, "strategy transition ignored");
                }
                Err(status) => return Err(status),
            }
        }

        // Step 8: turn the applied transitions into next-day orders.
        let orders = generate_orders(&applied, &self.positions)?;
        self.book.submit_orders(orders.clone());

        // Step 9: mark every open position to today's close.
        let price_by_symbol: BTreeMap<String, f64> =
            bars_by_symbol.iter().map(|(s, b)| (s.clone(), b.close)).collect();
        let portfolio_value = self.portfolio.portfolio_value(&price_by_symbol)?;

        // Step 10: record and advance.
        let step_result = StepResult {
            date,
            portfolio: self.portfolio.clone(),
            portfolio_value,
            trades,
            orders_submitted: orders,
        };
        self.steps.push(step_result.clone());
        self.current_date = date.succ_opt().expect("date arithmetic overflow");
        Ok(StepOutcome::Stepped(step_result))
    }

    /// Step until `Completed`, then fold every metric computer over the
    /// accumulated history.
    pub fn run(
        &mut self,
        strategy: &mut dyn Strategy,
        computers: &[Box<dyn ErasedMetricComputer>],
        metric_config: &MetricConfig,
    ) -> Result<RunResult> {
        loop {
            match self.step(strategy)? {
                StepOutcome::Stepped(_) => continue,
                StepOutcome::Completed => break,
            }
        }
        let metrics = run_all(computers, metric_config, &self.steps);
        Ok(RunResult {
            steps: self.steps.clone(),
            final_portfolio: self.portfolio.clone(),
            metrics,
        })
    }
}
