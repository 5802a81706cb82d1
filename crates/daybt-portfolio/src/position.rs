//! Position state machine: `Entering -> Holding -> Exiting
//! -> Closed`, driven by tagged transition records with per-transition
//! guards. A violated guard never short-circuits — every guard for the
//! attempted transition is checked and all failures are joined into one
//! message.

use std::collections::HashMap;

use chrono::NaiveDate;
use daybt_status::{Result, Status};
use daybt_types::Side;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RiskParams {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub max_hold_days: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PositionState {
    Entering {
        target_qty: i64,
        entry_price: f64,
        filled_qty: i64,
        created_date: NaiveDate,
    },
    Holding {
        qty: i64,
        entry_price: f64,
        entry_date: NaiveDate,
        risk_params: RiskParams,
    },
    Exiting {
        qty: i64,
        entry_price: f64,
        entry_date: NaiveDate,
        target_qty: i64,
        exit_price: f64,
        filled_qty: i64,
        started_date: NaiveDate,
    },
    Closed {
        qty: i64,
        entry_price: f64,
        exit_price: f64,
        gross_pnl: Option<f64>,
        entry_date: NaiveDate,
        exit_date: NaiveDate,
        days_held: i64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub id: Uuid,
    pub symbol: String,
    pub side: Side,
    pub entry_reasoning: String,
    pub exit_reason: Option<String>,
    pub state: PositionState,
    pub last_updated: NaiveDate,
}

impl Position {
    pub fn is_closed(&self) -> bool {
        matches!(self.state, PositionState::Closed { .. })
    }
}

/// Tagged transition records (spec's `TransitionKind`), each carrying the
/// id of the position it applies to. `CreateEntering` is the one
/// constructor — it targets no existing position.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    CreateEntering {
        symbol: String,
        side: Side,
        target_qty: i64,
        entry_price: f64,
        reasoning: String,
    },
    EntryFill {
        position_id: Uuid,
        filled_qty: i64,
        fill_price: f64,
    },
    EntryComplete {
        position_id: Uuid,
        risk_params: RiskParams,
    },
    CancelEntry {
        position_id: Uuid,
        reason: String,
    },
    TriggerExit {
        position_id: Uuid,
        exit_reason: String,
        exit_price: f64,
    },
    UpdateRiskParams {
        position_id: Uuid,
        new_params: RiskParams,
    },
    ExitFill {
        position_id: Uuid,
        filled_qty: i64,
        fill_price: f64,
    },
    ExitComplete {
        position_id: Uuid,
    },
}

impl Transition {
    pub fn position_id(&self) -> Option<Uuid> {
        match self {
            Transition::CreateEntering { .. } => None,
            Transition::EntryFill { position_id, .. }
            | Transition::EntryComplete { position_id, .. }
            | Transition::CancelEntry { position_id, .. }
            | Transition::TriggerExit { position_id, .. }
            | Transition::UpdateRiskParams { position_id, .. }
            | Transition::ExitFill { position_id, .. }
            | Transition::ExitComplete { position_id } => Some(*position_id),
        }
    }
}

fn gross_pnl(side: Side, entry_price: f64, exit_price: f64, qty: i64) -> f64 {
    match side {
        Side::Buy => (exit_price - entry_price) * qty as f64,
        Side::Sell => (entry_price - exit_price) * qty as f64,
    }
}

/// Owns every position by id and applies transitions to them. There is
/// no back-reference to the portfolio or order book — transitions flow
/// in, mutated state flows out, nothing points back (cycles are
/// avoided by design).
#[derive(Default)]
pub struct PositionManager {
    positions: HashMap<Uuid, Position>,
}

impl PositionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// The first non-closed position for `symbol` whose state is
    /// `Entering` (used to route an entry fill) or `Exiting` (used to
    /// route an exit fill). The simulator calls this once per trade.
    pub fn find_active_by_symbol(&self, symbol: &str) -> Option<&Position> {
        self.positions.values().find(|p| {
            p.symbol == symbol
                && matches!(p.state, PositionState::Entering { .. } | PositionState::Exiting { .. })
        })
    }

    /// Apply one transition. `CreateEntering` always succeeds (its own
    /// guard is `qty > 0, price > 0`) and returns the new position's id;
    /// every other transition returns the (now-mutated) position's id on
    /// success.
    pub fn apply(&mut self, transition: Transition, date: NaiveDate) -> Result<Uuid> {
        if let Transition::CreateEntering { symbol, side, target_qty, entry_price, reasoning } = &transition {
            let mut errors = Vec::new();
            if *target_qty <= 0 {
                errors.push(format!("target_qty must be > 0, got {target_qty}"));
            }
            if *entry_price <= 0.0 {
                errors.push(format!("entry_price must be > 0, got {entry_price}"));
            }
            if !errors.is_empty() {
                return Err(Status::combine_invalid_argument(errors));
            }
            let id = Uuid::new_v4();
            let position = Position {
                id,
                symbol: symbol.clone(),
                side: *side,
                entry_reasoning: reasoning.clone(),
                exit_reason: None,
                state: PositionState::Entering {
                    target_qty: *target_qty,
                    entry_price: *entry_price,
                    filled_qty: 0,
                    created_date: date,
                },
                last_updated: date,
            };
            self.positions.insert(id, position);
            return Ok(id);
        }

        let id = transition.position_id().expect("non-create transitions carry a position_id");
        let Some(position) = self.positions.get_mut(&id) else {
            return Err(Status::failed_precondition(format!(
                "transition references unknown position id {id}"
            )));
        };

        if position.is_closed() {
            return Err(Status::invalid_argument("closed position"));
        }

        apply_to_position(position, transition, date)?;
        position.last_updated = date;
        Ok(id)
    }
}

fn apply_to_position(position: &mut Position, transition: Transition, date: NaiveDate) -> Result<()> {
    match (&position.state, transition) {
        (PositionState::Entering { target_qty, entry_price, filled_qty, created_date }, Transition::EntryFill { filled_qty: new_qty, fill_price, .. }) => {
            let mut errors = Vec::new();
            if fill_price <= 0.0 {
                errors.push(format!("fill_price must be positive, got {fill_price}"));
            }
            if filled_qty + new_qty > *target_qty {
                errors.push(format!(
                    "filled_qty {} + {} exceeds target {}",
                    filled_qty, new_qty, target_qty
                ));
            }
            if !errors.is_empty() {
                return Err(Status::combine_invalid_argument(errors));
            }
            position.state = PositionState::Entering {
                target_qty: *target_qty,
                entry_price: *entry_price,
                filled_qty: filled_qty + new_qty,
                created_date: *created_date,
            };
            Ok(())
        }
        (PositionState::Entering { filled_qty, entry_price, created_date, .. }, Transition::EntryComplete { risk_params, .. }) => {
            if *filled_qty <= 0 {
                return Err(Status::invalid_argument(format!(
                    "cannot complete entry with filled_qty {filled_qty}"
                )));
            }
            position.state = PositionState::Holding {
                qty: *filled_qty,
                entry_price: *entry_price,
                entry_date: date,
                risk_params,
            };
            let _ = created_date;
            Ok(())
        }
        (PositionState::Entering { filled_qty, entry_price, created_date, .. }, Transition::CancelEntry { reason, .. }) => {
            if *filled_qty != 0 {
                return Err(Status::invalid_argument(format!(
                    "cannot cancel entry with filled_qty {filled_qty}"
                )));
            }
            position.exit_reason = Some(reason);
            position.state = PositionState::Closed {
                qty: 0,
                entry_price: *entry_price,
                exit_price: *entry_price,
                gross_pnl: None,
                entry_date: *created_date,
                exit_date: date,
                days_held: 0,
            };
            Ok(())
        }
        (PositionState::Holding { risk_params: _, qty, entry_price, entry_date }, Transition::UpdateRiskParams { new_params, .. }) => {
            position.state = PositionState::Holding {
                qty: *qty,
                entry_price: *entry_price,
                entry_date: *entry_date,
                risk_params: new_params,
            };
            Ok(())
        }
        (PositionState::Holding { qty, entry_price, entry_date, .. }, Transition::TriggerExit { exit_reason, exit_price, .. }) => {
            if exit_price <= 0.0 {
                return Err(Status::invalid_argument(format!(
                    "exit_price must be positive, got {exit_price}"
                )));
            }
            position.exit_reason = Some(exit_reason);
            position.state = PositionState::Exiting {
                qty: *qty,
                entry_price: *entry_price,
                entry_date: *entry_date,
                target_qty: *qty,
                exit_price,
                filled_qty: 0,
                started_date: date,
            };
            Ok(())
        }
        (PositionState::Exiting { qty, entry_price, entry_date, target_qty, exit_price, filled_qty, started_date }, Transition::ExitFill { filled_qty: new_qty, fill_price: _, .. }) => {
            if filled_qty + new_qty > *target_qty {
                return Err(Status::invalid_argument(format!(
                    "filled_qty {} + {} exceeds target {}",
                    filled_qty, new_qty, target_qty
                )));
            }
            position.state = PositionState::Exiting {
                qty: *qty,
                entry_price: *entry_price,
                entry_date: *entry_date,
                target_qty: *target_qty,
                exit_price: *exit_price,
                filled_qty: filled_qty + new_qty,
                started_date: *started_date,
            };
            Ok(())
        }
        (PositionState::Exiting { qty, entry_price, exit_price, entry_date, .. }, Transition::ExitComplete { .. }) => {
            let days_held = (date - *entry_date).num_days();
            position.state = PositionState::Closed {
                qty: *qty,
                entry_price: *entry_price,
                exit_price: *exit_price,
                gross_pnl: Some(gross_pnl(position.side, *entry_price, *exit_price, *qty)),
                entry_date: *entry_date,
                exit_date: date,
                days_held,
            };
            Ok(())
        }
        (state, transition) => Err(Status::invalid_argument(format!(
            "illegal transition {:?} from state {:?}",
            transition_name(&transition),
            state_name(state)
        ))),
    }
}

fn transition_name(t: &Transition) -> &'static str {
    match t {
        Transition::CreateEntering { .. } => "CreateEntering",
        Transition::EntryFill { .. } => "EntryFill",
        Transition::EntryComplete { .. } => "EntryComplete",
        Transition::CancelEntry { .. } => "CancelEntry",
        Transition::TriggerExit { .. } => "TriggerExit",
        Transition::UpdateRiskParams { .. } => "UpdateRiskParams",
        Transition::ExitFill { .. } => "ExitFill",
        Transition::ExitComplete { .. } => "ExitComplete",
    }
}

fn state_name(s: &PositionState) -> &'static str {
    match s {
        PositionState::Entering { .. } => "Entering",
        PositionState::Holding { .. } => "Holding",
        PositionState::Exiting { .. } => "Exiting",
        PositionState::Closed { .. } => "Closed",
    }
}
