//! Order generator: converts the transitions the
//! simulator just applied into concrete orders. Only `CreateEntering`
//! and `TriggerExit` produce orders — everything else is driven by fills
//! by the step loop after a transition is applied, not by the strategy directly.

use daybt_status::{Result, Status};
use daybt_types::{Order, OrderType, Side};

use daybt_portfolio::{PositionManager, PositionState, Transition};

/// `CreateEntering{side=Long}` -> Buy Market; `{side=Short}` -> Sell
/// Market, both for `target_qty`. `TriggerExit` looks up the position
/// (already moved to `Exiting` by the time this runs) and emits the
/// opposite-side Market order for its quantity. Every other transition
/// kind yields no order.
pub fn generate_orders(transitions: &[Transition], positions: &PositionManager) -> Result<Vec<Order>> {
    let mut orders = Vec::new();
    for transition in transitions {
        match transition {
            Transition::CreateEntering { symbol, side, target_qty, .. } => {
                orders.push(Order::new(symbol.clone(), *side, OrderType::Market, *target_qty)?);
            }
            Transition::TriggerExit { position_id, .. } => {
                let Some(position) = positions.get(*position_id) else {
                    continue;
                };
                let PositionState::Exiting { qty, .. } = position.state else {
                    return Err(Status::failed_precondition(format!(
                        "TriggerExit for {} but position is not Exiting",
                        position_id
                    )));
                };
                orders.push(Order::new(position.symbol.clone(), position.side.opposite(), OrderType::Market, qty)?);
            }
            _ => {}
        }
    }
    Ok(orders)
}
