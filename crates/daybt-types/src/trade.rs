use crate::order::Side;
use chrono::NaiveDate;
use uuid::Uuid;

/// An immutable fill record, produced once by the fill engine and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    pub id: Uuid,
    pub order_id: Uuid,
    pub symbol: String,
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
    pub commission: f64,
    pub timestamp: NaiveDate,
}

impl Trade {
    pub fn new(
        order_id: Uuid,
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        price: f64,
        commission: f64,
        timestamp: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            symbol: symbol.into(),
            side,
            quantity,
            price,
            commission,
            timestamp,
        }
    }
}
