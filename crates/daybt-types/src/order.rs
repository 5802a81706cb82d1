use daybt_status::{Result, Status};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Orders are good for the next session only; there is no multi-day
/// resting-order model in this engine (no cross-symbol /
/// cross-day order dependencies beyond next-day execution).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeInForce {
    Day,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OrderType {
    Market,
    Limit(f64),
    Stop(f64),
    StopLimit { stop: f64, limit: f64 },
}

impl OrderType {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64, field: &str| -> Result<()> {
            if v > 0.0 {
                Ok(())
            } else {
                Err(Status::invalid_argument(format!(
                    "{field} must be positive, got {v}"
                )))
            }
        };
        match self {
            OrderType::Market => Ok(()),
            OrderType::Limit(p) => positive(*p, "limit price"),
            OrderType::Stop(p) => positive(*p, "stop price"),
            OrderType::StopLimit { stop, limit } => {
                positive(*stop, "stop price")?;
                positive(*limit, "limit price")
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: i64,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub filled_qty: i64,
    pub avg_fill_price: Option<f64>,
}

impl Order {
    /// Construct a new, unfilled order. Validates `quantity > 0` and the
    /// order type's own price invariants.
    pub fn new(symbol: impl Into<String>, side: Side, order_type: OrderType, quantity: i64) -> Result<Self> {
        if quantity <= 0 {
            return Err(Status::invalid_argument(format!(
                "order quantity must be > 0, got {quantity}"
            )));
        }
        order_type.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            time_in_force: TimeInForce::Day,
            status: OrderStatus::Pending,
            filled_qty: 0,
            avg_fill_price: None,
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Mark the order filled at `price` for the full remaining quantity.
    /// Invariant: `status == Filled <=> filled_qty == quantity`.
    pub fn apply_fill(&mut self, price: f64) {
        self.filled_qty = self.quantity;
        self.avg_fill_price = Some(price);
        self.status = OrderStatus::Filled;
    }
}
