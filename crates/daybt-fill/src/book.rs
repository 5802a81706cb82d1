//! Order book / manager: holds submitted orders keyed by id.

use std::collections::HashMap;

use daybt_status::Result;
use daybt_types::{Order, OrderStatus};
use uuid::Uuid;

pub enum OrderFilter {
    ActiveOnly,
    All,
}

#[derive(Default)]
pub struct OrderBook {
    orders: HashMap<Uuid, Order>,
    /// Submission order, for FIFO fill processing ("fills within
    /// a single step are applied in the order orders were submitted").
    submission_order: Vec<Uuid>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all `orders`. Validation happens at `Order::new` time, so
    /// every submission here succeeds; one `Ok` is returned per order to
    /// keep the call shape symmetric with a future validating variant.
    pub fn submit_orders(&mut self, orders: Vec<Order>) -> Vec<Result<()>> {
        let mut results = Vec::with_capacity(orders.len());
        for order in orders {
            self.submission_order.push(order.id);
            self.orders.insert(order.id, order);
            results.push(Ok(()));
        }
        results
    }

    pub fn list_orders(&self, filter: OrderFilter) -> Vec<&Order> {
        self.submission_order
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(|o| match filter {
                OrderFilter::ActiveOnly => o.is_active(),
                OrderFilter::All => true,
            })
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Replace the stored record for `order.id`. Used by the simulator
    /// after a fill flips an order to `Filled`.
    pub fn update(&mut self, order: Order) -> Result<()> {
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Record a fill against `id`: sets `filled_quantity = quantity`,
    /// `avg_fill_price = price`, `status = Filled`.
    pub fn apply_fill(&mut self, id: Uuid, price: f64) -> Option<Order> {
        let order = self.orders.get_mut(&id)?;
        order.apply_fill(price);
        let status = order.status;
        debug_assert_eq!(status, OrderStatus::Filled);
        Some(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybt_types::{OrderType, Side};

    #[test]
    fn submit_then_active_only_excludes_filled() {
        let mut book = OrderBook::new();
        let o1 = Order::new("AAPL", Side::Buy, OrderType::Market, 10).unwrap();
        let o2 = Order::new("MSFT", Side::Sell, OrderType::Market, 5).unwrap();
        let id1 = o1.id;
        book.submit_orders(vec![o1, o2]);
        book.apply_fill(id1, 100.0);

        let active = book.list_orders(OrderFilter::ActiveOnly);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].symbol, "MSFT");

        let all = book.list_orders(OrderFilter::All);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn list_orders_preserves_submission_order() {
        let mut book = OrderBook::new();
        let o1 = Order::new("AAA", Side::Buy, OrderType::Market, 1).unwrap();
        let o2 = Order::new("BBB", Side::Buy, OrderType::Market, 1).unwrap();
        let o3 = Order::new("CCC", Side::Buy, OrderType::Market, 1).unwrap();
        book.submit_orders(vec![o1, o2, o3]);
        let all = book.list_orders(OrderFilter::All);
        let symbols: Vec<&str> = all.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
    }
}
