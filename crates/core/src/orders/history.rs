//! Order history

use jiff::Timestamp;

use crate::orders::{Order, OrderError, OrderId, OrderStatus, StatusUpdate};

/// Every order a session has placed, newest first. Orders are never removed; they move from
/// [`active`](Self::active) to [`past`](Self::past) as their status becomes terminal.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly placed order at the front.
    pub fn record(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    /// Look up an order.
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// Every order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Orders that are neither picked up nor cancelled, newest first.
    pub fn active(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| order.is_active())
    }

    /// Picked up and cancelled orders, newest first.
    pub fn past(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| !order.is_active())
    }

    /// Number of orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders have been placed
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::OrderNotFound`]: no order has this id.
    /// - [`OrderError::InvalidTransition`], [`OrderError::TerminalStatus`]: see
    ///   [`OrderStatus::check_transition`].
    pub fn update_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        at: Timestamp,
    ) -> Result<&Order, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id() == id)
            .ok_or(OrderError::OrderNotFound(id))?;

        order.update_status(status, at)?;

        Ok(order)
    }

    /// The next progression step due for an order; `None` for unknown or finished orders.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Time`] if the order's plan cannot be computed.
    pub fn next_due(
        &self,
        id: OrderId,
        now: Timestamp,
    ) -> Result<Option<StatusUpdate>, OrderError> {
        self.get(id).map_or(Ok(None), |order| order.next_due(now))
    }

    /// Apply due progression steps to every active order. Returns each change made.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Time`] if a plan cannot be computed. Orders visited before the
    /// failing one keep their changes.
    pub fn advance_due(
        &mut self,
        now: Timestamp,
    ) -> Result<Vec<(OrderId, OrderStatus)>, OrderError> {
        let mut changes = Vec::new();

        for order in self.orders.iter_mut().filter(|order| order.is_active()) {
            for status in order.advance_due(now)? {
                changes.push((order.id(), status));
            }
        }

        Ok(changes)
    }
}
