//! Orders placed in earlier cycles that may still be open.

use crate::order::PlacedOrder;

/// Tracks placed orders between cycles so the next cycle can cancel them.
#[derive(Clone, Debug, Default)]
pub struct OrderStore {
    orders: Vec<PlacedOrder>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record newly placed orders.
    pub fn add(&mut self, placed: impl IntoIterator<Item = PlacedOrder>) {
        self.orders.extend(placed);
    }

    /// Orders currently tracked, in placement order.
    #[inline]
    pub fn orders(&self) -> &[PlacedOrder] {
        &self.orders
    }

    /// Forget every tracked order (after they were cancelled).
    pub fn clear(&mut self) {
        self.orders.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
