use serde::{Deserialize, Serialize};

use super::{AgentId, OrderId, OrderStatus, OrderType, Side};
use crate::values::{Price, Quantity, Tick};

/// Full order details
///
/// Created by the matching engine when an intent is accepted. The order book
/// owns every `Order`; the rest of the system refers to it by `OrderId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub agent_id: AgentId,
    pub side: Side,
    pub order_type: OrderType,
    /// Required for limit orders, `None` for market orders
    pub price: Option<Price>,
    /// Original quantity
    pub quantity: Quantity,
    pub remaining: Quantity,
    /// Global submission sequence; the time-priority key within a price level
    pub sequence: u64,
    /// Tick in which the order was submitted
    pub tick: Tick,
    /// Position of the submission within its tick
    pub tick_sequence: u32,
    pub status: OrderStatus,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        agent_id: AgentId,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
        sequence: u64,
        tick: Tick,
        tick_sequence: u32,
    ) -> Self {
        Self {
            id,
            agent_id,
            side,
            order_type,
            price,
            quantity,
            remaining: quantity,
            sequence,
            tick,
            tick_sequence,
            status: OrderStatus::Active,
        }
    }

    /// Quantity executed so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining
    }

    /// Returns true if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Whether this order would trade against the given opposite-side price
    pub fn crosses(&self, opposite_price: Price) -> bool {
        match (self.order_type, self.price) {
            (OrderType::Market, _) => true,
            (OrderType::Limit, Some(limit)) => match self.side {
                Side::Buy => limit >= opposite_price,
                Side::Sell => limit <= opposite_price,
            },
            (OrderType::Limit, None) => false,
        }
    }

    /// Apply an execution of `qty`, never more than what remains
    pub fn fill(&mut self, qty: Quantity) {
        debug_assert!(qty <= self.remaining, "overfill on {}", self.id);
        self.remaining -= qty.min(self.remaining);
        self.status = if self.remaining == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Mark the order cancelled; remaining quantity is kept for reporting
    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }
}
