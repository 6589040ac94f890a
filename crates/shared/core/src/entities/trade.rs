use serde::{Deserialize, Serialize};

use super::{AgentId, OrderId, Side, TradeId};
use crate::values::{Price, Quantity, Tick, checked_notional};

/// Trade resulting from matching an incoming order against a resting one
///
/// Executes at the resting (maker) order's price. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub tick: Tick,
    pub price: Price,
    pub quantity: Quantity,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: AgentId,
    pub seller: AgentId,
    /// Side of the incoming (taker) order
    pub aggressor: Side,
}

impl Trade {
    /// The resting order that supplied liquidity
    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Buy => self.sell_order_id,
            Side::Sell => self.buy_order_id,
        }
    }

    /// The incoming order that took liquidity
    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Buy => self.buy_order_id,
            Side::Sell => self.sell_order_id,
        }
    }

    /// Notional value (price * quantity), `None` on decimal overflow
    pub fn notional(&self) -> Option<Price> {
        checked_notional(self.price, self.quantity)
    }

    /// Whether `order_id` is either leg of this trade
    pub fn involves(&self, order_id: OrderId) -> bool {
        self.buy_order_id == order_id || self.sell_order_id == order_id
    }
}
