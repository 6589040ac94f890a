use serde::{Deserialize, Serialize};

use super::{OrderId, OrderType, Side};
use crate::values::{Price, Quantity};

/// What an agent asks the venue to do
///
/// Agents only ever produce intents. The matching engine validates them and
/// turns accepted ones into orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderIntent {
    /// New limit order
    Limit {
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    /// New market order
    Market { side: Side, quantity: Quantity },
    /// Cancel one of the agent's own resting orders
    Cancel { order_id: OrderId },
}

impl OrderIntent {
    pub fn limit_buy(price: Price, quantity: Quantity) -> Self {
        Self::Limit {
            side: Side::Buy,
            price,
            quantity,
        }
    }

    pub fn limit_sell(price: Price, quantity: Quantity) -> Self {
        Self::Limit {
            side: Side::Sell,
            price,
            quantity,
        }
    }

    pub fn market_buy(quantity: Quantity) -> Self {
        Self::Market {
            side: Side::Buy,
            quantity,
        }
    }

    pub fn market_sell(quantity: Quantity) -> Self {
        Self::Market {
            side: Side::Sell,
            quantity,
        }
    }

    pub fn cancel(order_id: OrderId) -> Self {
        Self::Cancel { order_id }
    }

    /// Side of a new order, `None` for cancellations
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Limit { side, .. } | Self::Market { side, .. } => Some(*side),
            Self::Cancel { .. } => None,
        }
    }

    /// Order type of a new order, `None` for cancellations
    pub fn order_type(&self) -> Option<OrderType> {
        match self {
            Self::Limit { .. } => Some(OrderType::Limit),
            Self::Market { .. } => Some(OrderType::Market),
            Self::Cancel { .. } => None,
        }
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel { .. })
    }
}
