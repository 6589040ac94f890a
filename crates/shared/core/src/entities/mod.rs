mod ids;
mod intent;
mod order;
mod order_status;
mod order_type;
mod side;
mod trade;

pub use ids::{AgentId, OrderId, TradeId};
pub use intent::OrderIntent;
pub use order::Order;
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use side::Side;
pub use trade::Trade;
