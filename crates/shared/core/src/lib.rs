//! Agora Core Domain
//!
//! Pure domain types for the Agora market simulator.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AgentId, Order, OrderId, OrderIntent, OrderStatus, OrderType, Side, Trade, TradeId,
};
pub use values::{MAX_QUANTITY, Price, Quantity, Tick, checked_notional, round_to_tick};
