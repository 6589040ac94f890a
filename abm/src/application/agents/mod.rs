//! Agent Framework
//!
//! Traits and types for trading agents in the ABM simulation.
//!
//! # Agent Types
//!
//! - **NoiseTrader**: Random trader providing baseline volume
//! - **Fundamentalist**: Trades toward a private valuation (anchors prices)
//! - **MomentumTrader**: Bets on trend continuation (amplifies trends)
//! - **MarketMaker**: Two-sided quotes with inventory skew (provides liquidity)

mod agent;
mod factory;
mod market_state;

pub use agent::{
    AccountOverflow, Agent, AgentAccount, AgentView, Fill, ParameterError, RejectionNotice,
};
pub use factory::AgentKind;
pub use market_state::{LastTrade, MarketState};

// Agent implementations
pub mod fundamentalist;
pub mod market_maker;
pub mod momentum;
pub mod noise;

// Re-export agent types and configs
pub use fundamentalist::{Fundamentalist, FundamentalistConfig};
pub use market_maker::{MarketMaker, MarketMakerConfig};
pub use momentum::{MomentumConfig, MomentumTrader};
pub use noise::{NoiseTrader, NoiseTraderConfig};
