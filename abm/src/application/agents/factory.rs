//! Agent Factory
//!
//! Builds concrete agents from their serialized configuration.

use agora_core::AgentId;
use serde::{Deserialize, Serialize};

use super::{
    Agent, Fundamentalist, FundamentalistConfig, MarketMaker, MarketMakerConfig, MomentumConfig,
    MomentumTrader, NoiseTrader, NoiseTraderConfig, ParameterError,
};

/// Agent variant plus its parameters, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentKind {
    Noise(NoiseTraderConfig),
    Fundamentalist(FundamentalistConfig),
    Momentum(MomentumConfig),
    MarketMaker(MarketMakerConfig),
}

impl AgentKind {
    /// Type tag, identical to the built agent's `agent_type()`
    pub fn type_name(&self) -> &'static str {
        match self {
            AgentKind::Noise(_) => "noise",
            AgentKind::Fundamentalist(_) => "fundamentalist",
            AgentKind::Momentum(_) => "momentum",
            AgentKind::MarketMaker(_) => "market_maker",
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            AgentKind::Noise(config) => config.validate(),
            AgentKind::Fundamentalist(config) => config.validate(),
            AgentKind::Momentum(config) => config.validate(),
            AgentKind::MarketMaker(config) => config.validate(),
        }
    }

    /// Build one agent; `seed` feeds the agent's private RNG
    pub fn build(&self, id: AgentId, seed: u64) -> Result<Box<dyn Agent>, ParameterError> {
        Ok(match self {
            AgentKind::Noise(config) => Box::new(NoiseTrader::new(id, config.clone(), seed)?),
            AgentKind::Fundamentalist(config) => {
                Box::new(Fundamentalist::new(id, config.clone(), seed)?)
            }
            AgentKind::Momentum(config) => Box::new(MomentumTrader::new(id, config.clone())?),
            AgentKind::MarketMaker(config) => Box::new(MarketMaker::new(id, config.clone())?),
        })
    }
}
