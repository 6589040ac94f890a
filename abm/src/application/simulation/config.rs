//! Simulation Configuration
//!
//! Run parameters loaded from JSON. Validation happens before a simulation
//! is built; any error here is fatal and the run never starts.

use agora_core::{AgentId, Price, Quantity, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::application::agents::AgentKind;

/// Fatal configuration problems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least one agent is required")]
    NoAgents,

    #[error("horizon must be at least one tick; empty runs are rejected")]
    ZeroHorizon,

    #[error("agent spec #{index} has count 0")]
    ZeroCount { index: usize },

    #[error("invalid {agent_type} parameter {name}: {reason}")]
    InvalidParameter {
        agent_type: &'static str,
        name: &'static str,
        reason: String,
    },

    #[error("seed order #{index}: {reason}")]
    InvalidSeedOrder { index: usize, reason: String },

    #[error("price tick must be positive")]
    InvalidPriceTick,

    #[error("agent id {0} is reserved or already taken")]
    DuplicateAgentId(AgentId),

    #[error("failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// One group of identical agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(flatten)]
    pub kind: AgentKind,
    /// Number of agents built from this spec
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub initial_capital: Price,
    #[serde(default)]
    pub initial_position: i64,
}

fn default_count() -> usize {
    1
}

impl AgentSpec {
    pub fn new(kind: AgentKind, count: usize) -> Self {
        Self {
            kind,
            count,
            initial_capital: Decimal::ZERO,
            initial_position: 0,
        }
    }

    /// Set starting capital (builder pattern)
    pub fn with_capital(mut self, capital: Price) -> Self {
        self.initial_capital = capital;
        self
    }

    /// Set starting inventory (builder pattern)
    pub fn with_position(mut self, position: i64) -> Self {
        self.initial_position = position;
        self
    }
}

/// Limit order placed by the house account before the first tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOrder {
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Configuration for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to simulate
    pub horizon: u64,
    /// Seed of the scheduler RNG; every other random stream derives from it
    pub seed: u64,
    pub agents: Vec<AgentSpec>,
    /// Initial book, placed in order before tick 0
    pub seed_orders: Vec<SeedOrder>,
    /// Minimum price increment agents quote on
    pub price_tick: Price,
    /// Levels per side captured in each market snapshot
    pub depth_levels: usize,
    /// Permute the agent order once at start using the seeded RNG
    pub shuffle_agent_order: bool,
    /// Run the decide phase sequentially even with the `parallel` feature
    pub force_sequential: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 1000,
            seed: 42,
            agents: Vec::new(),
            seed_orders: Vec::new(),
            price_tick: Decimal::new(1, 2),
            depth_levels: 5,
            shuffle_agent_order: false,
            force_sequential: false,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigurationError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Add an agent spec (builder pattern)
    pub fn with_agent_spec(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    /// Add a seed order (builder pattern)
    pub fn with_seed_order(mut self, side: Side, price: Price, quantity: Quantity) -> Self {
        self.seed_orders.push(SeedOrder {
            side,
            price,
            quantity,
        });
        self
    }

    /// Total number of agents across all specs
    pub fn agent_count(&self) -> usize {
        self.agents.iter().map(|s| s.count).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.agents.is_empty() {
            return Err(ConfigurationError::NoAgents);
        }
        self.validate_run()?;
        self.validate_agents()
    }

    /// Horizon, price grid and seed orders
    pub(crate) fn validate_run(&self) -> Result<(), ConfigurationError> {
        if self.horizon == 0 {
            return Err(ConfigurationError::ZeroHorizon);
        }
        if self.price_tick <= Decimal::ZERO {
            return Err(ConfigurationError::InvalidPriceTick);
        }
        self.validate_seed_orders()
    }

    pub(crate) fn validate_agents(&self) -> Result<(), ConfigurationError> {
        for (index, spec) in self.agents.iter().enumerate() {
            if spec.count == 0 {
                return Err(ConfigurationError::ZeroCount { index });
            }
            spec.kind
                .validate()
                .map_err(|e| ConfigurationError::InvalidParameter {
                    agent_type: spec.kind.type_name(),
                    name: e.name,
                    reason: e.reason,
                })?;
        }
        Ok(())
    }

    fn validate_seed_orders(&self) -> Result<(), ConfigurationError> {
        for (index, order) in self.seed_orders.iter().enumerate() {
            if order.quantity == 0 {
                return Err(ConfigurationError::InvalidSeedOrder {
                    index,
                    reason: "quantity must be positive".to_string(),
                });
            }
            if order.price <= Decimal::ZERO {
                return Err(ConfigurationError::InvalidSeedOrder {
                    index,
                    reason: "price must be positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agents::{MarketMakerConfig, NoiseTraderConfig};
    use rust_decimal_macros::dec;

    fn valid() -> SimulationConfig {
        SimulationConfig {
            horizon: 10,
            ..Default::default()
        }
        .with_agent_spec(AgentSpec::new(AgentKind::Noise(NoiseTraderConfig::default()), 3))
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "horizon": 50,
            "seed": 7,
            "price_tick": "0.05",
            "agents": [
                {"type": "noise", "count": 10, "act_probability": 0.3, "initial_capital": "10000"},
                {"type": "market_maker", "half_spread": 0.25, "initial_position": 5}
            ],
            "seed_orders": [
                {"side": "buy", "price": "99.5", "quantity": 100},
                {"side": "sell", "price": 100.5, "quantity": 100}
            ]
        }"#;

        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.horizon, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.price_tick, dec!(0.05));
        assert_eq!(config.depth_levels, 5);
        assert_eq!(config.agent_count(), 11);

        let noise = &config.agents[0];
        assert_eq!(noise.initial_capital, dec!(10000));
        let AgentKind::Noise(params) = &noise.kind else {
            panic!("expected noise spec");
        };
        assert_eq!(params.act_probability, 0.3);
        assert_eq!(params.max_quantity, NoiseTraderConfig::default().max_quantity);

        let mm = &config.agents[1];
        assert_eq!(mm.count, 1);
        assert_eq!(mm.initial_position, 5);
        assert!(
            matches!(&mm.kind, AgentKind::MarketMaker(MarketMakerConfig { half_spread, .. }) if *half_spread == dec!(0.25))
        );

        assert_eq!(config.seed_orders[1].price, dec!(100.5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SimulationConfig::from_json("{ not json"),
            Err(ConfigurationError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{"agents": [{"type": "whale"}]}"#),
            Err(ConfigurationError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_file("/nonexistent/agora.json"),
            Err(ConfigurationError::Io { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = valid().with_seed_order(Side::Sell, dec!(101), 5);
        let parsed = SimulationConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation() {
        assert_eq!(valid().validate(), Ok(()));

        assert_eq!(
            SimulationConfig::default().validate(),
            Err(ConfigurationError::NoAgents)
        );

        let config = SimulationConfig {
            horizon: 0,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::ZeroHorizon));
        assert_eq!(
            ConfigurationError::ZeroHorizon.to_string(),
            "horizon must be at least one tick; empty runs are rejected"
        );

        let config = SimulationConfig {
            price_tick: Decimal::ZERO,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::InvalidPriceTick));

        let config = valid().with_agent_spec(AgentSpec::new(
            AgentKind::Noise(NoiseTraderConfig::default()),
            0,
        ));
        assert_eq!(config.validate(), Err(ConfigurationError::ZeroCount { index: 1 }));

        let config = valid().with_agent_spec(AgentSpec::new(
            AgentKind::Noise(NoiseTraderConfig {
                act_probability: 2.0,
                ..Default::default()
            }),
            1,
        ));
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter {
                agent_type: "noise",
                name: "act_probability",
                ..
            })
        ));

        let config = valid().with_seed_order(Side::Buy, dec!(-1), 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidSeedOrder { index: 0, .. })
        ));
    }
}
