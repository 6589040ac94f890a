//! Fundamentalist Agent
//!
//! Trades toward a private valuation of the asset.
//! Role: Anchors prices, absorbs mispricing.
//!
//! Strategy:
//! - Draw a private value once around the common fundamental
//! - Buy at the ask when it is cheap relative to that value
//! - Sell at the bid when it is rich

use agora_core::{AgentId, OrderIntent, Price, Quantity, Side, Tick, round_to_tick};
use rand::prelude::*;
use rand_distr::Normal;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::agent::{check_non_negative, within_limit};
use super::{Agent, AgentView, MarketState, ParameterError};

/// Configuration for fundamentalist trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalistConfig {
    /// Common fundamental value all fundamentalists start from
    pub fundamental_value: Price,
    /// Std dev of the private value, as a fraction of the fundamental
    pub value_dispersion: f64,
    /// Required mispricing (fraction of value) before trading
    pub threshold: f64,
    pub order_size: Quantity,
    /// Maximum absolute position
    pub max_position: i64,
}

impl Default for FundamentalistConfig {
    fn default() -> Self {
        Self {
            fundamental_value: Decimal::ONE_HUNDRED,
            value_dispersion: 0.02,
            threshold: 0.01,
            order_size: 5,
            max_position: 50,
        }
    }
}

impl FundamentalistConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.fundamental_value <= Decimal::ZERO {
            return Err(ParameterError::new("fundamental_value", "must be positive"));
        }
        check_non_negative("value_dispersion", self.value_dispersion)?;
        check_non_negative("threshold", self.threshold)?;
        if self.threshold >= 1.0 {
            return Err(ParameterError::new("threshold", "must be below 1"));
        }
        if self.order_size == 0 {
            return Err(ParameterError::new("order_size", "must be positive"));
        }
        if self.max_position < 0 {
            return Err(ParameterError::new("max_position", "must not be negative"));
        }
        Ok(())
    }
}

/// Fundamentalist trader agent
pub struct Fundamentalist {
    id: AgentId,
    config: FundamentalistConfig,
    valuation: Price,
    lower: Price,
    upper: Price,
}

impl Fundamentalist {
    pub fn new(
        id: AgentId,
        config: FundamentalistConfig,
        seed: u64,
    ) -> Result<Self, ParameterError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let dispersion = Normal::new(0.0, config.value_dispersion)
            .map_err(|e| ParameterError::new("value_dispersion", e.to_string()))?;

        let drift = Decimal::from_f64(1.0 + dispersion.sample(&mut rng)).unwrap_or(Decimal::ONE);
        let valuation = (config.fundamental_value * drift).max(Decimal::new(1, 8));
        let band = Decimal::from_f64(config.threshold).unwrap_or(Decimal::ZERO);

        Ok(Self {
            id,
            valuation,
            lower: valuation * (Decimal::ONE - band),
            upper: valuation * (Decimal::ONE + band),
            config,
        })
    }

    /// Private value drawn at construction
    pub fn valuation(&self) -> Price {
        self.valuation
    }
}

impl Agent for Fundamentalist {
    fn id(&self) -> AgentId {
        self.id
    }

    fn agent_type(&self) -> &'static str {
        "fundamentalist"
    }

    fn decide(&mut self, own: &AgentView, market: &MarketState, _tick: Tick) -> Vec<OrderIntent> {
        // Stale marketable limits left over from last tick are withdrawn first
        let mut intents: Vec<OrderIntent> = own
            .open_orders
            .iter()
            .map(|id| OrderIntent::cancel(*id))
            .collect();

        let size = self.config.order_size;
        let position = own.position();

        if let Some(ask) = market.best_ask {
            if ask.price < self.lower
                && within_limit(position, Side::Buy, size, self.config.max_position)
            {
                let price = round_to_tick(ask.price, market.price_tick);
                intents.push(OrderIntent::limit_buy(price, size));
                return intents;
            }
        }

        if let Some(bid) = market.best_bid {
            if bid.price > self.upper
                && within_limit(position, Side::Sell, size, self.config.max_position)
            {
                let price = round_to_tick(bid.price, market.price_tick);
                intents.push(OrderIntent::limit_sell(price, size));
            }
        }

        intents
    }
}
