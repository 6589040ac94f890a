//! Market Maker Agent
//!
//! Quotes both sides around the reference price and leans against its
//! inventory.
//!
//! Each tick the maker withdraws its previous quotes and posts a fresh pair:
//! - center = reference - position * inventory_skew
//! - bid = center - half_spread, ask = center + half_spread (on the price grid)
//! - a side is skipped when filling it would push |position| past max_inventory

use agora_core::{AgentId, OrderIntent, Price, Quantity, Side, Tick, round_to_tick};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::agent::within_limit;
use super::{Agent, AgentView, MarketState, ParameterError};

/// Configuration for the market maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMakerConfig {
    /// Distance from center to each quote, in price units
    pub half_spread: Price,
    /// Quote size per side
    pub quote_size: Quantity,
    /// Center shift per unit of inventory, in price units
    pub inventory_skew: Price,
    /// Maximum absolute inventory
    pub max_inventory: i64,
    /// Used when the market has neither quotes nor trades
    pub reference_price: Price,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            half_spread: Decimal::new(5, 1),
            quote_size: 10,
            inventory_skew: Decimal::new(1, 2),
            max_inventory: 100,
            reference_price: Decimal::ONE_HUNDRED,
        }
    }
}

impl MarketMakerConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.half_spread <= Decimal::ZERO {
            return Err(ParameterError::new("half_spread", "must be positive"));
        }
        if self.quote_size == 0 {
            return Err(ParameterError::new("quote_size", "must be positive"));
        }
        if self.inventory_skew < Decimal::ZERO {
            return Err(ParameterError::new("inventory_skew", "must not be negative"));
        }
        if self.max_inventory < 0 {
            return Err(ParameterError::new("max_inventory", "must not be negative"));
        }
        if self.reference_price <= Decimal::ZERO {
            return Err(ParameterError::new("reference_price", "must be positive"));
        }
        Ok(())
    }

    /// Set max inventory (builder pattern)
    pub fn with_max_inventory(mut self, max: i64) -> Self {
        self.max_inventory = max;
        self
    }

    /// Set quote size (builder pattern)
    pub fn with_quote_size(mut self, size: Quantity) -> Self {
        self.quote_size = size;
        self
    }
}

/// Two-sided quoting agent
pub struct MarketMaker {
    id: AgentId,
    config: MarketMakerConfig,
}

impl MarketMaker {
    pub fn new(id: AgentId, config: MarketMakerConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        Ok(Self { id, config })
    }

    /// Bid and ask for the given reference and inventory, on the price grid
    pub fn quotes(&self, reference: Price, position: i64, price_tick: Price) -> (Price, Price) {
        let center = reference - Decimal::from(position) * self.config.inventory_skew;
        let bid = round_to_tick(center - self.config.half_spread, price_tick);
        let mut ask = round_to_tick(center + self.config.half_spread, price_tick);
        if ask <= bid {
            ask = bid + price_tick.max(Decimal::new(1, 8));
        }
        (bid, ask)
    }
}

impl Agent for MarketMaker {
    fn id(&self) -> AgentId {
        self.id
    }

    fn agent_type(&self) -> &'static str {
        "market_maker"
    }

    fn decide(&mut self, own: &AgentView, market: &MarketState, _tick: Tick) -> Vec<OrderIntent> {
        let mut intents: Vec<OrderIntent> = own
            .open_orders
            .iter()
            .map(|id| OrderIntent::cancel(*id))
            .collect();

        let reference = market
            .reference_price()
            .unwrap_or(self.config.reference_price);
        let position = own.position();
        let (bid, ask) = self.quotes(reference, position, market.price_tick);

        let size = self.config.quote_size;
        if within_limit(position, Side::Buy, size, self.config.max_inventory) {
            intents.push(OrderIntent::limit_buy(bid, size));
        }
        if within_limit(position, Side::Sell, size, self.config.max_inventory) {
            intents.push(OrderIntent::limit_sell(ask, size));
        }

        intents
    }
}
