//! Noise Trader Agent
//!
//! A random trader that provides baseline volume.
//! Profit source: None (loses on average to spread and informed traders)
//! Role: Creates liquidity, provides counterparty

use agora_core::{AgentId, OrderIntent, Price, Quantity, Side, Tick, round_to_tick};
use rand::prelude::*;
use rand_distr::Normal;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::agent::{check_non_negative, check_probability};
use super::{Agent, AgentView, MarketState, ParameterError};

/// Configuration for noise trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTraderConfig {
    /// Probability of acting each tick (0-1)
    pub act_probability: f64,
    /// Probability that an action is a market order rather than a limit
    pub market_order_probability: f64,
    /// Std dev of the limit price offset, as a fraction of the reference
    pub price_sigma: f64,
    pub min_quantity: Quantity,
    pub max_quantity: Quantity,
    /// Used when the market has neither quotes nor trades
    pub reference_price: Price,
}

impl Default for NoiseTraderConfig {
    fn default() -> Self {
        Self {
            act_probability: 0.5,
            market_order_probability: 0.1,
            price_sigma: 0.01,
            min_quantity: 1,
            max_quantity: 10,
            reference_price: Decimal::ONE_HUNDRED,
        }
    }
}

impl NoiseTraderConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_probability("act_probability", self.act_probability)?;
        check_probability("market_order_probability", self.market_order_probability)?;
        check_non_negative("price_sigma", self.price_sigma)?;
        if self.min_quantity == 0 {
            return Err(ParameterError::new("min_quantity", "must be positive"));
        }
        if self.max_quantity < self.min_quantity {
            return Err(ParameterError::new(
                "max_quantity",
                format!("{} is below min_quantity {}", self.max_quantity, self.min_quantity),
            ));
        }
        if self.reference_price <= Decimal::ZERO {
            return Err(ParameterError::new("reference_price", "must be positive"));
        }
        Ok(())
    }
}

/// Noise trader agent
pub struct NoiseTrader {
    id: AgentId,
    config: NoiseTraderConfig,
    offset: Normal<f64>,
    rng: StdRng,
}

impl NoiseTrader {
    pub fn new(id: AgentId, config: NoiseTraderConfig, seed: u64) -> Result<Self, ParameterError> {
        config.validate()?;
        let offset = Normal::new(0.0, config.price_sigma)
            .map_err(|e| ParameterError::new("price_sigma", e.to_string()))?;

        Ok(Self {
            id,
            config,
            offset,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &NoiseTraderConfig {
        &self.config
    }

    fn limit_price(&mut self, market: &MarketState) -> Price {
        let reference = market
            .reference_price()
            .unwrap_or(self.config.reference_price);
        let shift = 1.0 + self.offset.sample(&mut self.rng);
        let factor = Decimal::from_f64(shift).unwrap_or(Decimal::ONE);
        round_to_tick(reference * factor, market.price_tick)
    }
}

impl Agent for NoiseTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn agent_type(&self) -> &'static str {
        "noise"
    }

    fn decide(&mut self, _own: &AgentView, market: &MarketState, _tick: Tick) -> Vec<OrderIntent> {
        // Random chance to trade
        if self.rng.r#gen::<f64>() >= self.config.act_probability {
            return Vec::new();
        }

        // Random buy or sell
        let side = if self.rng.r#gen::<bool>() {
            Side::Buy
        } else {
            Side::Sell
        };
        let quantity = self
            .rng
            .gen_range(self.config.min_quantity..=self.config.max_quantity);

        if self.rng.r#gen::<f64>() < self.config.market_order_probability {
            return vec![OrderIntent::Market { side, quantity }];
        }

        let price = self.limit_price(market);
        vec![OrderIntent::Limit {
            side,
            price,
            quantity,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_matching::PriceLevel;
    use rust_decimal_macros::dec;

    fn create_test_state() -> MarketState {
        let mut state = MarketState::empty(0, dec!(0.01));
        state.best_bid = Some(PriceLevel {
            price: dec!(99.9),
            quantity: 100,
            orders: 1,
        });
        state.best_ask = Some(PriceLevel {
            price: dec!(100.1),
            quantity: 100,
            orders: 1,
        });
        state
    }

    fn trader(config: NoiseTraderConfig, seed: u64) -> NoiseTrader {
        NoiseTrader::new(AgentId(1), config, seed).unwrap()
    }

    #[test]
    fn test_noise_trader_always_trades() {
        let config = NoiseTraderConfig {
            act_probability: 1.0,
            market_order_probability: 0.0,
            ..Default::default()
        };
        let mut trader = trader(config, 42);
        let state = create_test_state();
        let view = AgentView::default();

        for tick in 0..50 {
            let intents = trader.decide(&view, &state, tick);
            assert_eq!(intents.len(), 1);
            let OrderIntent::Limit {
                price, quantity, ..
            } = intents[0]
            else {
                panic!("expected a limit order");
            };
            assert!(price > Decimal::ZERO);
            assert_eq!(price, price.round_dp(2));
            assert!((1..=10).contains(&quantity));
        }
    }

    #[test]
    fn test_noise_trader_no_trade_when_probability_zero() {
        let config = NoiseTraderConfig {
            act_probability: 0.0,
            ..Default::default()
        };
        let mut trader = trader(config, 42);
        let state = create_test_state();

        for tick in 0..100 {
            assert!(trader.decide(&AgentView::default(), &state, tick).is_empty());
        }
    }

    #[test]
    fn test_noise_trader_market_orders() {
        let config = NoiseTraderConfig {
            act_probability: 1.0,
            market_order_probability: 1.0,
            min_quantity: 3,
            max_quantity: 3,
            ..Default::default()
        };
        let mut trader = trader(config, 7);

        let intents = trader.decide(&AgentView::default(), &create_test_state(), 0);
        assert!(matches!(intents[..], [OrderIntent::Market { quantity: 3, .. }]));
    }

    #[test]
    fn test_uses_configured_reference_on_empty_book() {
        let config = NoiseTraderConfig {
            act_probability: 1.0,
            market_order_probability: 0.0,
            price_sigma: 0.0,
            reference_price: dec!(42),
            ..Default::default()
        };
        let mut trader = trader(config, 1);
        let state = MarketState::empty(0, dec!(0.5));

        let intents = trader.decide(&AgentView::default(), &state, 0);
        assert!(matches!(intents[..], [OrderIntent::Limit { price, .. }] if price == dec!(42)));
    }

    #[test]
    fn test_noise_trader_deterministic() {
        let config = NoiseTraderConfig::default();
        let mut trader1 = trader(config.clone(), 12345);
        let mut trader2 = trader(config, 12345);
        let state = create_test_state();
        let view = AgentView::default();

        // Both should make same decisions
        for tick in 0..20 {
            assert_eq!(
                trader1.decide(&view, &state, tick),
                trader2.decide(&view, &state, tick)
            );
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = NoiseTraderConfig {
            min_quantity: 5,
            max_quantity: 2,
            ..Default::default()
        };
        assert_eq!(
            NoiseTrader::new(AgentId(1), config, 0).err().map(|e| e.name),
            Some("max_quantity")
        );
    }
}
