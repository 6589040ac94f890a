//! Momentum Trader Agent
//!
//! Profits from trend continuation.
//! Role: Amplifies trends, creates feedback loops.
//!
//! Strategy:
//! - Track price changes over a lookback window
//! - If trending up strongly, buy (bet trend continues)
//! - If trending down strongly, sell

use agora_core::{AgentId, OrderIntent, Price, Quantity, Side, Tick};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::agent::{check_non_negative, within_limit};
use super::{Agent, AgentView, MarketState, ParameterError};

/// Configuration for momentum trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Lookback window (number of ticks)
    pub lookback: usize,
    /// Minimum price change (in bps) to trigger trade
    pub threshold_bps: f64,
    pub order_size: Quantity,
    /// Maximum absolute position
    pub max_position: i64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            threshold_bps: 10.0, // 10 bps move triggers trade
            order_size: 5,
            max_position: 50,
        }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.lookback == 0 {
            return Err(ParameterError::new("lookback", "must be at least 1"));
        }
        check_non_negative("threshold_bps", self.threshold_bps)?;
        if self.order_size == 0 {
            return Err(ParameterError::new("order_size", "must be positive"));
        }
        if self.max_position < 0 {
            return Err(ParameterError::new("max_position", "must not be negative"));
        }
        Ok(())
    }
}

/// Momentum trader agent
pub struct MomentumTrader {
    id: AgentId,
    config: MomentumConfig,
    price_history: VecDeque<Price>,
}

impl MomentumTrader {
    pub fn new(id: AgentId, config: MomentumConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        Ok(Self {
            id,
            price_history: VecDeque::with_capacity(config.lookback + 1),
            config,
        })
    }

    /// Calculate momentum signal
    /// Returns price change in bps over lookback period
    fn momentum_signal(&self) -> Option<f64> {
        if self.price_history.len() <= self.config.lookback {
            return None;
        }

        let current = self.price_history.back()?.to_f64()?;
        let old = self.price_history.front()?.to_f64()?;

        if old == 0.0 {
            return None;
        }

        Some((current - old) / old * 10_000.0)
    }
}

impl Agent for MomentumTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn agent_type(&self) -> &'static str {
        "momentum"
    }

    fn decide(&mut self, own: &AgentView, market: &MarketState, _tick: Tick) -> Vec<OrderIntent> {
        // Last trade, else mid
        let Some(price) = market.last_price().or_else(|| market.mid_price()) else {
            return Vec::new();
        };
        self.price_history.push_back(price);
        if self.price_history.len() > self.config.lookback + 1 {
            self.price_history.pop_front();
        }

        // Calculate momentum
        let Some(momentum) = self.momentum_signal() else {
            return Vec::new();
        };

        let size = self.config.order_size;
        let position = own.position();

        // Strong upward momentum - buy
        if momentum > self.config.threshold_bps
            && within_limit(position, Side::Buy, size, self.config.max_position)
        {
            return vec![OrderIntent::market_buy(size)];
        }

        // Strong downward momentum - sell
        if momentum < -self.config.threshold_bps
            && within_limit(position, Side::Sell, size, self.config.max_position)
        {
            return vec![OrderIntent::market_sell(size)];
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Side;
    use agora_matching::PriceLevel;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn create_state_at_price(price: Price) -> MarketState {
        let mut state = MarketState::empty(0, dec!(0.01));
        let offset = price / dec!(200); // 0.5% spread
        state.best_bid = Some(PriceLevel {
            price: price - offset,
            quantity: 100,
            orders: 1,
        });
        state.best_ask = Some(PriceLevel {
            price: price + offset,
            quantity: 100,
            orders: 1,
        });
        state
    }

    fn trader(lookback: usize) -> MomentumTrader {
        let config = MomentumConfig {
            lookback,
            threshold_bps: 10.0,
            ..Default::default()
        };
        MomentumTrader::new(AgentId(3), config).unwrap()
    }

    #[test]
    fn test_needs_history_first() {
        let mut trader = trader(5);

        // Not enough history
        for _ in 0..5 {
            let state = create_state_at_price(dec!(500));
            assert!(trader.decide(&AgentView::default(), &state, 0).is_empty());
        }
    }

    #[test]
    fn test_buys_on_uptrend() {
        let mut trader = trader(5);
        let view = AgentView::default();

        // Build upward trend, 0.1% per tick = 50 bps over the window
        let base = dec!(500);
        for i in 0..5 {
            let price = base + Decimal::from(i) * base / dec!(1000);
            trader.decide(&view, &create_state_at_price(price), 0);
        }

        // Next tick should trigger buy
        let state = create_state_at_price(base + dec!(5) * base / dec!(1000));
        let intents = trader.decide(&view, &state, 0);

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].side(), Some(Side::Buy));
    }

    #[test]
    fn test_sells_on_downtrend() {
        let mut trader = trader(5);
        let view = AgentView::default();

        // Build downward trend
        let base = dec!(500);
        for i in 0..6 {
            let price = base - Decimal::from(i) * base / dec!(1000); // -0.1% per tick
            trader.decide(&view, &create_state_at_price(price), 0);
        }

        // Should be selling on downtrend
        let state = create_state_at_price(base - dec!(6) * base / dec!(1000));
        let intents = trader.decide(&view, &state, 0);

        assert_eq!(intents, vec![OrderIntent::market_sell(5)]);
    }

    #[test]
    fn test_no_trade_on_flat() {
        let mut trader = trader(5);

        // Flat prices
        for _ in 0..10 {
            let state = create_state_at_price(dec!(500));
            assert!(trader.decide(&AgentView::default(), &state, 0).is_empty());
        }
    }

    #[test]
    fn test_position_limit_blocks_buys() {
        let mut trader = trader(2);
        let mut view = AgentView::default();
        view.account.position = 50;

        for price in [dec!(100), dec!(101), dec!(102), dec!(103)] {
            assert!(trader.decide(&view, &create_state_at_price(price), 0).is_empty());
        }
    }

    #[test]
    fn test_prefers_last_trade_over_mid() {
        use crate::application::agents::LastTrade;

        let mut trader = trader(1);
        let view = AgentView::default();
        let mut state = create_state_at_price(dec!(100));
        state.last_trade = Some(LastTrade {
            price: dec!(100),
            quantity: 1,
            tick: 0,
        });
        trader.decide(&view, &state, 0);

        // Mid unchanged, last trade up 1%
        state.last_trade = Some(LastTrade {
            price: dec!(101),
            quantity: 1,
            tick: 1,
        });
        assert_eq!(trader.decide(&view, &state, 1), vec![OrderIntent::market_buy(5)]);
    }
}
