//! Agent Trait
//!
//! Core capability every trading agent implements, plus the private view the
//! scheduler hands to each agent.

use agora_core::{
    AgentId, OrderId, OrderIntent, Price, Quantity, Side, Tick, TradeId, checked_notional,
};
use agora_ports::MatchingError;
use serde::Serialize;
use thiserror::Error;

use super::MarketState;

/// Capital and inventory of one agent, maintained by the scheduler only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgentAccount {
    pub capital: Price,
    /// Signed share inventory (positive = long)
    pub position: i64,
}

impl AgentAccount {
    pub fn new(capital: Price, position: i64) -> Self {
        Self { capital, position }
    }

    /// Apply one execution from this agent's side
    ///
    /// The account is left untouched when either balance would overflow.
    pub fn apply(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), AccountOverflow> {
        let overflow = AccountOverflow {
            side,
            price,
            quantity,
        };
        let shares = i64::try_from(quantity).map_err(|_| overflow)?;
        let notional = checked_notional(price, quantity).ok_or(overflow)?;
        let (position, capital) = match side {
            Side::Buy => (
                self.position.checked_add(shares),
                self.capital.checked_sub(notional),
            ),
            Side::Sell => (
                self.position.checked_sub(shares),
                self.capital.checked_add(notional),
            ),
        };
        let (Some(position), Some(capital)) = (position, capital) else {
            return Err(overflow);
        };
        self.position = position;
        self.capital = capital;
        Ok(())
    }
}

/// An execution that would push an account outside its numeric range
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{side:?} {quantity} @ {price} overflows the account")]
pub struct AccountOverflow {
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Fill notification for one of the agent's orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fill {
    pub trade_id: TradeId,
    pub order_id: OrderId,
    pub tick: Tick,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    /// True when the agent's order was resting (maker)
    pub is_maker: bool,
}

impl Fill {
    /// Signed quantity (positive = bought, negative = sold)
    pub fn signed_qty(&self) -> i64 {
        self.side.sign() * i64::try_from(self.quantity).unwrap_or(i64::MAX)
    }
}

/// One of the agent's intents that the engine refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionNotice {
    pub tick: Tick,
    pub tick_sequence: u32,
    pub intent: OrderIntent,
    pub error: MatchingError,
}

/// Everything an agent may know about itself when deciding
///
/// Notices cover the period since the agent's previous decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentView {
    pub agent_id: AgentId,
    pub account: AgentAccount,
    /// Resting orders in id order
    pub open_orders: Vec<OrderId>,
    pub fills: Vec<Fill>,
    pub rejections: Vec<RejectionNotice>,
}

impl AgentView {
    pub fn new(agent_id: AgentId, account: AgentAccount) -> Self {
        Self {
            agent_id,
            account,
            ..Default::default()
        }
    }

    pub fn position(&self) -> i64 {
        self.account.position
    }

    pub fn capital(&self) -> Price {
        self.account.capital
    }
}

/// Invalid agent parameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {reason}")]
pub struct ParameterError {
    pub name: &'static str,
    pub reason: String,
}

impl ParameterError {
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

/// Check that a probability lies in [0, 1]
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::new(name, format!("{value} is not within [0, 1]")))
    }
}

/// Whether trading `size` on `side` keeps `|position|` within `limit`
pub(crate) fn within_limit(position: i64, side: Side, size: Quantity, limit: i64) -> bool {
    let Ok(size) = i64::try_from(size) else {
        return false;
    };
    match side {
        Side::Buy => position.checked_add(size).is_some_and(|p| p <= limit),
        Side::Sell => position.checked_sub(size).is_some_and(|p| p >= -limit),
    }
}

/// Check that a float parameter is finite and not negative
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::new(name, format!("{value} must be finite and >= 0")))
    }
}

/// Core trait for all agents
///
/// Agents observe the tick's market snapshot and their own view, and return
/// intents. They never touch the book and never update their own account;
/// the scheduler does both after matching.
pub trait Agent: Send + Sync {
    /// Get agent's unique identifier
    fn id(&self) -> AgentId;

    /// Get agent type name (for logging and reports)
    fn agent_type(&self) -> &'static str;

    /// Called once per tick, in the scheduler's fixed agent order
    ///
    /// Returns intents in the order they should be submitted.
    fn decide(&mut self, own: &AgentView, market: &MarketState, tick: Tick) -> Vec<OrderIntent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_apply() {
        let mut account = AgentAccount::new(dec!(1000), 0);
        account.apply(Side::Buy, dec!(10), 5).unwrap();
        assert_eq!(account, AgentAccount::new(dec!(950), 5));

        account.apply(Side::Sell, dec!(12), 8).unwrap();
        assert_eq!(account, AgentAccount::new(dec!(1046), -3));
    }

    #[test]
    fn test_account_apply_rejects_overflow() {
        let mut account = AgentAccount::new(dec!(0), 0);
        let result = account.apply(Side::Buy, dec!(1), u64::MAX);
        assert!(result.is_err());
        assert_eq!(account, AgentAccount::new(dec!(0), 0));

        let mut long = AgentAccount::new(dec!(0), i64::MAX - 1);
        assert!(long.apply(Side::Buy, dec!(1), 2).is_err());
        assert_eq!(long.position, i64::MAX - 1);

        let mut rich = AgentAccount::new(rust_decimal::Decimal::MAX, 0);
        assert!(rich.apply(Side::Sell, dec!(1000), 1000).is_err());
        assert_eq!(rich.capital, rust_decimal::Decimal::MAX);
        assert_eq!(rich.position, 0);
    }

    #[test]
    fn test_within_limit() {
        assert!(within_limit(10, Side::Buy, 5, 15));
        assert!(!within_limit(11, Side::Buy, 5, 15));
        assert!(within_limit(-10, Side::Sell, 5, 15));
        assert!(!within_limit(0, Side::Buy, u64::MAX, i64::MAX));
        assert!(!within_limit(i64::MIN + 1, Side::Sell, 5, i64::MAX));
    }

    #[test]
    fn test_fill_signed_qty() {
        let fill = Fill {
            trade_id: TradeId(1),
            order_id: OrderId(3),
            tick: 0,
            side: Side::Sell,
            price: dec!(10),
            quantity: 7,
            is_maker: true,
        };
        assert_eq!(fill.signed_qty(), -7);

        let huge = Fill {
            side: Side::Buy,
            quantity: u64::MAX,
            ..fill
        };
        assert!(huge.signed_qty() > 0);
    }

    #[test]
    fn test_parameter_checks() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.5).is_err());
        assert!(check_non_negative("sigma", f64::NAN).is_err());
        assert_eq!(
            check_non_negative("sigma", -1.0).unwrap_err().name,
            "sigma"
        );
    }
}
