use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an accepted order (monotonic, starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

/// Unique identifier for a trade (monotonic, starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub u64);

/// Identifier of a trading agent
///
/// `AgentId::HOUSE` owns the seed liquidity placed before the first tick;
/// configured agents are numbered from 1.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    pub const HOUSE: AgentId = AgentId(0);

    pub fn is_house(&self) -> bool {
        *self == Self::HOUSE
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.0)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_house() {
            write!(f, "house")
        } else {
            write!(f, "agent-{}", self.0)
        }
    }
}
