use serde::{Deserialize, Serialize};

/// Order types supported by the simulated venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute against whatever opposing liquidity exists; never rests
    Market,
    /// Execute at the limit price or better; the remainder rests
    Limit,
}
