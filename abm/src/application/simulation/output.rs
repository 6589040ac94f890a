//! Simulation Outputs
//!
//! Records produced by a run for external analysis. Nothing here performs
//! I/O; every type serializes with serde.

use agora_core::{AgentId, OrderIntent, Price, Quantity, Tick, Trade};
use agora_ports::MatchingError;
use serde::Serialize;

/// An intent the engine refused, attributable to its tick and sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub tick: Tick,
    pub tick_sequence: u32,
    pub agent_id: AgentId,
    pub intent: OrderIntent,
    pub error: MatchingError,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick: Tick,
    /// Top of book after the tick's submissions
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub last_price: Option<Price>,
    /// Number of trades executed this tick; tick 0 also counts trades
    /// between crossing seed orders
    pub trade_count: usize,
    /// Total volume traded this tick
    pub volume: Quantity,
    /// Number of intents submitted this tick
    pub submissions: usize,
    pub rejections: usize,
}

/// Final state of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    pub agent_id: AgentId,
    pub agent_type: String,
    pub capital: Price,
    pub position: i64,
    pub orders_submitted: u64,
    pub fills: u64,
    pub rejections: u64,
}

/// Everything a finished (or stopped) run produced
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutput {
    /// Trade tape in execution order
    pub trades: Vec<Trade>,
    /// One summary per processed tick
    pub ticks: Vec<TickSummary>,
    /// Agents in id order
    pub agents: Vec<AgentReport>,
    /// Account owning the seed orders
    pub house: AgentReport,
    pub rejections: Vec<Rejection>,
}

impl SimulationOutput {
    /// Total traded quantity
    pub fn total_volume(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    /// Sum of positions over every account, house included
    pub fn net_position(&self) -> i64 {
        self.agents.iter().map(|a| a.position).sum::<i64>() + self.house.position
    }

    /// Sum of capital over every account, house included
    pub fn net_capital(&self) -> Price {
        self.agents.iter().map(|a| a.capital).sum::<Price>() + self.house.capital
    }

    /// Trade tape as JSON
    pub fn trades_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.trades)
    }
}
