//! Simulation Framework
//!
//! Drives a population of agents against one matching engine in discrete
//! ticks.
//!
//! # Tick phases
//!
//! 1. Snapshot the book into a [`MarketState`](crate::application::agents::MarketState)
//! 2. Every agent decides against that same snapshot (in parallel with the
//!    `parallel` feature)
//! 3. Intents are submitted serially in the fixed agent order
//! 4. New trades are settled into both counterparties' accounts
//! 5. A [`TickSummary`] is recorded

mod config;
mod output;
mod parallel;
mod scheduler;

pub use config::{AgentSpec, ConfigurationError, SeedOrder, SimulationConfig};
pub use output::{AgentReport, Rejection, SimulationOutput, TickSummary};
pub use scheduler::{Simulation, SimulationState, StopHandle};
