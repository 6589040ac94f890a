//! Agent-Based Model (ABM) for market simulation
//!
//! Heterogeneous trading agents interact through a single continuous limit
//! order book. A run is fully determined by its [`SimulationConfig`]: the same
//! configuration and seed reproduce the same trade tape.
//!
//! ```no_run
//! use agora_abm::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::from_file("sim.json")?;
//! let mut simulation = Simulation::new(config)?;
//! simulation.run();
//! let output = simulation.into_output();
//! println!("{} trades", output.trades.len());
//! # Ok::<(), agora_abm::ConfigurationError>(())
//! ```

pub mod application;

// Re-export key types at crate root
pub use application::agents::{
    Agent, AgentAccount, AgentKind, AgentView, Fill, MarketState, ParameterError,
};
pub use application::simulation::{
    AgentReport, AgentSpec, ConfigurationError, Rejection, SeedOrder, Simulation,
    SimulationConfig, SimulationOutput, SimulationState, StopHandle, TickSummary,
};
