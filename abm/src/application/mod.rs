//! Application layer: agents and the simulation that coordinates them
//!
//! Contains:
//! - **agents**: Trader archetypes and the view they decide on
//! - **simulation**: Configuration, the tick scheduler and run outputs

pub mod agents;
pub mod simulation;
