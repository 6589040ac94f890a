//! Mixed agent population on a seeded book
//!
//! Run with `RUST_LOG=info cargo run -p agora-abm --example simple_sim`.

use agora_abm::application::agents::{
    FundamentalistConfig, MarketMakerConfig, MomentumConfig, NoiseTraderConfig,
};
use agora_abm::{AgentKind, AgentSpec, ConfigurationError, Simulation, SimulationConfig};
use agora_core::Side;
use rust_decimal_macros::dec;

fn main() -> Result<(), ConfigurationError> {
    env_logger::init();

    let config = SimulationConfig {
        horizon: 500,
        seed: 42,
        ..Default::default()
    }
    .with_seed_order(Side::Buy, dec!(99.5), 100)
    .with_seed_order(Side::Sell, dec!(100.5), 100)
    .with_agent_spec(
        AgentSpec::new(AgentKind::Noise(NoiseTraderConfig::default()), 50)
            .with_capital(dec!(10000)),
    )
    .with_agent_spec(
        AgentSpec::new(AgentKind::MarketMaker(MarketMakerConfig::default()), 2)
            .with_capital(dec!(100000)),
    )
    .with_agent_spec(AgentSpec::new(
        AgentKind::Fundamentalist(FundamentalistConfig::default()),
        10,
    ))
    .with_agent_spec(AgentSpec::new(
        AgentKind::Momentum(MomentumConfig::default()),
        5,
    ));

    println!("=== Agora Simulation ===\n");
    println!("Agents:  {}", config.agent_count());
    println!("Horizon: {} ticks\n", config.horizon);

    let mut simulation = Simulation::new(config)?;
    simulation.run();
    println!("Final book:\n{}", simulation.book());

    let output = simulation.into_output();

    println!("=== Results ===");
    println!("Trades:     {}", output.trades.len());
    println!("Volume:     {}", output.total_volume());
    println!("Rejections: {}", output.rejections.len());
    if let Some(last) = output.trades.last() {
        println!("Last price: {}", last.price);
    }

    println!("\nBy agent type:");
    let mut types: Vec<&str> = output.agents.iter().map(|a| a.agent_type.as_str()).collect();
    types.dedup();
    for agent_type in types {
        let reports: Vec<_> = output
            .agents
            .iter()
            .filter(|a| a.agent_type == agent_type)
            .collect();
        let position: i64 = reports.iter().map(|a| a.position).sum();
        let fills: u64 = reports.iter().map(|a| a.fills).sum();
        println!(
            "  {:<15} n={:<3} fills={:<6} net position={}",
            agent_type,
            reports.len(),
            fills,
            position
        );
    }

    Ok(())
}
