//! Simulation Scheduler
//!
//! The phased tick loop: snapshot, decide, submit, settle, summarize.

use agora_core::{AgentId, OrderId, OrderIntent, Quantity, Side, Tick};
use agora_matching::{MatchingEngine, MatchingError, OrderBook, SubmitOutcome, Submission, TradeTape};
use log::{debug, info, warn};
use rand::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::output::{AgentReport, Rejection, SimulationOutput, TickSummary};
use super::parallel;
use super::{ConfigurationError, SimulationConfig};
use crate::application::agents::{
    Agent, AgentAccount, AgentView, Fill, MarketState, RejectionNotice,
};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SimulationState {
    Initialized,
    /// `tick` is the next tick to be processed
    Running { tick: Tick },
    Finished,
}

/// Cooperative stop flag, checked between ticks only
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scheduler-side bookkeeping for one account
#[derive(Debug, Default)]
struct Ledger {
    view: AgentView,
    orders_submitted: u64,
    fills: u64,
    rejections: u64,
}

impl Ledger {
    fn new(agent_id: AgentId, account: AgentAccount) -> Self {
        Self {
            view: AgentView::new(agent_id, account),
            ..Default::default()
        }
    }

    fn report(&self, agent_type: &str) -> AgentReport {
        AgentReport {
            agent_id: self.view.agent_id,
            agent_type: agent_type.to_string(),
            capital: self.view.account.capital,
            position: self.view.account.position,
            orders_submitted: self.orders_submitted,
            fills: self.fills,
            rejections: self.rejections,
        }
    }
}

struct AgentSlot {
    agent: Box<dyn Agent>,
    ledger: Ledger,
}

impl AgentSlot {
    /// Run the agent's decision and consume its pending notices
    fn decide(&mut self, market: &MarketState, tick: Tick) -> Vec<OrderIntent> {
        let intents = self.agent.decide(&self.ledger.view, market, tick);
        self.ledger.view.fills.clear();
        self.ledger.view.rejections.clear();
        intents
    }
}

fn ledger_for<'a>(
    slots: &'a mut [AgentSlot],
    house: &'a mut Ledger,
    index: &HashMap<AgentId, usize>,
    agent_id: AgentId,
) -> Option<&'a mut Ledger> {
    if agent_id.is_house() {
        return Some(house);
    }
    let i = *index.get(&agent_id)?;
    slots.get_mut(i).map(|slot| &mut slot.ledger)
}

/// Deterministic discrete-tick market simulation
///
/// Owns the matching engine and every agent. All randomness derives from the
/// configured seed, so equal configurations produce identical outputs.
pub struct Simulation {
    config: SimulationConfig,
    engine: MatchingEngine,
    /// Agents in their fixed per-tick order
    slots: Vec<AgentSlot>,
    index: HashMap<AgentId, usize>,
    house: Ledger,
    state: SimulationState,
    ticks: Vec<TickSummary>,
    rejections: Vec<Rejection>,
    /// Tape position the next summary counts from; seed trades land in tick 0
    summarized: usize,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("agents", &self.slots.len())
            .field("engine", &self.engine)
            .finish()
    }
}

impl Simulation {
    /// Validate the configuration and build every configured agent
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Self::with_agents(config, Vec::new())
    }

    /// Build from configuration plus caller-supplied agents
    ///
    /// Configured agents receive ids `1..=N` and come first; custom agents
    /// follow in the given order and keep their own ids, which must not
    /// collide with the house or any other agent.
    pub fn with_agents(
        config: SimulationConfig,
        custom: Vec<Box<dyn Agent>>,
    ) -> Result<Self, ConfigurationError> {
        if config.agents.is_empty() && custom.is_empty() {
            return Err(ConfigurationError::NoAgents);
        }
        config.validate_run()?;
        config.validate_agents()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut slots = Vec::with_capacity(config.agent_count() + custom.len());

        let mut next_id = 1u32;
        for spec in &config.agents {
            for _ in 0..spec.count {
                let id = AgentId(next_id);
                next_id += 1;
                let agent = spec
                    .kind
                    .build(id, rng.next_u64())
                    .map_err(|e| ConfigurationError::InvalidParameter {
                        agent_type: spec.kind.type_name(),
                        name: e.name,
                        reason: e.reason,
                    })?;
                let account = AgentAccount::new(spec.initial_capital, spec.initial_position);
                slots.push(AgentSlot {
                    agent,
                    ledger: Ledger::new(id, account),
                });
            }
        }
        for agent in custom {
            let id = agent.id();
            slots.push(AgentSlot {
                agent,
                ledger: Ledger::new(id, AgentAccount::default()),
            });
        }

        if config.shuffle_agent_order {
            slots.shuffle(&mut rng);
        }

        let mut index = HashMap::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            let id = slot.agent.id();
            if id.is_house() || index.insert(id, i).is_some() {
                return Err(ConfigurationError::DuplicateAgentId(id));
            }
        }

        let mut simulation = Self {
            engine: MatchingEngine::new(),
            slots,
            index,
            house: Ledger::new(AgentId::HOUSE, AgentAccount::default()),
            state: SimulationState::Initialized,
            ticks: Vec::with_capacity(config.horizon.min(1 << 20) as usize),
            rejections: Vec::new(),
            summarized: 0,
            config,
        };
        simulation.place_seed_orders()?;

        info!(
            "simulation ready: {} agents, {} seed orders, horizon {}, seed {}",
            simulation.slots.len(),
            simulation.config.seed_orders.len(),
            simulation.config.horizon,
            simulation.config.seed
        );
        Ok(simulation)
    }

    fn place_seed_orders(&mut self) -> Result<(), ConfigurationError> {
        let seeds = self.config.seed_orders.clone();
        let tape_start = self.engine.tape().len();

        for (index, seed) in seeds.into_iter().enumerate() {
            let intent = OrderIntent::Limit {
                side: seed.side,
                price: seed.price,
                quantity: seed.quantity,
            };
            let submission = Submission::new(AgentId::HOUSE, 0, index as u32, intent);
            self.house.orders_submitted += 1;
            match self.engine.submit(&submission) {
                Ok(SubmitOutcome::Placed(placement)) => {
                    if let Some(id) = placement.resting {
                        self.house.view.open_orders.push(id);
                    }
                }
                Ok(SubmitOutcome::Cancelled(_)) => {}
                Err(err) => {
                    return Err(ConfigurationError::InvalidSeedOrder {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        self.settle(tape_start);
        Ok(())
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SimulationState::Finished
    }

    /// Next tick to process
    pub fn current_tick(&self) -> Tick {
        self.ticks.len() as Tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn book(&self) -> &OrderBook {
        self.engine.book()
    }

    pub fn tape(&self) -> &TradeTape {
        self.engine.tape()
    }

    pub fn ticks(&self) -> &[TickSummary] {
        &self.ticks
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Agent ids in the fixed per-tick order
    pub fn agent_order(&self) -> Vec<AgentId> {
        self.slots.iter().map(|slot| slot.agent.id()).collect()
    }

    /// Current account of an agent, or of the house for `AgentId::HOUSE`
    pub fn account(&self, agent_id: AgentId) -> Option<AgentAccount> {
        if agent_id.is_house() {
            return Some(self.house.view.account);
        }
        let i = *self.index.get(&agent_id)?;
        self.slots.get(i).map(|slot| slot.ledger.view.account)
    }

    /// Resting orders tracked for an agent
    pub fn open_orders(&self, agent_id: AgentId) -> Option<&[OrderId]> {
        if agent_id.is_house() {
            return Some(&self.house.view.open_orders);
        }
        let i = *self.index.get(&agent_id)?;
        self.slots
            .get(i)
            .map(|slot| slot.ledger.view.open_orders.as_slice())
    }

    /// Process one full tick. Returns `None` once the horizon is reached.
    pub fn step(&mut self) -> Option<&TickSummary> {
        let tick = match self.state {
            SimulationState::Finished => return None,
            SimulationState::Initialized => {
                info!("simulation started");
                0
            }
            SimulationState::Running { tick } => tick,
        };

        // 1. Snapshot
        let market = MarketState::capture(
            tick,
            self.engine.book(),
            self.engine.tape(),
            self.config.depth_levels,
            self.config.price_tick,
        );
        let tape_start = self.engine.tape().len();

        // 2. Decide
        let decisions = parallel::map_slice_mut(
            &mut self.slots,
            |slot| slot.decide(&market, tick),
            self.config.force_sequential,
        );

        // 3. Submit, in agent order
        let mut tick_sequence = 0u32;
        let mut rejected = 0usize;
        for (i, intents) in decisions.into_iter().enumerate() {
            let agent_id = self.slots[i].agent.id();
            for intent in intents {
                let submission = Submission::new(agent_id, tick, tick_sequence, intent);
                tick_sequence += 1;
                rejected += self.submit(i, submission);
            }
        }

        // 4. Settle
        self.settle(tape_start);

        // 5. Summarize
        let new_trades = self.engine.tape().since(self.summarized);
        let summary = TickSummary {
            tick,
            best_bid: self.engine.book().best_bid().map(|top| top.price),
            best_ask: self.engine.book().best_ask().map(|top| top.price),
            last_price: self.engine.tape().last().map(|t| t.price),
            trade_count: new_trades.len(),
            volume: new_trades
                .iter()
                .fold(0, |acc: Quantity, t| acc.saturating_add(t.quantity)),
            submissions: tick_sequence as usize,
            rejections: rejected,
        };
        self.summarized = self.engine.tape().len();
        debug!(
            "tick {}: bid {:?} ask {:?} trades {} volume {} submissions {} rejections {}",
            summary.tick,
            summary.best_bid,
            summary.best_ask,
            summary.trade_count,
            summary.volume,
            summary.submissions,
            summary.rejections
        );
        self.ticks.push(summary);

        // 6. Advance
        let next = tick + 1;
        if next >= self.config.horizon {
            self.state = SimulationState::Finished;
            info!(
                "simulation finished after {} ticks: {} trades, {} rejections",
                next,
                self.engine.tape().len(),
                self.rejections.len()
            );
        } else {
            self.state = SimulationState::Running { tick: next };
        }
        self.ticks.last()
    }

    /// Submit one intent for the agent in slot `i`; returns rejections recorded
    fn submit(&mut self, i: usize, submission: Submission) -> usize {
        self.slots[i].ledger.orders_submitted += 1;

        match self.engine.submit(&submission) {
            Ok(SubmitOutcome::Placed(placement)) => {
                let ledger = &mut self.slots[i].ledger;
                if let Some(id) = placement.resting {
                    ledger.view.open_orders.push(id);
                }
                if placement.unfilled == 0 {
                    return 0;
                }
                // Market remainder found no liquidity and was dropped
                let side = submission.intent.side().unwrap_or(Side::Buy);
                let remainder = Submission {
                    intent: OrderIntent::Market {
                        side,
                        quantity: placement.unfilled,
                    },
                    ..submission
                };
                self.reject(i, remainder, MatchingError::NoLiquidity { side });
                1
            }
            Ok(SubmitOutcome::Cancelled(order)) => {
                self.slots[i]
                    .ledger
                    .view
                    .open_orders
                    .retain(|id| *id != order.id);
                0
            }
            Err(error) => {
                self.reject(i, submission, error);
                1
            }
        }
    }

    fn reject(&mut self, i: usize, submission: Submission, error: MatchingError) {
        let ledger = &mut self.slots[i].ledger;
        ledger.rejections += 1;
        ledger.view.rejections.push(RejectionNotice {
            tick: submission.tick,
            tick_sequence: submission.tick_sequence,
            intent: submission.intent.clone(),
            error: error.clone(),
        });
        self.rejections.push(Rejection {
            tick: submission.tick,
            tick_sequence: submission.tick_sequence,
            agent_id: submission.agent_id,
            intent: submission.intent,
            error,
        });
    }

    /// Apply every trade recorded since `from` to both accounts
    fn settle(&mut self, from: usize) {
        let Self {
            engine,
            slots,
            house,
            index,
            ..
        } = self;

        for trade in engine.tape().since(from) {
            let legs = [
                (trade.buyer, Side::Buy, trade.buy_order_id),
                (trade.seller, Side::Sell, trade.sell_order_id),
            ];
            for (agent_id, side, order_id) in legs {
                let Some(ledger) = ledger_for(slots, house, index, agent_id) else {
                    warn!("{} references unknown {}", trade.id, agent_id);
                    continue;
                };
                if let Err(err) = ledger.view.account.apply(side, trade.price, trade.quantity) {
                    warn!("{} not settled for {}: {}", trade.id, agent_id, err);
                }
                ledger.fills += 1;
                ledger.view.fills.push(Fill {
                    trade_id: trade.id,
                    order_id,
                    tick: trade.tick,
                    side,
                    price: trade.price,
                    quantity: trade.quantity,
                    is_maker: side != trade.aggressor,
                });
                let still_open = engine
                    .book()
                    .order(order_id)
                    .is_some_and(|o| o.status.is_active());
                if !still_open {
                    ledger.view.open_orders.retain(|id| *id != order_id);
                }
            }
        }
    }

    /// Run until the horizon
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }

    /// Run until the horizon or until `stop` is raised.
    ///
    /// Returns true if the horizon was reached.
    pub fn run_until(&mut self, stop: &StopHandle) -> bool {
        loop {
            if self.is_finished() {
                return true;
            }
            if stop.is_stopped() {
                info!("simulation stopped before tick {}", self.current_tick());
                return false;
            }
            self.step();
        }
    }

    /// Final reports and recorded series
    pub fn into_output(self) -> SimulationOutput {
        let mut agents: Vec<AgentReport> = self
            .slots
            .iter()
            .map(|slot| slot.ledger.report(slot.agent.agent_type()))
            .collect();
        agents.sort_by_key(|report| report.agent_id);

        let (_, tape) = self.engine.into_parts();
        SimulationOutput {
            trades: tape.into_vec(),
            ticks: self.ticks,
            agents,
            house: self.house.report("house"),
            rejections: self.rejections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agents::{AgentKind, MarketMakerConfig, NoiseTraderConfig};
    use crate::application::simulation::AgentSpec;
    use rust_decimal_macros::dec;

    /// Replays a fixed script of intents, one batch per tick
    struct Scripted {
        id: AgentId,
        script: Vec<Vec<OrderIntent>>,
    }

    impl Scripted {
        fn new(id: u32, script: Vec<Vec<OrderIntent>>) -> Box<Self> {
            Box::new(Self {
                id: AgentId(id),
                script,
            })
        }
    }

    impl Agent for Scripted {
        fn id(&self) -> AgentId {
            self.id
        }

        fn agent_type(&self) -> &'static str {
            "scripted"
        }

        fn decide(&mut self, _own: &AgentView, _market: &MarketState, tick: Tick) -> Vec<OrderIntent> {
            self.script.get(tick as usize).cloned().unwrap_or_default()
        }
    }

    fn config(horizon: u64) -> SimulationConfig {
        SimulationConfig {
            horizon,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            Simulation::new(config(5)),
            Err(ConfigurationError::NoAgents)
        ));
        let config = config(0).with_agent_spec(AgentSpec::new(
            AgentKind::Noise(NoiseTraderConfig::default()),
            1,
        ));
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigurationError::ZeroHorizon)
        ));
    }

    #[test]
    fn test_lifecycle() {
        let mut sim = Simulation::with_agents(config(2), vec![Scripted::new(1, vec![])]).unwrap();
        assert_eq!(sim.state(), SimulationState::Initialized);

        assert!(sim.step().is_some());
        assert_eq!(sim.state(), SimulationState::Running { tick: 1 });
        assert!(sim.step().is_some());
        assert_eq!(sim.state(), SimulationState::Finished);
        assert!(sim.step().is_none());
        assert_eq!(sim.ticks().len(), 2);
    }

    #[test]
    fn test_settlement_and_notices() {
        let buyer = Scripted::new(
            1,
            vec![vec![OrderIntent::limit_buy(dec!(10), 100)], vec![], vec![]],
        );
        let seller = Scripted::new(2, vec![vec![OrderIntent::limit_sell(dec!(10), 50)]]);
        let mut sim = Simulation::with_agents(config(3), vec![buyer, seller]).unwrap();

        let summary = sim.step().cloned().unwrap();
        assert_eq!(summary.trade_count, 1);
        assert_eq!(summary.volume, 50);
        assert_eq!(summary.submissions, 2);
        assert_eq!(summary.best_bid, Some(dec!(10)));
        assert_eq!(summary.best_ask, None);

        assert_eq!(
            sim.account(AgentId(1)),
            Some(AgentAccount::new(dec!(-500), 50))
        );
        assert_eq!(
            sim.account(AgentId(2)),
            Some(AgentAccount::new(dec!(500), -50))
        );
        // Buyer's partially filled order is still open, seller's is gone
        assert_eq!(sim.open_orders(AgentId(1)).map(|o| o.len()), Some(1));
        assert_eq!(sim.open_orders(AgentId(2)).map(|o| o.len()), Some(0));

        sim.run();
        let output = sim.into_output();
        assert_eq!(output.net_position(), 0);
        assert_eq!(output.net_capital(), dec!(0));
        assert_eq!(output.agents[0].fills, 1);
        assert_eq!(output.agents[1].orders_submitted, 1);
    }

    #[test]
    fn test_fill_notices_delivered_next_tick() {
        use std::sync::Mutex;

        struct Recorder {
            inner: Scripted,
            log: Arc<Mutex<Vec<AgentView>>>,
        }
        impl Agent for Recorder {
            fn id(&self) -> AgentId {
                self.inner.id
            }
            fn agent_type(&self) -> &'static str {
                "recorder"
            }
            fn decide(&mut self, own: &AgentView, m: &MarketState, t: Tick) -> Vec<OrderIntent> {
                if let Ok(mut log) = self.log.lock() {
                    log.push(own.clone());
                }
                self.inner.decide(own, m, t)
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let maker = Box::new(Recorder {
            inner: *Scripted::new(1, vec![vec![OrderIntent::limit_sell(dec!(5), 10)]]),
            log: Arc::clone(&log),
        });
        let taker = Scripted::new(2, vec![vec![], vec![OrderIntent::market_buy(4)]]);
        let mut sim = Simulation::with_agents(config(3), vec![maker, taker]).unwrap();
        sim.run();

        let views = log.lock().unwrap();
        assert!(views[0].fills.is_empty());
        assert!(views[1].fills.is_empty());
        assert_eq!(views[2].fills.len(), 1);
        assert!(views[2].fills[0].is_maker);
        assert_eq!(views[2].fills[0].signed_qty(), -4);
        assert_eq!(views[2].position(), -4);
        assert_eq!(views[2].open_orders.len(), 1);
    }

    #[test]
    fn test_rejections_recorded_with_origin() {
        let script = vec![vec![
            OrderIntent::limit_buy(dec!(10), 0),
            OrderIntent::market_sell(5),
            OrderIntent::cancel(OrderId(77)),
        ]];
        let mut sim = Simulation::with_agents(config(1), vec![Scripted::new(3, script)]).unwrap();
        sim.run();

        let kinds: Vec<(u32, &MatchingError)> = sim
            .rejections()
            .iter()
            .map(|r| (r.tick_sequence, &r.error))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], (0, MatchingError::InvalidOrder { .. })));
        assert!(matches!(kinds[1], (1, MatchingError::NoLiquidity { side: Side::Sell })));
        assert!(matches!(kinds[2], (2, MatchingError::InvalidCancel { .. })));
        assert!(sim.rejections().iter().all(|r| r.agent_id == AgentId(3) && r.tick == 0));
        assert_eq!(sim.ticks()[0].rejections, 3);
    }

    #[test]
    fn test_market_remainder_recorded_as_no_liquidity() {
        let config = config(1).with_seed_order(Side::Sell, dec!(10), 5);
        let taker = Scripted::new(1, vec![vec![OrderIntent::market_buy(8)]]);
        let mut sim = Simulation::with_agents(config, vec![taker]).unwrap();
        sim.run();

        assert_eq!(sim.tape().volume(), 5);
        let rejection = &sim.rejections()[0];
        assert_eq!(rejection.intent, OrderIntent::market_buy(3));
        assert_eq!(rejection.error, MatchingError::NoLiquidity { side: Side::Buy });
        assert_eq!(sim.account(AgentId::HOUSE), Some(AgentAccount::new(dec!(50), -5)));
    }

    #[test]
    fn test_seed_orders_owned_by_house() {
        let config = config(1)
            .with_seed_order(Side::Buy, dec!(99), 10)
            .with_seed_order(Side::Sell, dec!(101), 10)
            .with_agent_spec(AgentSpec::new(
                AgentKind::MarketMaker(MarketMakerConfig::default()),
                1,
            ));
        let sim = Simulation::new(config).unwrap();

        assert_eq!(sim.book().resting_count(), 2);
        assert_eq!(sim.open_orders(AgentId::HOUSE).map(|o| o.len()), Some(2));
        assert_eq!(sim.agent_order(), vec![AgentId(1)]);
    }

    #[test]
    fn test_crossing_seed_orders_counted_in_first_tick() {
        let config = config(2)
            .with_seed_order(Side::Buy, dec!(101), 10)
            .with_seed_order(Side::Sell, dec!(100), 4);
        let mut sim = Simulation::with_agents(config, vec![Scripted::new(1, vec![])]).unwrap();
        assert_eq!(sim.tape().volume(), 4);
        assert_eq!(sim.account(AgentId::HOUSE), Some(AgentAccount::new(dec!(0), 0)));

        sim.run();
        assert_eq!(sim.ticks()[0].trade_count, 1);
        assert_eq!(sim.ticks()[0].volume, 4);
        assert_eq!(sim.ticks()[1].volume, 0);
        let summarized: Quantity = sim.ticks().iter().map(|t| t.volume).sum();
        assert_eq!(summarized, sim.tape().volume());
    }

    #[test]
    fn test_oversized_orders_rejected_without_aborting_tick() {
        let huge = rust_decimal::Decimal::from_i128_with_scale(10i128.pow(22), 0);
        let config = config(1).with_seed_order(Side::Sell, dec!(10), 5);
        let script = vec![vec![
            OrderIntent::limit_sell(huge, 10_000_000_000),
            OrderIntent::market_buy(agora_core::MAX_QUANTITY + 10),
            OrderIntent::market_buy(5),
        ]];
        let mut sim = Simulation::with_agents(config, vec![Scripted::new(1, script)]).unwrap();
        sim.run();

        let reasons: Vec<_> = sim.rejections().iter().map(|r| r.error.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                MatchingError::InvalidOrder {
                    reason: agora_matching::InvalidOrderReason::NotionalOverflow
                },
                MatchingError::InvalidOrder {
                    reason: agora_matching::InvalidOrderReason::QuantityTooLarge
                },
            ]
        );
        assert_eq!(sim.account(AgentId(1)), Some(AgentAccount::new(dec!(-50), 5)));
        assert!(sim.is_finished());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Simulation::with_agents(
            config(1),
            vec![Scripted::new(1, vec![]), Scripted::new(1, vec![])],
        );
        assert!(matches!(result, Err(ConfigurationError::DuplicateAgentId(AgentId(1)))));

        let result = Simulation::with_agents(config(1), vec![Scripted::new(0, vec![])]);
        assert!(matches!(result, Err(ConfigurationError::DuplicateAgentId(AgentId::HOUSE))));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let build = |seed| {
            let config = SimulationConfig {
                seed,
                shuffle_agent_order: true,
                ..config(1)
            }
            .with_agent_spec(AgentSpec::new(
                AgentKind::Noise(NoiseTraderConfig::default()),
                12,
            ));
            Simulation::new(config).unwrap().agent_order()
        };

        let order = build(9);
        assert_eq!(order, build(9));
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, (1..=12).map(AgentId).collect::<Vec<_>>());
    }

    #[test]
    fn test_stop_between_ticks() {
        let mut sim = Simulation::with_agents(config(100), vec![Scripted::new(1, vec![])]).unwrap();
        let stop = StopHandle::new();

        sim.step();
        stop.stop();
        assert!(!sim.run_until(&stop));
        assert_eq!(sim.ticks().len(), 1);
        assert_eq!(sim.state(), SimulationState::Running { tick: 1 });
    }
}
