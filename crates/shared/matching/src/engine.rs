use agora_core::{
    AgentId, MAX_QUANTITY, Order, OrderId, OrderIntent, OrderType, Price, Quantity, Side, Tick,
    Trade, checked_notional,
};
use agora_ports::{
    CancelRejectReason, InvalidOrderReason, MatchingAlgorithm, MatchingError, MatchingResult,
};
use log::{debug, trace};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::{OrderBook, PriceTimeMatcher, TradeTape};

/// An intent stamped with who sent it and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub agent_id: AgentId,
    pub tick: Tick,
    /// Position of this submission within its tick
    pub tick_sequence: u32,
    pub intent: OrderIntent,
}

impl Submission {
    pub fn new(agent_id: AgentId, tick: Tick, tick_sequence: u32, intent: OrderIntent) -> Self {
        Self {
            agent_id,
            tick,
            tick_sequence,
            intent,
        }
    }
}

/// Result of an accepted limit or market order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub order_id: OrderId,
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Set when a limit remainder now rests in the book
    pub resting: Option<OrderId>,
    /// Market remainder that found no liquidity and was cancelled
    pub unfilled: Quantity,
}

impl Placement {
    pub fn filled_quantity(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubmitOutcome {
    Placed(Placement),
    Cancelled(Order),
}

/// Matching engine for one instrument
///
/// Single owner of the order book and the trade tape. Submissions are
/// processed one at a time, so the book is quiescent between calls.
pub struct MatchingEngine {
    book: OrderBook,
    tape: TradeTape,
    matcher: Box<dyn MatchingAlgorithm>,
    /// Global submission sequence; the time-priority key
    sequence: u64,
}

impl fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("resting", &self.book.resting_count())
            .field("trades", &self.tape.len())
            .field("sequence", &self.sequence)
            .field("matcher", &self.matcher.name())
            .finish()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    /// Create an engine with default price-time priority matching
    pub fn new() -> Self {
        Self::with_matcher(Box::new(PriceTimeMatcher::new()))
    }

    /// Create an engine with a specific per-level allocation policy
    pub fn with_matcher(matcher: Box<dyn MatchingAlgorithm>) -> Self {
        Self {
            book: OrderBook::new(),
            tape: TradeTape::new(),
            matcher,
            sequence: 0,
        }
    }

    pub fn matcher_name(&self) -> &str {
        self.matcher.name()
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn tape(&self) -> &TradeTape {
        &self.tape
    }

    /// Number of submissions that reached the engine
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn into_parts(self) -> (OrderBook, TradeTape) {
        (self.book, self.tape)
    }

    /// Process one submission to completion
    pub fn submit(&mut self, submission: &Submission) -> MatchingResult<SubmitOutcome> {
        self.sequence += 1;
        let result = match submission.intent {
            OrderIntent::Limit {
                side,
                price,
                quantity,
            } => self
                .place(submission, side, OrderType::Limit, Some(price), quantity)
                .map(SubmitOutcome::Placed),
            OrderIntent::Market { side, quantity } => self
                .place(submission, side, OrderType::Market, None, quantity)
                .map(SubmitOutcome::Placed),
            OrderIntent::Cancel { order_id } => self
                .cancel(submission.agent_id, order_id)
                .map(SubmitOutcome::Cancelled),
        };

        if let Err(err) = &result {
            debug!(
                "tick {} #{}: rejected {:?} from {}: {}",
                submission.tick, submission.tick_sequence, submission.intent, submission.agent_id, err
            );
        }
        result
    }

    fn place(
        &mut self,
        submission: &Submission,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
    ) -> MatchingResult<Placement> {
        if quantity == 0 {
            return Err(MatchingError::InvalidOrder {
                reason: InvalidOrderReason::NonPositiveQuantity,
            });
        }
        if quantity > MAX_QUANTITY {
            return Err(MatchingError::InvalidOrder {
                reason: InvalidOrderReason::QuantityTooLarge,
            });
        }
        if let Some(price) = price {
            if price <= Decimal::ZERO {
                return Err(MatchingError::InvalidOrder {
                    reason: InvalidOrderReason::NonPositivePrice,
                });
            }
            // Every resting order has a representable notional, so no
            // execution against it can overflow either.
            if checked_notional(price, quantity).is_none() {
                return Err(MatchingError::InvalidOrder {
                    reason: InvalidOrderReason::NotionalOverflow,
                });
            }
        }

        let opposite_empty = match side {
            Side::Buy => self.book.best_ask().is_none(),
            Side::Sell => self.book.best_bid().is_none(),
        };
        if order_type == OrderType::Market && opposite_empty {
            return Err(MatchingError::NoLiquidity { side });
        }

        let order = Order::new(
            self.book.next_order_id(),
            submission.agent_id,
            side,
            order_type,
            price,
            quantity,
            self.sequence,
            submission.tick,
            submission.tick_sequence,
        );
        let taker = order.id;
        let taker_agent = order.agent_id;
        self.book.register(order);

        let executions = self.book.match_incoming(taker, self.matcher.as_ref());
        let mut trades = Vec::with_capacity(executions.len());
        for execution in executions {
            let maker_agent = self
                .book
                .order(execution.maker)
                .map_or(AgentId::HOUSE, |o| o.agent_id);
            let (buy_order_id, sell_order_id, buyer, seller) = match side {
                Side::Buy => (taker, execution.maker, taker_agent, maker_agent),
                Side::Sell => (execution.maker, taker, maker_agent, taker_agent),
            };
            let trade = Trade {
                id: self.tape.next_id(),
                tick: submission.tick,
                price: execution.price,
                quantity: execution.quantity,
                buy_order_id,
                sell_order_id,
                buyer,
                seller,
                aggressor: side,
            };
            trace!(
                "{} {} x {} @ {} ({} buys from {})",
                trade.id, trade.tick, trade.quantity, trade.price, trade.buyer, trade.seller
            );
            self.tape.push(trade.clone());
            trades.push(trade);
        }

        let remaining = self.book.order(taker).map_or(0, |o| o.remaining);
        let mut placement = Placement {
            order_id: taker,
            trades,
            resting: None,
            unfilled: 0,
        };
        if remaining > 0 {
            match order_type {
                OrderType::Limit => {
                    if self.book.rest(taker) {
                        placement.resting = Some(taker);
                    }
                }
                OrderType::Market => {
                    self.book.cancel_unrested(taker);
                    placement.unfilled = remaining;
                }
            }
        }
        Ok(placement)
    }

    fn cancel(&mut self, agent_id: AgentId, order_id: OrderId) -> MatchingResult<Order> {
        let reject = |reason| MatchingError::InvalidCancel { order_id, reason };

        let order = self
            .book
            .order(order_id)
            .ok_or(reject(CancelRejectReason::Unknown))?;
        if order.agent_id != agent_id {
            return Err(reject(CancelRejectReason::NotOwner));
        }
        if !order.status.is_active() {
            return Err(reject(CancelRejectReason::Inactive));
        }
        self.book
            .remove(order_id)
            .map_err(|_| reject(CancelRejectReason::Inactive))
    }
}
