use agora_core::{AgentId, Order, OrderId, OrderType, Price, Quantity, Side};
use agora_ports::{BookError, BookResult, MatchingAlgorithm, RestingEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Aggregated view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: Price,
    /// Sum of remaining quantity resting at this price
    pub quantity: Quantity,
    /// Number of resting orders at this price
    pub orders: usize,
}

/// Top-of-book level for one side
pub type BookTop = PriceLevel;

/// One execution produced while matching an incoming order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Execution {
    pub maker: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

/// Price key for BTreeMap ordering
/// For bids: reversed to sort descending
/// For asks: natural order (ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriceKey {
    price: Decimal,
    is_bid: bool,
}

impl PriceKey {
    fn bid(price: Price) -> Self {
        PriceKey {
            price,
            is_bid: true,
        }
    }

    fn ask(price: Price) -> Self {
        PriceKey {
            price,
            is_bid: false,
        }
    }

    fn for_side(side: Side, price: Price) -> Self {
        match side {
            Side::Buy => Self::bid(price),
            Side::Sell => Self::ask(price),
        }
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.is_bid {
            // Bids: higher price first (reverse order)
            other.price.cmp(&self.price)
        } else {
            // Asks: lower price first (natural order)
            self.price.cmp(&other.price)
        }
    }
}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Resting orders at one price, keyed by submission sequence
#[derive(Debug, Clone, Default)]
struct LevelQueue {
    queue: BTreeMap<u64, OrderId>,
    total: Quantity,
}

impl LevelQueue {
    fn summary(&self, price: Price) -> PriceLevel {
        PriceLevel {
            price,
            quantity: self.total,
            orders: self.queue.len(),
        }
    }
}

/// Arena slot for an engine-assigned id (ids start at 1)
fn slot(id: OrderId) -> Option<usize> {
    id.0.checked_sub(1).map(|s| s as usize)
}

/// Central limit order book for a single instrument
///
/// Every accepted order lives in the arena for the whole run, so terminal
/// orders stay queryable. The priced structures only hold ids of orders that
/// are currently resting.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    /// Arena of accepted orders; `OrderId(n)` lives at slot `n - 1`
    orders: Vec<Order>,
    /// Bids sorted by price descending (highest first)
    bids: BTreeMap<PriceKey, LevelQueue>,
    /// Asks sorted by price ascending (lowest first)
    asks: BTreeMap<PriceKey, LevelQueue>,
    resting: usize,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next accepted order will receive
    pub(crate) fn next_order_id(&self) -> OrderId {
        OrderId(self.orders.len() as u64 + 1)
    }

    /// Take ownership of a freshly accepted order without resting it
    pub(crate) fn register(&mut self, order: Order) -> OrderId {
        debug_assert_eq!(order.id, self.next_order_id(), "ids must be dense");
        let id = order.id;
        self.orders.push(order);
        id
    }

    /// Register an order and rest it at (price, sequence)
    pub(crate) fn insert(&mut self, order: Order) -> OrderId {
        let id = self.register(order);
        self.rest(id);
        id
    }

    /// Place an already registered order in the priced structure.
    ///
    /// Market orders, filled or cancelled orders never rest; returns whether
    /// the order was placed.
    pub(crate) fn rest(&mut self, id: OrderId) -> bool {
        let Some(order) = slot(id).and_then(|s| self.orders.get(s)) else {
            return false;
        };
        let (OrderType::Limit, Some(price)) = (order.order_type, order.price) else {
            return false;
        };
        if order.remaining == 0 || !order.status.is_active() {
            return false;
        }

        let key = PriceKey::for_side(order.side, price);
        let book_side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = book_side.entry(key).or_default();
        if level.queue.insert(order.sequence, id).is_some() {
            return true;
        }
        level.total += order.remaining;
        self.resting += 1;
        true
    }

    /// Cancel an active resting order and take it out of its level
    pub(crate) fn remove(&mut self, id: OrderId) -> BookResult<Order> {
        let s = slot(id).ok_or(BookError::NotFound(id))?;
        let order = self.orders.get_mut(s).ok_or(BookError::NotFound(id))?;
        let price = order.price.ok_or(BookError::NotFound(id))?;

        let key = PriceKey::for_side(order.side, price);
        let book_side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = book_side.get_mut(&key).ok_or(BookError::NotFound(id))?;
        if level.queue.remove(&order.sequence).is_none() {
            return Err(BookError::NotFound(id));
        }

        level.total -= order.remaining;
        if level.queue.is_empty() {
            book_side.remove(&key);
        }
        self.resting -= 1;
        order.cancel();
        Ok(order.clone())
    }

    /// Mark a registered, non-resting order cancelled (market remainders)
    pub(crate) fn cancel_unrested(&mut self, id: OrderId) {
        if let Some(order) = slot(id).and_then(|s| self.orders.get_mut(s)) {
            order.cancel();
        }
    }

    /// Match a registered incoming order against the opposite side.
    ///
    /// Walks levels best price first while the taker still crosses, filling
    /// both legs in the arena at the resting price. Filled makers leave the
    /// book; partially filled makers keep their key.
    pub(crate) fn match_incoming(
        &mut self,
        taker: OrderId,
        matcher: &dyn MatchingAlgorithm,
    ) -> Vec<Execution> {
        let mut executions = Vec::new();
        let Some(taker_slot) = slot(taker).filter(|&s| s < self.orders.len()) else {
            return executions;
        };
        let side = self.orders[taker_slot].side;

        loop {
            let taker_remaining = self.orders[taker_slot].remaining;
            if taker_remaining == 0 {
                break;
            }

            let book_side = match side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let Some(mut entry) = book_side.first_entry() else {
                break;
            };
            let level_price = entry.key().price;
            if !self.orders[taker_slot].crosses(level_price) {
                break;
            }

            let level = entry.get_mut();
            let orders = &self.orders;
            let mut queue = level.queue.values().filter_map(|&order_id| {
                let remaining = orders.get(slot(order_id)?)?.remaining;
                Some(RestingEntry {
                    order_id,
                    remaining,
                })
            });
            let allocations = matcher.allocate(taker_remaining, &mut queue);
            if allocations.is_empty() {
                break;
            }

            let mut filled = 0;
            for allocation in allocations {
                let left = self.orders[taker_slot].remaining;
                let Some(maker) = slot(allocation.order_id).and_then(|s| self.orders.get_mut(s))
                else {
                    continue;
                };
                // Only orders queued at this level may trade
                if level.queue.get(&maker.sequence) != Some(&allocation.order_id) {
                    continue;
                }
                let quantity = allocation.quantity.min(maker.remaining).min(left);
                if quantity == 0 {
                    continue;
                }
                filled += quantity;
                maker.fill(quantity);
                level.total -= quantity;
                if maker.is_filled() {
                    level.queue.remove(&maker.sequence);
                    self.resting -= 1;
                }
                self.orders[taker_slot].fill(quantity);
                executions.push(Execution {
                    maker: allocation.order_id,
                    price: level_price,
                    quantity,
                });
            }

            if level.queue.is_empty() {
                entry.remove();
            }
            if filled == 0 {
                break;
            }
        }

        executions
    }

    /// Highest bid level
    pub fn best_bid(&self) -> Option<BookTop> {
        self.bids
            .first_key_value()
            .map(|(k, level)| level.summary(k.price))
    }

    /// Lowest ask level
    pub fn best_ask(&self) -> Option<BookTop> {
        self.asks
            .first_key_value()
            .map(|(k, level)| level.summary(k.price))
    }

    /// Mid price between best bid and ask
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Spread between best ask and best bid
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// True if the best bid is at or above the best ask
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some(bid), Some(ask)) if bid.price >= ask.price
        )
    }

    /// Top N levels of one side, best price first
    pub fn depth(&self, side: Side, levels: usize) -> Vec<PriceLevel> {
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side
            .iter()
            .take(levels)
            .map(|(k, level)| level.summary(k.price))
            .collect()
    }

    /// Get top N bid price levels (sorted descending by price - best bid first)
    pub fn bids(&self, levels: usize) -> Vec<PriceLevel> {
        self.depth(Side::Buy, levels)
    }

    /// Get top N ask price levels (sorted ascending by price - best ask first)
    pub fn asks(&self, levels: usize) -> Vec<PriceLevel> {
        self.depth(Side::Sell, levels)
    }

    /// Resting order ids on one side in priority order
    pub fn queue(&self, side: Side) -> Vec<OrderId> {
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side
            .values()
            .flat_map(|level| level.queue.values().copied())
            .collect()
    }

    /// Any accepted order, resting or terminal
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(slot(id)?)
    }

    /// Every accepted order in id order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Ids of the agent's resting orders, in id order
    pub fn open_orders(&self, agent: AgentId) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self
            .bids
            .values()
            .chain(self.asks.values())
            .flat_map(|level| level.queue.values().copied())
            .filter(|id| self.order(*id).is_some_and(|o| o.agent_id == agent))
            .collect();
        ids.sort();
        ids
    }

    /// Number of resting orders
    pub fn resting_count(&self) -> usize {
        self.resting
    }

    /// Number of accepted orders
    pub fn accepted_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resting == 0
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} | {:>10} | {:>6}", "price", "quantity", "orders")?;
        for (key, level) in self.asks.iter().rev() {
            writeln!(
                f,
                "{:>12} | {:>10} | {:>6}  ask",
                key.price,
                level.total,
                level.queue.len()
            )?;
        }
        match self.spread() {
            Some(spread) => writeln!(f, "---- spread {spread} ----")?,
            None => writeln!(f, "---- one-sided ----")?,
        }
        for (key, level) in &self.bids {
            writeln!(
                f,
                "{:>12} | {:>10} | {:>6}  bid",
                key.price,
                level.total,
                level.queue.len()
            )?;
        }
        Ok(())
    }
}
