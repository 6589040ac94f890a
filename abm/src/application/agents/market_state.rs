//! Market State
//!
//! Read-only snapshot provided to agents each tick.

use agora_core::{Price, Quantity, Tick};
use agora_matching::{BookTop, OrderBook, PriceLevel, TradeTape};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Most recent execution on the tape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastTrade {
    pub price: Price,
    pub quantity: Quantity,
    pub tick: Tick,
}

/// Market state provided to agents each tick
///
/// Captured from the book before any agent acts and never updated
/// afterwards; the next tick captures a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketState {
    pub tick: Tick,

    pub best_bid: Option<BookTop>,
    pub best_ask: Option<BookTop>,

    /// Top N bid levels, best first
    pub bids: Vec<PriceLevel>,

    /// Top N ask levels, best first
    pub asks: Vec<PriceLevel>,

    /// Last trade (if any)
    pub last_trade: Option<LastTrade>,

    /// Number of trades on the tape so far
    pub trade_count: usize,

    /// Minimum price increment
    pub price_tick: Price,
}

impl MarketState {
    /// Create empty market state
    pub fn empty(tick: Tick, price_tick: Price) -> Self {
        Self {
            tick,
            best_bid: None,
            best_ask: None,
            bids: Vec::new(),
            asks: Vec::new(),
            last_trade: None,
            trade_count: 0,
            price_tick,
        }
    }

    /// Derive the snapshot from the current book and tape
    pub fn capture(
        tick: Tick,
        book: &OrderBook,
        tape: &TradeTape,
        depth_levels: usize,
        price_tick: Price,
    ) -> Self {
        Self {
            tick,
            best_bid: book.best_bid(),
            best_ask: book.best_ask(),
            bids: book.bids(depth_levels),
            asks: book.asks(depth_levels),
            last_trade: tape.last().map(|t| LastTrade {
                price: t.price,
                quantity: t.quantity,
                tick: t.tick,
            }),
            trade_count: tape.len(),
            price_tick,
        }
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Best ask minus best bid
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Calculate spread in basis points of the mid
    pub fn spread_bps(&self) -> Option<f64> {
        let mid = self.mid_price()?.to_f64()?;
        if mid == 0.0 {
            return None;
        }
        Some(self.spread()?.to_f64()? / mid * 10_000.0)
    }

    /// Mid when both sides are quoted, else the last trade price
    pub fn reference_price(&self) -> Option<Price> {
        self.mid_price()
            .or_else(|| self.last_trade.map(|t| t.price))
    }

    pub fn last_price(&self) -> Option<Price> {
        self.last_trade.map(|t| t.price)
    }

    /// Check if market has valid quotes on both sides
    pub fn has_quotes(&self) -> bool {
        matches!(
            (self.best_bid, self.best_ask),
            (Some(bid), Some(ask)) if bid.price < ask.price
        )
    }

    /// Total bid depth over the captured levels
    pub fn total_bid_depth(&self) -> Quantity {
        self.bids.iter().map(|l| l.quantity).sum()
    }

    /// Total ask depth over the captured levels
    pub fn total_ask_depth(&self) -> Quantity {
        self.asks.iter().map(|l| l.quantity).sum()
    }

    /// Order book imbalance (-1 to 1)
    pub fn imbalance(&self) -> f64 {
        let bid_depth = self.total_bid_depth() as f64;
        let ask_depth = self.total_ask_depth() as f64;
        let total = bid_depth + ask_depth;

        if total == 0.0 {
            return 0.0;
        }

        (bid_depth - ask_depth) / total
    }
}
