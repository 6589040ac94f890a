use agora_core::{Price, Quantity, Trade, TradeId};
use serde::Serialize;

/// Append-only record of every trade, in execution order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TradeTape {
    trades: Vec<Trade>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next recorded trade will receive
    pub(crate) fn next_id(&self) -> TradeId {
        TradeId(self.trades.len() as u64 + 1)
    }

    pub(crate) fn push(&mut self, trade: Trade) {
        debug_assert_eq!(trade.id, self.next_id());
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Trades recorded at or after position `from`
    pub fn since(&self, from: usize) -> &[Trade] {
        self.trades.get(from..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Trade> {
        self.trades.last()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    /// Total traded quantity
    pub fn volume(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    /// Total traded notional, `None` if it leaves the decimal range
    pub fn turnover(&self) -> Option<Price> {
        self.trades
            .iter()
            .try_fold(Price::ZERO, |acc, t| acc.checked_add(t.notional()?))
    }

    pub fn into_vec(self) -> Vec<Trade> {
        self.trades
    }
}
