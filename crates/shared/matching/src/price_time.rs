use agora_core::Quantity;
use agora_ports::{Allocation, MatchingAlgorithm, RestingEntry};

/// Standard price-time priority matching engine (FIFO)
///
/// Orders are matched based on:
/// 1. Best price (highest bid, lowest ask) - chosen by the order book
/// 2. Time priority (first in, first out at same price) - applied here
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceTimeMatcher;

impl PriceTimeMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for PriceTimeMatcher {
    fn name(&self) -> &str {
        "Price-Time Priority"
    }

    fn allocate(
        &self,
        incoming: Quantity,
        resting: &mut dyn Iterator<Item = RestingEntry>,
    ) -> Vec<Allocation> {
        let mut allocations = Vec::new();
        let mut left = incoming;

        if left == 0 {
            return allocations;
        }

        for entry in resting {
            let quantity = left.min(entry.remaining);
            if quantity == 0 {
                continue;
            }
            allocations.push(Allocation {
                order_id: entry.order_id,
                quantity,
            });
            left -= quantity;
            if left == 0 {
                break;
            }
        }

        allocations
    }
}
