use agora_core::{OrderId, Quantity};

/// A resting order as seen by a matching algorithm: id and open quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestingEntry {
    pub order_id: OrderId,
    pub remaining: Quantity,
}

/// Quantity assigned to one resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub order_id: OrderId,
    pub quantity: Quantity,
}

/// Port for the allocation policy applied inside one price level
///
/// The order book decides *which* level trades (best price first) and at what
/// price (the resting price). The algorithm only decides how an incoming
/// quantity is split across the orders resting at that level.
pub trait MatchingAlgorithm: Send + Sync {
    /// Split up to `incoming` across `resting`, which yields entries in time
    /// priority (ascending sequence).
    ///
    /// Returns allocations in execution order. Their sum never exceeds
    /// `incoming`, and no allocation exceeds its entry's remaining quantity.
    fn allocate(
        &self,
        incoming: Quantity,
        resting: &mut dyn Iterator<Item = RestingEntry>,
    ) -> Vec<Allocation>;

    /// Get the name of the algorithm
    fn name(&self) -> &str;
}
