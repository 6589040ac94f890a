use agora_core::{OrderId, Side};
use serde::Serialize;
use thiserror::Error;

/// Why an order intent failed validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidOrderReason {
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("limit price must be positive")]
    NonPositivePrice,

    #[error("quantity exceeds the signed 64-bit position range")]
    QuantityTooLarge,

    #[error("price times quantity exceeds the decimal range")]
    NotionalOverflow,
}

/// Why a cancellation was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelRejectReason {
    #[error("order does not exist")]
    Unknown,

    #[error("order belongs to another agent")]
    NotOwner,

    #[error("order is no longer active")]
    Inactive,
}

/// Per-intent errors raised by the matching engine
///
/// All of these are local to the offending intent and never stop a run.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchingError {
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: InvalidOrderReason },

    #[error("no opposing liquidity for {side:?} market order")]
    NoLiquidity { side: Side },

    #[error("cannot cancel {order_id}: {reason}")]
    InvalidCancel {
        order_id: OrderId,
        reason: CancelRejectReason,
    },
}

pub type MatchingResult<T> = std::result::Result<T, MatchingError>;

/// Errors raised by direct order book operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("order {0} is not resting in the book")]
    NotFound(OrderId),
}

pub type BookResult<T> = std::result::Result<T, BookError>;
