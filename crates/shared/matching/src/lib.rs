//! Agora Matching
//!
//! Order book, price-time matching engine and trade tape for the Agora
//! market simulator. The engine is the only writer of the book.

mod book;
mod engine;
mod price_time;
mod tape;

pub use book::{BookTop, OrderBook, PriceLevel};
pub use engine::{MatchingEngine, Placement, SubmitOutcome, Submission};
pub use price_time::PriceTimeMatcher;
pub use tape::TradeTape;

// Re-export the port types for convenience
pub use agora_ports::{
    CancelRejectReason, InvalidOrderReason, MatchingAlgorithm, MatchingError, MatchingResult,
};
