//! Agora Ports
//!
//! Port definitions (traits) and the error taxonomy for the Agora simulator.
//! These define the boundaries between the book, the matching policy and the
//! scheduler.

mod error;
mod matching;

pub use error::{
    BookError, BookResult, CancelRejectReason, InvalidOrderReason, MatchingError, MatchingResult,
};
pub use matching::{Allocation, MatchingAlgorithm, RestingEntry};
