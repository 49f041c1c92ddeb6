//! Auction engine error types.

use thiserror::Error;

use auction_types::{Amount, Phase};

/// Errors that can occur when executing an auction call.
///
/// A call that returns any of these has not modified the auction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("Not authorized")]
    Unauthorized,

    #[error("Invalid state. Expected: {expected:?}, Got: {got:?}")]
    InvalidState { expected: Phase, got: Phase },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bid too low: {got} is below current price {current} plus minimum step {step}")]
    BidTooLow {
        current: Amount,
        step: Amount,
        got: Amount,
    },

    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),
}
