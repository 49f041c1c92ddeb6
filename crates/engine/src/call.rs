//! Call message types for the auction engine.

use auction_types::{Address, Amount};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::guard::Operation;

/// Call messages for the auction engine.
///
/// Arguments are optional so that a caller omitting a mandatory argument can
/// be represented and rejected with `InvalidInput`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum AuctionCall {
    // === Auctioneer ===
    /// Register (or re-register) a bidder with a token allowance.
    Register {
        bidder: Option<Address>,
        token_count: Option<Amount>,
    },

    /// Open the bidding session.
    StartSession,

    /// Advance the closing countdown.
    Announce,

    // === Bidders ===
    /// Place a bid at `price`.
    Bid { price: Option<Amount> },

    /// Reclaim the escrowed deposit after closing (non-winners only).
    GetDeposit,
}

impl AuctionCall {
    pub fn operation(&self) -> Operation {
        match self {
            AuctionCall::Register { .. } => Operation::Register,
            AuctionCall::StartSession => Operation::StartSession,
            AuctionCall::Announce => Operation::Announce,
            AuctionCall::Bid { .. } => Operation::Bid,
            AuctionCall::GetDeposit => Operation::GetDeposit,
        }
    }
}

/// Successful result of a dispatched call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    Unit,
    /// Amount released from escrow by `GetDeposit`.
    Withdrawn(Amount),
}
