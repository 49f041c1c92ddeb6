//! Query handlers for the auction engine.
//!
//! These functions provide read-only access to auction state.

use auction_types::{Address, Amount, AuctionEvent, Bidder, Phase, Rule};
use serde::{Deserialize, Serialize};

use crate::state::AuctionState;

/// Query request types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionQuery {
    /// Get the current phase.
    Phase,

    /// Get the bidding rule.
    Rule,

    /// Get the current price.
    CurrentPrice,

    /// Get the current winner, if any bid was accepted.
    CurrentWinner,

    /// Get the number of consecutive announcements.
    AnnounceCount,

    /// Get the auctioneer.
    Auctioneer,

    /// Get a bidder's record.
    Bidder { address: Address },

    /// Get a principal's escrowed deposit.
    Deposit { address: Address },

    /// Get all registered bidders.
    Bidders,

    /// Get journal entries (paginated).
    Events { offset: u64, limit: u64 },
}

/// Query response types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionQueryResponse {
    Phase(Phase),
    Rule(Rule),
    CurrentPrice(Amount),
    CurrentWinner(Option<Address>),
    AnnounceCount(u8),
    Auctioneer(Address),
    Bidder(Option<Bidder>),
    Deposit(Amount),
    Bidders(Vec<(Address, Bidder)>),
    Events(Vec<AuctionEvent>),
}

/// Handle a query.
pub fn handle_query(state: &AuctionState, query: AuctionQuery) -> AuctionQueryResponse {
    match query {
        AuctionQuery::Phase => AuctionQueryResponse::Phase(state.phase),

        AuctionQuery::Rule => AuctionQueryResponse::Rule(state.rule),

        AuctionQuery::CurrentPrice => AuctionQueryResponse::CurrentPrice(state.current_price),

        AuctionQuery::CurrentWinner => AuctionQueryResponse::CurrentWinner(state.current_winner),

        AuctionQuery::AnnounceCount => AuctionQueryResponse::AnnounceCount(state.announce_count),

        AuctionQuery::Auctioneer => AuctionQueryResponse::Auctioneer(state.auctioneer),

        AuctionQuery::Bidder { address } => {
            AuctionQueryResponse::Bidder(state.get_bidder(&address).cloned())
        }

        AuctionQuery::Deposit { address } => {
            AuctionQueryResponse::Deposit(state.get_deposit(&address))
        }

        AuctionQuery::Bidders => AuctionQueryResponse::Bidders(
            state
                .bidders
                .iter()
                .map(|(address, bidder)| (*address, bidder.clone()))
                .collect(),
        ),

        AuctionQuery::Events { offset, limit } => {
            let events = state
                .events
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            AuctionQueryResponse::Events(events)
        }
    }
}

/// Summary of the auction for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub auctioneer: Address,
    pub rule: Rule,
    pub phase: Phase,
    pub current_price: Amount,
    pub current_winner: Option<Address>,
    pub announce_count: u8,
    pub num_bidders: usize,
    pub total_escrow: Amount,
}

impl AuctionSummary {
    pub fn from_state(state: &AuctionState) -> Self {
        Self {
            auctioneer: state.auctioneer,
            rule: state.rule,
            phase: state.phase,
            current_price: state.current_price,
            current_winner: state.current_winner,
            announce_count: state.announce_count,
            num_bidders: state.bidders.len(),
            total_escrow: state.total_escrow(),
        }
    }
}
