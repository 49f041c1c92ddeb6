//! State record for the auction engine.

use auction_types::{
    Address, Amount, AuctionEvent, Bidder, Phase, Rule, CLOSE_THRESHOLD, ZERO_ADDRESS,
};
use borsh::{BorshDeserialize, BorshSerialize};
use std::collections::BTreeMap;

use crate::error::AuctionError;

/// Auction state.
///
/// Everything needed to resume the state machine exactly: encoding this with
/// borsh is the snapshot format.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AuctionState {
    /// The single privileged principal, fixed at construction
    pub auctioneer: Address,

    /// Bidding rule, fixed at construction
    pub rule: Rule,

    /// Current lifecycle phase
    pub phase: Phase,

    /// Highest accepted price, or the starting price before any bid
    pub current_price: Amount,

    /// Bidder holding the highest accepted bid
    pub current_winner: Option<Address>,

    /// Consecutive announcements since the last accepted bid
    pub announce_count: u8,

    /// Registered bidders
    pub bidders: BTreeMap<Address, Bidder>,

    /// Journal of committed transitions
    pub events: Vec<AuctionEvent>,
}

impl AuctionState {
    /// Create a new auction state in the `Created` phase.
    pub fn new(auctioneer: Address, rule: Rule) -> Self {
        Self {
            auctioneer,
            rule,
            phase: Phase::Created,
            current_price: rule.starting_price,
            current_winner: None,
            announce_count: 0,
            bidders: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Get a bidder's record.
    pub fn get_bidder(&self, address: &Address) -> Option<&Bidder> {
        self.bidders.get(address)
    }

    pub fn is_registered(&self, address: &Address) -> bool {
        self.bidders
            .get(address)
            .map(|bidder| bidder.registered)
            .unwrap_or(false)
    }

    /// Get a bidder's escrowed deposit (zero for unknown principals).
    pub fn get_deposit(&self, address: &Address) -> Amount {
        self.bidders
            .get(address)
            .map(|bidder| bidder.deposit)
            .unwrap_or(0)
    }

    /// Sum of all escrowed deposits.
    pub fn total_escrow(&self) -> Amount {
        self.bidders
            .values()
            .fold(0, |acc: Amount, bidder| acc.saturating_add(bidder.deposit))
    }

    /// Encode the state as a snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, AuctionError> {
        borsh::to_vec(self).map_err(|e| AuctionError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot, rejecting states the engine could never reach.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, AuctionError> {
        let state: AuctionState =
            borsh::from_slice(bytes).map_err(|e| AuctionError::Snapshot(e.to_string()))?;
        state.check_consistency()?;
        Ok(state)
    }

    fn check_consistency(&self) -> Result<(), AuctionError> {
        let fail = |msg: &str| -> Result<(), AuctionError> {
            Err(AuctionError::Snapshot(msg.into()))
        };

        if self.auctioneer == ZERO_ADDRESS {
            return fail("zero auctioneer");
        }
        if !self.rule.is_valid() {
            return fail("rule prices must be positive");
        }
        if self.current_price < self.rule.starting_price {
            return fail("current price below starting price");
        }
        if self.bidders.contains_key(&self.auctioneer) {
            return fail("auctioneer registered as bidder");
        }
        match (self.phase, self.announce_count) {
            (Phase::Created, 0) => {}
            (Phase::Created, _) => return fail("announcements before session start"),
            (Phase::Started, n) if n >= CLOSE_THRESHOLD => {
                return fail("countdown finished but session still open")
            }
            _ => {}
        }
        if let Some(winner) = &self.current_winner {
            if !self.is_registered(winner) {
                return fail("winner is not a registered bidder");
            }
        } else if self.current_price != self.rule.starting_price {
            return fail("price moved without a winner");
        }
        Ok(())
    }
}
