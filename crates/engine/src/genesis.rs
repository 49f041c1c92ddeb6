//! Genesis configuration for the auction engine.
//!
//! This module defines the auctioneer, the bidding rule and any bidders
//! registered before the engine accepts its first call.

use auction_types::{Address, Amount, AuctionEvent, Bidder, Rule, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::state::AuctionState;

/// Genesis configuration for the auction engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionGenesisConfig {
    /// The single privileged principal
    pub auctioneer: Address,

    /// Bidding rule, immutable afterwards
    #[serde(default)]
    pub rule: Rule,

    /// Bidders registered at genesis
    #[serde(default)]
    pub bidders: Vec<BidderConfig>,
}

/// Configuration for a bidder registered at genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidderConfig {
    pub address: Address,
    pub token_allowance: Amount,
}

impl AuctionGenesisConfig {
    /// Create a genesis config with no pre-registered bidders.
    pub fn new(auctioneer: Address, rule: Rule) -> Self {
        Self {
            auctioneer,
            rule,
            bidders: Vec::new(),
        }
    }

    /// Validate the genesis configuration.
    pub fn validate(&self) -> Result<(), GenesisValidationError> {
        if self.auctioneer == ZERO_ADDRESS {
            return Err(GenesisValidationError::InvalidAuctioneer);
        }

        if self.rule.starting_price == 0 {
            return Err(GenesisValidationError::InvalidRule(
                "Starting price must be positive".into(),
            ));
        }
        if self.rule.minimum_step == 0 {
            return Err(GenesisValidationError::InvalidRule(
                "Minimum step must be positive".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for bidder in &self.bidders {
            if bidder.address == ZERO_ADDRESS || bidder.address == self.auctioneer {
                return Err(GenesisValidationError::InvalidBidder(bidder.address));
            }
            if !seen.insert(bidder.address) {
                return Err(GenesisValidationError::DuplicateBidder(bidder.address));
            }
        }

        Ok(())
    }

    /// Build the initial state, validating first.
    pub fn build_state(&self) -> Result<AuctionState, GenesisValidationError> {
        self.validate()?;

        let mut state = AuctionState::new(self.auctioneer, self.rule);
        for bidder in &self.bidders {
            state
                .bidders
                .insert(bidder.address, Bidder::with_allowance(bidder.token_allowance));
            state.events.push(AuctionEvent::Registered {
                bidder: bidder.address,
                token_allowance: bidder.token_allowance,
            });
        }
        Ok(state)
    }
}

/// Errors that can occur during genesis validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenesisValidationError {
    #[error("Auctioneer cannot be the zero address")]
    InvalidAuctioneer,

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Invalid bidder: {}", auction_types::address_hex(.0))]
    InvalidBidder(Address),

    #[error("Duplicate bidder: {}", auction_types::address_hex(.0))]
    DuplicateBidder(Address),
}
