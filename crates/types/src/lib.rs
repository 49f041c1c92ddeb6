//! Core type definitions for the countdown auction.
//!
//! This crate provides the shared data structures used across the auction
//! system: principals, amounts, the immutable bidding rule, the session phase,
//! per-bidder escrow records and the events emitted on every committed
//! transition.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================
// PRINCIPALS AND AMOUNTS
// =========================

/// Opaque principal identifier (32 bytes), authenticated by the caller.
pub type Address = [u8; 32];

/// Token amount in the smallest unit.
pub type Amount = u64;

/// The all-zero address. Never a valid auctioneer or bidder.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Number of consecutive announcements that closes the session
/// ("going once, going twice, going three times, sold").
pub const CLOSE_THRESHOLD: u8 = 4;

/// Hex-encode an address for display.
pub fn address_hex(address: &Address) -> String {
    hex::encode(address)
}

/// Parse a hex address, with or without a `0x` prefix.
///
/// Shorter inputs are left-aligned and zero-padded; longer or non-hex input
/// is rejected.
pub fn parse_address(s: &str) -> Option<Address> {
    let bytes = hex::decode(s.trim_start_matches("0x")).ok()?;
    if bytes.is_empty() || bytes.len() > 32 {
        return None;
    }
    let mut addr = ZERO_ADDRESS;
    addr[..bytes.len()].copy_from_slice(&bytes);
    Some(addr)
}

// =========================
// AUCTION TYPES
// =========================

/// Bidding rule, fixed when the auction is created.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Rule {
    /// Price the session opens at. The first bid is compared against it.
    pub starting_price: Amount,
    /// Minimum increment over the current price for a bid to be accepted.
    pub minimum_step: Amount,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            starting_price: 50,
            minimum_step: 5,
        }
    }
}

impl Rule {
    pub fn new(starting_price: Amount, minimum_step: Amount) -> Self {
        Self {
            starting_price,
            minimum_step,
        }
    }

    /// Both prices must be positive.
    pub fn is_valid(&self) -> bool {
        self.starting_price > 0 && self.minimum_step > 0
    }

    /// Lowest acceptable bid given the current price, or `None` if it
    /// would exceed the amount range (no bid can be accepted).
    pub fn minimum_bid(&self, current_price: Amount) -> Option<Amount> {
        current_price.checked_add(self.minimum_step)
    }
}

/// Auction lifecycle phase. Transitions only move forward.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub enum Phase {
    /// Registering bidders
    Created,
    /// Accepting bids
    Started,
    /// Countdown finished; refunds open
    Closing,
}

impl Phase {
    /// The phase this one advances to, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Created => Some(Phase::Started),
            Phase::Started => Some(Phase::Closing),
            Phase::Closing => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Created => "created",
            Phase::Started => "started",
            Phase::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// A registered bidder's record.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Bidder {
    /// Allowance granted at registration
    pub token_allowance: Amount,
    /// Escrowed sum of the bidder's accepted bids
    pub deposit: Amount,
    pub registered: bool,
    /// Set once the bidder has reclaimed their deposit
    pub withdrawn: bool,
}

impl Bidder {
    /// Fresh registration with an empty escrow.
    pub fn with_allowance(token_allowance: Amount) -> Self {
        Self {
            token_allowance,
            deposit: 0,
            registered: true,
            withdrawn: false,
        }
    }
}

/// Event recorded for every committed transition.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum AuctionEvent {
    Registered {
        bidder: Address,
        token_allowance: Amount,
    },
    SessionStarted,
    BidAccepted {
        bidder: Address,
        price: Amount,
    },
    Announced {
        count: u8,
    },
    /// Session closed; `winner` is `None` if nobody bid.
    Closed {
        winner: Option<Address>,
        price: Amount,
    },
    DepositWithdrawn {
        bidder: Address,
        amount: Amount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_validity() {
        assert!(Rule::default().is_valid());
        assert!(!Rule::new(0, 5).is_valid());
        assert!(!Rule::new(50, 0).is_valid());
    }

    #[test]
    fn test_minimum_bid() {
        let rule = Rule::new(50, 5);
        assert_eq!(rule.minimum_bid(50), Some(55));
        assert_eq!(rule.minimum_bid(Amount::MAX - 4), None);
    }

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::Created.next(), Some(Phase::Started));
        assert_eq!(Phase::Started.next(), Some(Phase::Closing));
        assert_eq!(Phase::Closing.next(), None);
        assert!(Phase::Created < Phase::Started && Phase::Started < Phase::Closing);
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("0x0102").unwrap();
        assert_eq!(addr[0], 1);
        assert_eq!(addr[1], 2);
        assert!(addr[2..].iter().all(|b| *b == 0));

        assert_eq!(parse_address(&address_hex(&[7u8; 32])), Some([7u8; 32]));
        assert!(parse_address("zz").is_none());
        assert!(parse_address("").is_none());
        assert!(parse_address(&"ab".repeat(33)).is_none());
    }

    #[test]
    fn test_bidder_serialization() {
        let bidder = Bidder::with_allowance(100);
        let encoded = borsh::to_vec(&bidder).unwrap();
        let decoded: Bidder = borsh::from_slice(&encoded).unwrap();
        assert_eq!(bidder, decoded);
    }
}
