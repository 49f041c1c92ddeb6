//! Single-auction engine with an auctioneer-driven countdown close.
//!
//! This crate implements the auction state machine:
//!
//! - Bidder registration with token allowances (auctioneer only)
//! - Session start and strictly increasing bids under a minimum step
//! - Escrow of every accepted bid
//! - Closing after four consecutive announcements with no new bid
//! - Refund of escrow to every bidder but the winner
//!
//! # Architecture
//!
//! - `call`: Message types for state-changing operations
//! - `guard`: Role checks and the operation → phase table
//! - `handlers`: Business logic for processing calls
//! - `queries`: Read-only state access
//! - `state`: The auction state record and its snapshot encoding
//! - `genesis`: Initial configuration
//! - `engine`: Lock-guarded shared handle
//! - `error`: Error types
//!
//! # Example
//!
//! ```
//! use auction_engine::AuctionEngine;
//! use auction_types::{Phase, Rule};
//!
//! let auctioneer = [1u8; 32];
//! let alice = [2u8; 32];
//!
//! let engine = AuctionEngine::new(auctioneer, Rule::new(50, 5)).unwrap();
//! engine.register(auctioneer, Some(alice), Some(100)).unwrap();
//! engine.start_session(auctioneer).unwrap();
//! engine.bid(alice, Some(55)).unwrap();
//!
//! for _ in 0..4 {
//!     engine.announce(auctioneer).unwrap();
//! }
//! assert_eq!(engine.phase(), Phase::Closing);
//! ```

pub mod call;
pub mod engine;
pub mod error;
pub mod genesis;
pub mod guard;
pub mod handlers;
pub mod queries;
pub mod state;

pub use call::{AuctionCall, CallOutcome};
pub use engine::AuctionEngine;
pub use error::AuctionError;
pub use genesis::{AuctionGenesisConfig, BidderConfig, GenesisValidationError};
pub use guard::Operation;
pub use handlers::{CallContext, HandlerResult};
pub use queries::{AuctionQuery, AuctionQueryResponse, AuctionSummary};
pub use state::AuctionState;
