//! Shared handle to a single auction.
//!
//! All calls go through one `RwLock`: mutating calls hold the write lock for
//! their whole read-modify-write, queries share the read lock and always see
//! a committed state.

use auction_types::{address_hex, Address, Amount, Phase, Rule};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use crate::call::{AuctionCall, CallOutcome};
use crate::error::AuctionError;
use crate::genesis::{AuctionGenesisConfig, GenesisValidationError};
use crate::handlers::{self, CallContext, HandlerResult};
use crate::queries::{handle_query, AuctionQuery, AuctionQueryResponse, AuctionSummary};
use crate::state::AuctionState;

/// Cloneable handle to an auction engine. Clones share the same auction.
#[derive(Clone, Debug)]
pub struct AuctionEngine {
    state: Arc<RwLock<AuctionState>>,
}

impl AuctionEngine {
    /// Create an engine with no registered bidders.
    pub fn new(auctioneer: Address, rule: Rule) -> Result<Self, GenesisValidationError> {
        Self::from_genesis(&AuctionGenesisConfig::new(auctioneer, rule))
    }

    /// Create an engine from a genesis configuration.
    pub fn from_genesis(config: &AuctionGenesisConfig) -> Result<Self, GenesisValidationError> {
        let state = config.build_state()?;
        info!(
            "Auction created by {} (starting price {}, minimum step {})",
            address_hex(&state.auctioneer),
            state.rule.starting_price,
            state.rule.minimum_step
        );
        Ok(Self::from_state(state))
    }

    /// Resume an engine from a snapshot taken with [`AuctionEngine::snapshot`].
    pub fn restore(bytes: &[u8]) -> Result<Self, AuctionError> {
        let state = AuctionState::from_snapshot(bytes)?;
        info!(
            "Auction restored in phase {} at price {}",
            state.phase, state.current_price
        );
        Ok(Self::from_state(state))
    }

    fn from_state(state: AuctionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Encode the current state.
    pub fn snapshot(&self) -> Result<Vec<u8>, AuctionError> {
        self.state.read().to_snapshot()
    }

    // ============ Calls ============

    /// Execute a call message on behalf of `ctx.sender`.
    pub fn execute(&self, ctx: &CallContext, call: AuctionCall) -> HandlerResult<CallOutcome> {
        let op = call.operation();
        let result = {
            let mut state = self.state.write();
            handlers::dispatch(&mut state, ctx, call)
        };
        if let Err(e) = &result {
            debug!(
                "Rejected {:?} from {}: {}",
                op,
                address_hex(&ctx.sender),
                e
            );
        }
        result
    }

    /// Register `beneficiary` with `token_count` tokens. Auctioneer only.
    pub fn register(
        &self,
        caller: Address,
        beneficiary: Option<Address>,
        token_count: Option<Amount>,
    ) -> HandlerResult<()> {
        let call = AuctionCall::Register {
            bidder: beneficiary,
            token_count,
        };
        self.execute(&CallContext::new(caller), call).map(|_| ())
    }

    /// Open the bidding session. Auctioneer only.
    pub fn start_session(&self, caller: Address) -> HandlerResult<()> {
        self.execute(&CallContext::new(caller), AuctionCall::StartSession)
            .map(|_| ())
    }

    /// Place a bid. Registered bidders only.
    pub fn bid(&self, caller: Address, price: Option<Amount>) -> HandlerResult<()> {
        self.execute(&CallContext::new(caller), AuctionCall::Bid { price })
            .map(|_| ())
    }

    /// Advance the closing countdown. Auctioneer only.
    pub fn announce(&self, caller: Address) -> HandlerResult<()> {
        self.execute(&CallContext::new(caller), AuctionCall::Announce)
            .map(|_| ())
    }

    /// Reclaim the caller's escrow after closing. Non-winning bidders only.
    pub fn get_deposit(&self, caller: Address) -> HandlerResult<Amount> {
        match self.execute(&CallContext::new(caller), AuctionCall::GetDeposit)? {
            CallOutcome::Withdrawn(amount) => Ok(amount),
            CallOutcome::Unit => Ok(0),
        }
    }

    // ============ Queries ============

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn rule(&self) -> Rule {
        self.state.read().rule
    }

    pub fn current_price(&self) -> Amount {
        self.state.read().current_price
    }

    pub fn current_winner(&self) -> Option<Address> {
        self.state.read().current_winner
    }

    pub fn deposit_of(&self, address: &Address) -> Amount {
        self.state.read().get_deposit(address)
    }

    /// Answer a query against one consistent view of the state.
    pub fn query(&self, query: AuctionQuery) -> AuctionQueryResponse {
        handle_query(&self.state.read(), query)
    }

    pub fn summary(&self) -> AuctionSummary {
        AuctionSummary::from_state(&self.state.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUCTIONEER: Address = [1u8; 32];
    const ALICE: Address = [2u8; 32];
    const BOB: Address = [3u8; 32];

    fn setup_engine() -> AuctionEngine {
        let engine = AuctionEngine::new(AUCTIONEER, Rule::new(50, 5)).unwrap();
        engine.register(AUCTIONEER, Some(ALICE), Some(100)).unwrap();
        engine.register(AUCTIONEER, Some(BOB), Some(100)).unwrap();
        engine.start_session(AUCTIONEER).unwrap();
        engine
    }

    #[test]
    fn test_new_rejects_invalid_rule() {
        assert!(matches!(
            AuctionEngine::new(AUCTIONEER, Rule::new(50, 0)),
            Err(GenesisValidationError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let engine = setup_engine();
        let handle = engine.clone();

        handle.bid(ALICE, Some(55)).unwrap();

        assert_eq!(engine.current_price(), 55);
        assert_eq!(engine.current_winner(), Some(ALICE));
        assert_eq!(engine.deposit_of(&ALICE), 55);
    }

    #[test]
    fn test_get_deposit_returns_escrow() {
        let engine = setup_engine();
        engine.bid(ALICE, Some(55)).unwrap();
        engine.bid(BOB, Some(60)).unwrap();
        for _ in 0..4 {
            engine.announce(AUCTIONEER).unwrap();
        }

        assert_eq!(engine.phase(), Phase::Closing);
        assert_eq!(engine.get_deposit(ALICE), Ok(55));
        assert_eq!(engine.get_deposit(BOB), Err(AuctionError::Unauthorized));
    }

    #[test]
    fn test_snapshot_and_restore() {
        let engine = setup_engine();
        engine.bid(ALICE, Some(55)).unwrap();
        engine.announce(AUCTIONEER).unwrap();

        let bytes = engine.snapshot().unwrap();
        let restored = AuctionEngine::restore(&bytes).unwrap();
        assert_eq!(restored.summary(), engine.summary());

        // The restored countdown continues where it left off
        for _ in 0..3 {
            restored.announce(AUCTIONEER).unwrap();
        }
        assert_eq!(restored.phase(), Phase::Closing);
        assert_eq!(engine.phase(), Phase::Started);
    }

    #[test]
    fn test_query_through_engine() {
        let engine = setup_engine();
        assert_eq!(
            engine.query(AuctionQuery::Rule),
            AuctionQueryResponse::Rule(Rule::new(50, 5))
        );
        assert_eq!(
            engine.query(AuctionQuery::Auctioneer),
            AuctionQueryResponse::Auctioneer(AUCTIONEER)
        );
    }
}
