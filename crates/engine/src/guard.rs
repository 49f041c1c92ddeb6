//! Access and phase guards.
//!
//! Every handler consults these before touching state: first the caller's
//! role, then the phase table. Both checks are read-only.

use auction_types::{Address, Phase};
use serde::{Deserialize, Serialize};

use crate::error::AuctionError;
use crate::handlers::HandlerResult;
use crate::state::AuctionState;

/// The operations exposed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Register,
    StartSession,
    Bid,
    Announce,
    GetDeposit,
}

impl Operation {
    /// Phase each operation requires.
    pub const fn required_phase(self) -> Phase {
        match self {
            Operation::Register | Operation::StartSession => Phase::Created,
            Operation::Bid | Operation::Announce => Phase::Started,
            Operation::GetDeposit => Phase::Closing,
        }
    }
}

/// Fail with `InvalidState` unless the auction is in the phase `op` requires.
pub fn require_phase(state: &AuctionState, op: Operation) -> HandlerResult<()> {
    let expected = op.required_phase();
    if state.phase != expected {
        return Err(AuctionError::InvalidState {
            expected,
            got: state.phase,
        });
    }
    Ok(())
}

/// Caller must be the auctioneer.
pub fn require_auctioneer(state: &AuctionState, sender: &Address) -> HandlerResult<()> {
    if *sender != state.auctioneer {
        return Err(AuctionError::Unauthorized);
    }
    Ok(())
}

/// Caller must be a registered bidder. The auctioneer never is.
pub fn require_bidder(state: &AuctionState, sender: &Address) -> HandlerResult<()> {
    if *sender == state.auctioneer || !state.is_registered(sender) {
        return Err(AuctionError::Unauthorized);
    }
    Ok(())
}

/// Caller must be a registered bidder other than the current winner.
pub fn require_refund_claimant(state: &AuctionState, sender: &Address) -> HandlerResult<()> {
    require_bidder(state, sender)?;
    if state.current_winner.as_ref() == Some(sender) {
        return Err(AuctionError::Unauthorized);
    }
    Ok(())
}
