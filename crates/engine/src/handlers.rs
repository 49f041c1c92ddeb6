//! Call handlers for the auction engine.
//!
//! These functions implement the business logic for each call type. Each
//! handler runs its guards and input checks first and only then mutates the
//! state, so a rejected call leaves the auction untouched.

use auction_types::{
    address_hex, Address, Amount, AuctionEvent, Bidder, Phase, CLOSE_THRESHOLD, ZERO_ADDRESS,
};
use tracing::info;

use crate::call::{AuctionCall, CallOutcome};
use crate::error::AuctionError;
use crate::guard::{
    require_auctioneer, require_bidder, require_phase, require_refund_claimant, Operation,
};
use crate::state::AuctionState;

/// Context provided by the caller for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated principal making the call
    pub sender: Address,
}

impl CallContext {
    pub fn new(sender: Address) -> Self {
        Self { sender }
    }
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, AuctionError>;

/// Handle Register call.
pub fn handle_register(
    state: &mut AuctionState,
    ctx: &CallContext,
    bidder: Option<Address>,
    token_count: Option<Amount>,
) -> HandlerResult<()> {
    require_auctioneer(state, &ctx.sender)?;
    require_phase(state, Operation::Register)?;

    let bidder =
        bidder.ok_or_else(|| AuctionError::InvalidInput("bidder address is required".into()))?;
    let token_count =
        token_count.ok_or_else(|| AuctionError::InvalidInput("token count is required".into()))?;

    if bidder == ZERO_ADDRESS {
        return Err(AuctionError::InvalidInput(
            "zero address cannot be registered".into(),
        ));
    }
    if bidder == state.auctioneer {
        return Err(AuctionError::InvalidInput(
            "auctioneer cannot register as a bidder".into(),
        ));
    }

    // Re-registration overwrites the allowance
    state
        .bidders
        .insert(bidder, Bidder::with_allowance(token_count));
    state.events.push(AuctionEvent::Registered {
        bidder,
        token_allowance: token_count,
    });

    info!(
        "Registered bidder {} with allowance {}",
        address_hex(&bidder),
        token_count
    );
    Ok(())
}

/// Handle StartSession call.
pub fn handle_start_session(state: &mut AuctionState, ctx: &CallContext) -> HandlerResult<()> {
    require_auctioneer(state, &ctx.sender)?;
    require_phase(state, Operation::StartSession)?;

    state.phase = Phase::Started;
    state.events.push(AuctionEvent::SessionStarted);

    info!(
        "Session started at price {} with {} bidders",
        state.current_price,
        state.bidders.len()
    );
    Ok(())
}

/// Handle Bid call.
pub fn handle_bid(
    state: &mut AuctionState,
    ctx: &CallContext,
    price: Option<Amount>,
) -> HandlerResult<()> {
    require_bidder(state, &ctx.sender)?;
    require_phase(state, Operation::Bid)?;

    let price = price.ok_or_else(|| AuctionError::InvalidInput("price is required".into()))?;

    // An overflowing threshold cannot be met by any price
    let accepted = state
        .rule
        .minimum_bid(state.current_price)
        .map(|minimum| price >= minimum)
        .unwrap_or(false);
    if !accepted {
        return Err(AuctionError::BidTooLow {
            current: state.current_price,
            step: state.rule.minimum_step,
            got: price,
        });
    }

    let deposit = state
        .get_deposit(&ctx.sender)
        .checked_add(price)
        .ok_or(AuctionError::AmountOverflow)?;

    // Escrow, price, winner and countdown move together
    let bidder = state
        .bidders
        .get_mut(&ctx.sender)
        .ok_or(AuctionError::Unauthorized)?;
    bidder.deposit = deposit;
    state.current_price = price;
    state.current_winner = Some(ctx.sender);
    state.announce_count = 0;
    state.events.push(AuctionEvent::BidAccepted {
        bidder: ctx.sender,
        price,
    });

    info!(
        "Bid of {} accepted from {} (escrow now {})",
        price,
        address_hex(&ctx.sender),
        deposit
    );
    Ok(())
}

/// Handle Announce call.
///
/// The call that reaches [`CLOSE_THRESHOLD`] closes the session and still
/// succeeds.
pub fn handle_announce(state: &mut AuctionState, ctx: &CallContext) -> HandlerResult<()> {
    require_auctioneer(state, &ctx.sender)?;
    require_phase(state, Operation::Announce)?;

    state.announce_count += 1;
    let count = state.announce_count;
    state.events.push(AuctionEvent::Announced { count });
    info!("Announcement {} of {}", count, CLOSE_THRESHOLD);

    if count >= CLOSE_THRESHOLD {
        state.phase = Phase::Closing;
        state.events.push(AuctionEvent::Closed {
            winner: state.current_winner,
            price: state.current_price,
        });
        match &state.current_winner {
            Some(winner) => info!(
                "Session closed. Winner: {}, Price: {}",
                address_hex(winner),
                state.current_price
            ),
            None => info!("Session closed without bids"),
        }
    }

    Ok(())
}

/// Handle GetDeposit call.
///
/// The first call releases the whole escrow (possibly zero); later calls fail
/// with `NothingToWithdraw`.
pub fn handle_get_deposit(state: &mut AuctionState, ctx: &CallContext) -> HandlerResult<Amount> {
    require_refund_claimant(state, &ctx.sender)?;
    require_phase(state, Operation::GetDeposit)?;

    let bidder = state
        .bidders
        .get_mut(&ctx.sender)
        .ok_or(AuctionError::Unauthorized)?;
    if bidder.withdrawn {
        return Err(AuctionError::NothingToWithdraw);
    }

    let amount = bidder.deposit;
    bidder.deposit = 0;
    bidder.withdrawn = true;
    state.events.push(AuctionEvent::DepositWithdrawn {
        bidder: ctx.sender,
        amount,
    });

    info!("Deposit of {} returned to {}", amount, address_hex(&ctx.sender));
    Ok(amount)
}

/// Route a call message to its handler.
pub fn dispatch(
    state: &mut AuctionState,
    ctx: &CallContext,
    call: AuctionCall,
) -> HandlerResult<CallOutcome> {
    match call {
        AuctionCall::Register {
            bidder,
            token_count,
        } => handle_register(state, ctx, bidder, token_count).map(|_| CallOutcome::Unit),
        AuctionCall::StartSession => handle_start_session(state, ctx).map(|_| CallOutcome::Unit),
        AuctionCall::Announce => handle_announce(state, ctx).map(|_| CallOutcome::Unit),
        AuctionCall::Bid { price } => handle_bid(state, ctx, price).map(|_| CallOutcome::Unit),
        AuctionCall::GetDeposit => handle_get_deposit(state, ctx).map(CallOutcome::Withdrawn),
    }
}
