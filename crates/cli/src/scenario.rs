//! Scenario files: a genesis configuration and a script of calls.
//!
//! Principals are written as hex strings so the files stay readable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use auction_engine::{
    AuctionCall, AuctionEngine, AuctionError, AuctionGenesisConfig, BidderConfig, CallContext,
    CallOutcome, Operation,
};
use auction_types::{address_hex, parse_address, Address, Amount, Rule};

/// Errors in a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Invalid address {0:?}")]
    InvalidAddress(String),

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: Box<ScenarioError>,
    },
}

fn address(s: &str) -> Result<Address, ScenarioError> {
    parse_address(s).ok_or_else(|| ScenarioError::InvalidAddress(s.to_string()))
}

/// Genesis file with hex principals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisFile {
    pub auctioneer: String,
    #[serde(default)]
    pub rule: Rule,
    #[serde(default)]
    pub bidders: Vec<GenesisBidder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisBidder {
    pub address: String,
    pub token_allowance: Amount,
}

impl GenesisFile {
    pub fn to_config(&self) -> Result<AuctionGenesisConfig, ScenarioError> {
        let bidders = self
            .bidders
            .iter()
            .map(|b| {
                Ok(BidderConfig {
                    address: address(&b.address)?,
                    token_allowance: b.token_allowance,
                })
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        Ok(AuctionGenesisConfig {
            auctioneer: address(&self.auctioneer)?,
            rule: self.rule,
            bidders,
        })
    }
}

/// One call in a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Hex-encoded caller
    pub sender: String,
    pub action: ScriptAction,
}

/// Script form of [`AuctionCall`]. Omitted arguments stay omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    Register {
        #[serde(default)]
        bidder: Option<String>,
        #[serde(default)]
        token_count: Option<Amount>,
    },
    StartSession,
    Bid {
        #[serde(default)]
        price: Option<Amount>,
    },
    Announce,
    GetDeposit,
}

impl ScriptAction {
    pub fn to_call(&self) -> Result<AuctionCall, ScenarioError> {
        Ok(match self {
            ScriptAction::Register {
                bidder,
                token_count,
            } => AuctionCall::Register {
                bidder: bidder.as_deref().map(address).transpose()?,
                token_count: *token_count,
            },
            ScriptAction::StartSession => AuctionCall::StartSession,
            ScriptAction::Bid { price } => AuctionCall::Bid { price: *price },
            ScriptAction::Announce => AuctionCall::Announce,
            ScriptAction::GetDeposit => AuctionCall::GetDeposit,
        })
    }
}

/// Outcome of one executed step.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: usize,
    pub sender: Address,
    pub operation: Operation,
    pub result: Result<CallOutcome, AuctionError>,
}

impl StepReport {
    /// One-line human-readable rendering.
    pub fn render(&self) -> String {
        let outcome = match &self.result {
            Ok(CallOutcome::Unit) => "ok".to_string(),
            Ok(CallOutcome::Withdrawn(amount)) => format!("ok, withdrew {}", amount),
            Err(e) => format!("rejected: {}", e),
        };
        format!(
            "#{:<3} {:<12} from {}  {}",
            self.index,
            format!("{:?}", self.operation),
            &address_hex(&self.sender)[..8],
            outcome
        )
    }
}

/// Run every step against `engine`. Rejected calls are reported and the run
/// continues; only malformed steps abort it.
pub fn run_script(
    engine: &AuctionEngine,
    steps: &[ScriptStep],
) -> Result<Vec<StepReport>, ScenarioError> {
    let mut reports = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let wrap = |source: ScenarioError| ScenarioError::Step {
            index,
            source: Box::new(source),
        };
        let sender = address(&step.sender).map_err(wrap)?;
        let call = step.action.to_call().map_err(wrap)?;
        let operation = call.operation();
        let result = engine.execute(&CallContext::new(sender), call);
        reports.push(StepReport {
            index,
            sender,
            operation,
            result,
        });
    }
    Ok(reports)
}
