//! CLI for replaying auction scenarios.
//!
//! This binary provides commands for:
//! - Running a call script against a fresh auction
//! - Inspecting a saved auction snapshot

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use auction_cli::{run_script, GenesisFile, ScriptStep};
use auction_engine::{AuctionEngine, AuctionQuery, AuctionQueryResponse};
use auction_types::address_hex;

#[derive(Parser)]
#[command(name = "auction-cli")]
#[command(about = "Replay and inspect countdown auctions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a call script against a fresh auction
    Run {
        /// Genesis file (JSON)
        #[arg(long)]
        genesis: PathBuf,

        /// Script of calls (JSON array of steps)
        #[arg(long)]
        script: PathBuf,

        /// Write a snapshot of the final state here
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },

    /// Print the state held in a snapshot
    Inspect {
        /// Snapshot written by `run --snapshot-out`
        #[arg(long)]
        snapshot: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn run_cmd(genesis: &Path, script: &Path, snapshot_out: Option<&Path>) -> Result<()> {
    let genesis: GenesisFile = read_json(genesis)?;
    let steps: Vec<ScriptStep> = read_json(script)?;

    let engine = AuctionEngine::from_genesis(&genesis.to_config()?)?;
    let reports = run_script(&engine, &steps)?;

    let rejected = reports.iter().filter(|r| r.result.is_err()).count();
    for report in &reports {
        println!("{}", report.render());
    }
    println!();
    println!(
        "{} steps, {} accepted, {} rejected",
        reports.len(),
        reports.len() - rejected,
        rejected
    );
    print_summary(&engine);

    if let Some(path) = snapshot_out {
        let bytes = engine.snapshot()?;
        fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("Snapshot of {} bytes written to {}", bytes.len(), path.display());
    }

    Ok(())
}

fn inspect_cmd(snapshot: &Path) -> Result<()> {
    let bytes = fs::read(snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
    let engine = AuctionEngine::restore(&bytes)?;
    print_summary(&engine);
    Ok(())
}

fn print_summary(engine: &AuctionEngine) {
    let summary = engine.summary();
    println!("Auction:");
    println!("  Auctioneer: {}", address_hex(&summary.auctioneer));
    println!(
        "  Rule: starting price {}, minimum step {}",
        summary.rule.starting_price, summary.rule.minimum_step
    );
    println!("  Phase: {}", summary.phase);
    println!("  Price: {}", summary.current_price);
    match summary.current_winner {
        Some(winner) => println!("  Winner: {}", address_hex(&winner)),
        None => println!("  Winner: none"),
    }
    println!("  Announcements: {}", summary.announce_count);
    println!("  Escrow held: {}", summary.total_escrow);

    if let AuctionQueryResponse::Bidders(bidders) = engine.query(AuctionQuery::Bidders) {
        println!("  Bidders ({}):", bidders.len());
        for (address, bidder) in bidders {
            println!(
                "    {}  allowance={} deposit={}{}",
                address_hex(&address),
                bidder.token_allowance,
                bidder.deposit,
                if bidder.withdrawn { " (withdrawn)" } else { "" }
            );
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction_cli=info".parse()?)
                .add_directive("auction_engine=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            genesis,
            script,
            snapshot_out,
        } => run_cmd(&genesis, &script, snapshot_out.as_deref()),

        Commands::Inspect { snapshot } => {
            if !snapshot.exists() {
                return Err(anyhow!("Snapshot {} not found", snapshot.display()));
            }
            inspect_cmd(&snapshot)
        }
    }
}
