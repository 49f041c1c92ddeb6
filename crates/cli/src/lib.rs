//! Offline tooling for the countdown auction.
//!
//! This crate provides:
//! - Scenario files (genesis + call script) with hex principals
//! - A runner that replays a script against an engine and reports each step

pub mod scenario;

pub use scenario::{run_script, GenesisFile, ScenarioError, ScriptAction, ScriptStep, StepReport};
