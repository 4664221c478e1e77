//! # warden-ref-sim
//!
//! Reference wallet agent for the WARDEN runtime.
//!
//! Wires the planner, the policy engine, the executor and the audit trail
//! around simulated collaborators, and demonstrates five enforcement paths:
//!
//! 1. **Allowlisted transfer and swap** — the happy path end to end.
//! 2. **Policy rejection** — every violation reported, nothing executed.
//! 3. **Partial failure** — a mid-plan failure keeps prior signatures and
//!    skips the rest.
//! 4. **Confirmation gate** — declined actions are skipped without a call.
//! 5. **Proposal cleanup** — malformed model output neutralized before policy.
//!
//! All addresses are fictional. No network calls are made unless a config
//! enables the HTTP planner.

pub mod agent;
pub mod config;
pub mod fixtures;
pub mod scenarios;
pub mod sim;

pub use agent::{AgentRun, WalletAgent};
pub use config::AgentConfig;
