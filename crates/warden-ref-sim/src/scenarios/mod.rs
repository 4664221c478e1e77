//! Reference wallet scenarios.
//!
//! Each scenario wires real WARDEN components (policy engine, executor, audit
//! trail, planner normalization) to the simulated collaborators and walks one
//! distinct enforcement path.

pub mod allowlisted_transfer;
pub mod confirmation_gate;
pub mod partial_failure;
pub mod policy_rejection;
pub mod proposal_cleanup;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::error::WardenResult;
use warden_policy::WalletPolicy;

/// The policy every scenario runs under.
pub const CONSERVATIVE_POLICY: &str = include_str!("../../policies/conservative.toml");

pub fn conservative_policy() -> WardenResult<WalletPolicy> {
    Ok(warden_policy::WalletPolicyEngine::from_toml_str(CONSERVATIVE_POLICY)?
        .policy()
        .clone())
}

pub(crate) fn print_audit_status(audit: &InMemoryAuditWriter) {
    let trail = audit.export_log();
    println!(
        "  Audit chain integrity:  {} ({} entr{} in chain)",
        if audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
        trail.entries.len(),
        if trail.entries.len() == 1 { "y" } else { "ies" }
    );
}

/// Run every scenario in order.
pub async fn run_all() -> WardenResult<()> {
    allowlisted_transfer::run_scenario().await?;
    policy_rejection::run_scenario().await?;
    partial_failure::run_scenario().await?;
    confirmation_gate::run_scenario().await?;
    proposal_cleanup::run_scenario().await?;
    Ok(())
}
