//! Scenario 1: Allowlisted transfer and swap
//!
//! The happy path. The model proposes a transfer to an allowlisted recipient
//! and a SOL→USDC swap inside every limit.
//!
//! Pipeline walk-through:
//!   1. Agent builds the planning context (address, balance, limits)
//!   2. Scripted inference returns the proposal; normalization accepts both actions
//!   3. Policy engine finds no violations
//!   4. Executor re-validates, then dispatches transfer and swap in order
//!   5. Each outcome is written to the audit chain; chain verified at the end

use std::sync::Arc;

use serde_json::json;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::error::WardenResult;
use warden_planner::PlanSource;

use crate::{
    agent::{AgentRun, WalletAgent},
    fixtures::{
        funded_ledger, payer_credentials, sim_aggregator, ALICE, LAMPORTS_PER_SOL, SOL_MINT,
        USDC_MINT,
    },
    scenarios::{conservative_policy, print_audit_status},
    sim::{ScriptedInference, SimLedger},
};

pub const GOAL: &str = "Send 0.25 SOL to Alice, then swap 1 SOL into USDC";

fn proposal() -> serde_json::Value {
    json!({
        "summary": "pay Alice and rebalance into USDC",
        "actions": [
            { "type": "transfer", "to": ALICE, "amount": (LAMPORTS_PER_SOL / 4).to_string() },
            {
                "type": "swap",
                "inputMint": SOL_MINT,
                "outputMint": USDC_MINT,
                "amount": LAMPORTS_PER_SOL,
                "slippageBps": 50
            }
        ]
    })
}

/// Run the scenario against fresh collaborators and return what happened.
pub async fn execute() -> WardenResult<(AgentRun, Arc<SimLedger>, Arc<InMemoryAuditWriter>)> {
    let ledger = Arc::new(funded_ledger());
    let audit = Arc::new(InMemoryAuditWriter::new("scenario-allowlisted"));
    let inference = Arc::new(ScriptedInference::new().then_respond(proposal()));

    let agent = WalletAgent::new(
        payer_credentials(),
        conservative_policy()?,
        ledger.clone(),
        Arc::new(sim_aggregator()),
        audit.clone(),
    )
    .with_plan_source(PlanSource::new(inference));

    let run = agent.run(GOAL).await?;
    Ok((run, ledger, audit))
}

pub async fn run_scenario() -> WardenResult<()> {
    println!("=== Scenario 1: Allowlisted Transfer and Swap ===");
    println!();
    println!("  Goal: {GOAL}");
    println!();

    let (run, ledger, audit) = execute().await?;

    println!("  Proposed actions:       {}", run.plan.actions.len());
    println!("  Policy violations:      {}", run.violations.len());
    if let Some(report) = &run.report {
        println!("  Final state:            {}", report.final_state.name());
        for (index, outcome) in report.outcomes.iter().enumerate() {
            println!("    [{index}] {}: {:?}", run.plan.actions[index].kind(), outcome);
        }
    }
    println!("  Alice balance:          {} lamports", ledger.balance_of(ALICE));
    print_audit_status(&audit);
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_contracts::execution::ExecutionState;

    use super::*;

    #[tokio::test]
    async fn test_both_actions_execute_in_order() {
        let (run, ledger, audit) = execute().await.unwrap();

        assert!(run.violations.is_empty());
        let report = run.report.unwrap();
        assert!(matches!(
            report.final_state,
            ExecutionState::Completed { ref signatures } if signatures.len() == 2
        ));
        assert_eq!(ledger.balance_of(ALICE), LAMPORTS_PER_SOL / 4);
        assert_eq!(audit.len(), 2);
        assert!(audit.verify_integrity());
    }
}
