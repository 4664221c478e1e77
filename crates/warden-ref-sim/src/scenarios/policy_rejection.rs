//! Scenario 2: Policy rejection
//!
//! A plan that breaks the wallet policy in several places at once is handed
//! straight to the executor, skipping the agent's own validation step.
//!
//! Pipeline walk-through:
//!   1. Policy engine reports every violation (no short-circuit)
//!   2. Executor re-validates, records the rejection, and executes nothing
//!   3. Ledger balances are unchanged; audit chain holds one rejection entry

use std::sync::Arc;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::{
    action::{Action, Amount},
    error::{WardenError, WardenResult},
    execution::TxSignature,
    plan::Plan,
    policy::PolicyViolation,
};

use crate::{
    agent::WalletAgent,
    fixtures::{
        funded_ledger, payer_credentials, sim_aggregator, BONK_MINT, LAMPORTS_PER_SOL, MALLORY,
        SOL_MINT,
    },
    scenarios::{conservative_policy, print_audit_status},
    sim::SimLedger,
};

/// Pays an unknown address too much, then swaps into a mint that is not
/// allowlisted with excessive slippage.
pub fn hostile_plan() -> Plan {
    Plan {
        goal: "Move funds out".to_string(),
        summary: Some("hand-built plan".to_string()),
        actions: vec![
            Action::Transfer {
                to: MALLORY.to_string(),
                amount: Amount::from(2 * LAMPORTS_PER_SOL),
            },
            Action::Swap {
                input_mint: SOL_MINT.to_string(),
                output_mint: BONK_MINT.to_string(),
                amount: Amount::from(LAMPORTS_PER_SOL),
                slippage_bps: Some(300),
                swap_mode: None,
            },
        ],
    }
}

pub struct Outcome {
    pub violations: Vec<PolicyViolation>,
    pub result: WardenResult<Vec<TxSignature>>,
    pub ledger: Arc<SimLedger>,
    pub audit: Arc<InMemoryAuditWriter>,
}

pub async fn execute() -> WardenResult<Outcome> {
    let ledger = Arc::new(funded_ledger());
    let audit = Arc::new(InMemoryAuditWriter::new("scenario-rejection"));
    let agent = WalletAgent::new(
        payer_credentials(),
        conservative_policy()?,
        ledger.clone(),
        Arc::new(sim_aggregator()),
        audit.clone(),
    );

    let plan = hostile_plan();
    let violations = agent.validate(&plan);
    let result = agent.execute(&plan).await;

    Ok(Outcome {
        violations,
        result,
        ledger,
        audit,
    })
}

pub async fn run_scenario() -> WardenResult<()> {
    println!("=== Scenario 2: Policy Rejection ===");
    println!();

    let outcome = execute().await?;

    println!("  Violations found:       {}", outcome.violations.len());
    for violation in &outcome.violations {
        println!("    - {violation}");
    }
    match &outcome.result {
        Err(WardenError::PolicyRejected { .. }) => {
            println!("  Executor verdict:       REJECTED (nothing executed)");
        }
        Err(e) => {
            return Err(WardenError::StateMachineError {
                reason: format!("unexpected executor error: {e}"),
            })
        }
        Ok(signatures) => {
            println!("  UNEXPECTED: executed {} action(s)", signatures.len());
        }
    }
    println!("  Ledger submissions:     {}", outcome.ledger.submissions().len());
    print_audit_status(&outcome.audit);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_contracts::execution::ExecutionEvent;

    use super::*;
    use crate::fixtures::{PAYER, PAYER_BALANCE};

    #[tokio::test]
    async fn test_every_violation_is_reported_and_nothing_runs() {
        let outcome = execute().await.unwrap();

        let paths: Vec<&str> = outcome.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "actions[0].to",
                "actions[0].amount",
                "actions[1].outputMint",
                "actions[1].slippageBps"
            ]
        );

        assert!(matches!(
            outcome.result,
            Err(WardenError::PolicyRejected { ref violations }) if violations.len() == 4
        ));
        assert!(outcome.ledger.submissions().is_empty());
        assert_eq!(outcome.ledger.balance_of(PAYER), PAYER_BALANCE);

        let trail = outcome.audit.export_log();
        assert_eq!(trail.entries.len(), 1);
        assert!(matches!(
            trail.entries[0].record.event,
            ExecutionEvent::Rejected { .. }
        ));
    }
}
