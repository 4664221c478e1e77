//! Scenario 3: Partial failure
//!
//! A valid three-action plan whose second action fails at submission. The
//! first transfer has already settled and is not rolled back; the third is
//! never attempted.
//!
//! Pipeline walk-through:
//!   1. Policy engine accepts the plan
//!   2. Transfer to Alice settles → signature recorded
//!   3. Swap quotes, then fails at submission (aggregator outage on USDC)
//!   4. Executor stops: `ActionFailed { index: 1, completed: [sig] }`
//!   5. Transfer to Bob never reaches the ledger

use std::sync::Arc;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::{
    action::{Action, Amount},
    error::{WardenError, WardenResult},
    execution::TxSignature,
    plan::Plan,
};

use crate::{
    agent::WalletAgent,
    fixtures::{
        funded_ledger, payer_credentials, sim_aggregator, ALICE, BOB, LAMPORTS_PER_SOL, SOL_MINT,
        USDC_MINT,
    },
    scenarios::{conservative_policy, print_audit_status},
    sim::SimLedger,
};

pub fn plan() -> Plan {
    Plan {
        goal: "Pay Alice, buy USDC, pay Bob".to_string(),
        summary: None,
        actions: vec![
            Action::Transfer {
                to: ALICE.to_string(),
                amount: Amount::from(LAMPORTS_PER_SOL / 2),
            },
            Action::Swap {
                input_mint: SOL_MINT.to_string(),
                output_mint: USDC_MINT.to_string(),
                amount: Amount::from(LAMPORTS_PER_SOL),
                slippage_bps: None,
                swap_mode: None,
            },
            Action::Transfer {
                to: BOB.to_string(),
                amount: Amount::from(LAMPORTS_PER_SOL / 10),
            },
        ],
    }
}

pub async fn execute() -> WardenResult<(
    WardenResult<Vec<TxSignature>>,
    Arc<SimLedger>,
    Arc<InMemoryAuditWriter>,
)> {
    let ledger = Arc::new(funded_ledger());
    let audit = Arc::new(InMemoryAuditWriter::new("scenario-partial"));
    let agent = WalletAgent::new(
        payer_credentials(),
        conservative_policy()?,
        ledger.clone(),
        Arc::new(sim_aggregator().fail_on_mint(USDC_MINT)),
        audit.clone(),
    );

    let result = agent.execute(&plan()).await;
    Ok((result, ledger, audit))
}

pub async fn run_scenario() -> WardenResult<()> {
    println!("=== Scenario 3: Partial Failure ===");
    println!();

    let (result, ledger, audit) = execute().await?;

    match &result {
        Err(WardenError::ActionFailed {
            index,
            completed,
            source,
        }) => {
            println!("  Failed at action:       {index}");
            println!("  Cause:                  {source}");
            println!("  Already settled:        {} signature(s)", completed.len());
            for signature in completed {
                println!("    - {signature}");
            }
        }
        Err(e) => println!("  Unexpected error:       {e}"),
        Ok(signatures) => {
            println!("  UNEXPECTED: completed with {} signature(s)", signatures.len())
        }
    }
    println!("  Alice balance:          {} lamports", ledger.balance_of(ALICE));
    println!("  Bob balance:            {} lamports", ledger.balance_of(BOB));
    print_audit_status(&audit);
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_contracts::{
        error::CollaboratorError,
        execution::{ActionOutcome, ExecutionEvent},
    };

    use super::*;

    #[tokio::test]
    async fn test_failure_keeps_prior_signature_and_skips_rest() {
        let (result, ledger, audit) = execute().await.unwrap();

        let submissions = ledger.submissions();
        assert_eq!(submissions.len(), 1, "only the first transfer may settle");

        match result {
            Err(WardenError::ActionFailed {
                index,
                completed,
                source,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(completed, vec![submissions[0].signature.clone()]);
                assert!(matches!(source, CollaboratorError::Network { .. }));
            }
            other => panic!("expected ActionFailed, got {:?}", other),
        }

        assert_eq!(ledger.balance_of(ALICE), LAMPORTS_PER_SOL / 2);
        assert_eq!(ledger.balance_of(BOB), 0);

        let trail = audit.export_log();
        assert_eq!(trail.entries.len(), 2);
        assert!(matches!(
            &trail.entries[1].record.event,
            ExecutionEvent::Action { index: 1, outcome: ActionOutcome::Failed { .. }, .. }
        ));
        assert!(audit.verify_integrity());
    }
}
