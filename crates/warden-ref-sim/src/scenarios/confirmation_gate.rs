//! Scenario 4: Confirmation gate
//!
//! A valid plan runs under a confirmer that signs off on transfers but
//! declines every swap. Declined actions are skipped without any collaborator
//! call; the rest of the plan continues.

use std::sync::Arc;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::{
    action::{Action, Amount},
    error::WardenResult,
    execution::ExecutionReport,
    plan::Plan,
};
use warden_core::confirm::FnConfirmer;

use crate::{
    agent::WalletAgent,
    fixtures::{
        funded_ledger, payer_credentials, sim_aggregator, ALICE, BOB, SOL_MINT, USDC_MINT,
    },
    scenarios::{conservative_policy, print_audit_status},
    sim::{SimLedger, SimSwapAggregator},
};

pub fn plan() -> Plan {
    Plan {
        goal: "Pay Alice, swap into USDC, pay Bob".to_string(),
        summary: None,
        actions: vec![
            Action::Transfer {
                to: ALICE.to_string(),
                amount: Amount::from(1_000),
            },
            Action::Swap {
                input_mint: SOL_MINT.to_string(),
                output_mint: USDC_MINT.to_string(),
                amount: Amount::from(5_000),
                slippage_bps: Some(25),
                swap_mode: None,
            },
            Action::Transfer {
                to: BOB.to_string(),
                amount: Amount::from(2_000),
            },
        ],
    }
}

/// Approves anything that is not a swap.
pub fn transfers_only() -> FnConfirmer<impl Fn(usize, &Action) -> bool + Send + Sync> {
    FnConfirmer(|_index: usize, action: &Action| !matches!(action, Action::Swap { .. }))
}

pub async fn execute() -> WardenResult<(
    ExecutionReport,
    Arc<SimLedger>,
    Arc<SimSwapAggregator>,
    Arc<InMemoryAuditWriter>,
)> {
    let ledger = Arc::new(funded_ledger());
    let swaps = Arc::new(sim_aggregator());
    let audit = Arc::new(InMemoryAuditWriter::new("scenario-confirmation"));
    let agent = WalletAgent::new(
        payer_credentials(),
        conservative_policy()?,
        ledger.clone(),
        swaps.clone(),
        audit.clone(),
    )
    .with_confirmer(Box::new(transfers_only()));

    let report = agent.execute_with_report(&plan()).await?;
    Ok((report, ledger, swaps, audit))
}

pub async fn run_scenario() -> WardenResult<()> {
    println!("=== Scenario 4: Confirmation Gate ===");
    println!();
    println!("  Confirmer: approve transfers, decline swaps");
    println!();

    let (report, ledger, swaps, audit) = execute().await?;
    let plan = plan();

    for (index, outcome) in report.outcomes.iter().enumerate() {
        println!("    [{index}] {}: {:?}", plan.actions[index].kind(), outcome);
    }
    println!("  Final state:            {}", report.final_state.name());
    println!("  Ledger submissions:     {}", ledger.submissions().len());
    println!("  Swaps executed:         {}", swaps.executed().len());
    print_audit_status(&audit);
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_contracts::execution::{ActionOutcome, ExecutionState};

    use super::*;

    #[tokio::test]
    async fn test_declined_swap_is_skipped_and_plan_continues() {
        let (report, ledger, swaps, audit) = execute().await.unwrap();

        assert!(matches!(report.outcomes[0], ActionOutcome::Executed { .. }));
        assert_eq!(report.outcomes[1], ActionOutcome::Declined);
        assert!(matches!(report.outcomes[2], ActionOutcome::Executed { .. }));
        assert!(matches!(report.final_state, ExecutionState::Completed { .. }));

        assert_eq!(report.signatures().len(), 2);
        assert_eq!(ledger.submissions().len(), 2);
        assert!(swaps.executed().is_empty());
        assert_eq!(audit.len(), 3);
    }
}
