//! Scenario 5: Proposal cleanup
//!
//! The model answers inside a markdown fence, over the action cap, with two
//! entries that do not match any action shape. Normalization keeps the plan's
//! shape and neutralizes the bad entries before the policy ever sees them.
//!
//! Pipeline walk-through:
//!   1. Inference content arrives fenced; the fence is stripped
//!   2. Six proposed actions are cut to the first four
//!   3. An unknown `stake` action and a fractional amount become `Noop`s in place
//!   4. The remaining transfers pass policy and execute

use std::sync::Arc;

use serde_json::Value;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::error::WardenResult;
use warden_planner::{openai::parse_content, PlanSource};

use crate::{
    agent::{AgentRun, WalletAgent},
    fixtures::{funded_ledger, payer_credentials, sim_aggregator, ALICE, BOB, SOL_MINT, USDC_MINT},
    scenarios::{conservative_policy, print_audit_status},
    sim::{ScriptedInference, SimLedger},
};

pub const MAX_ACTIONS: usize = 4;

/// Raw message content as a chat model might return it.
pub fn raw_content() -> String {
    format!(
        r#"```json
{{
  "summary": "pay both friends",
  "actions": [
    {{ "type": "transfer", "to": "{ALICE}", "amount": 1500 }},
    {{ "type": "stake", "validator": "{BOB}", "amount": "100" }},
    {{ "type": "swap", "inputMint": "{SOL_MINT}", "outputMint": "{USDC_MINT}", "amount": 0.5 }},
    {{ "type": "transfer", "to": "{BOB}", "amount": "2500" }},
    {{ "type": "transfer", "to": "{ALICE}", "amount": "9" }},
    {{ "type": "noop", "reason": "done" }}
  ]
}}
```"#
    )
}

pub async fn execute() -> WardenResult<(AgentRun, Arc<SimLedger>, Arc<InMemoryAuditWriter>)> {
    let response: Value = parse_content(&raw_content());

    let ledger = Arc::new(funded_ledger());
    let audit = Arc::new(InMemoryAuditWriter::new("scenario-cleanup"));
    let inference = Arc::new(ScriptedInference::new().then_respond(response));

    let agent = WalletAgent::new(
        payer_credentials(),
        conservative_policy()?,
        ledger.clone(),
        Arc::new(sim_aggregator()),
        audit.clone(),
    )
    .with_plan_source(PlanSource::new(inference))
    .with_max_actions(MAX_ACTIONS);

    let run = agent.run("Pay Alice and Bob").await?;
    Ok((run, ledger, audit))
}

pub async fn run_scenario() -> WardenResult<()> {
    println!("=== Scenario 5: Proposal Cleanup ===");
    println!();
    println!("  Model proposed 6 actions (2 malformed), cap is {MAX_ACTIONS}");
    println!();

    let (run, ledger, audit) = execute().await?;

    println!("  Normalized plan:");
    for (index, action) in run.plan.actions.iter().enumerate() {
        println!("    [{index}] {}", serde_json::to_string(action).unwrap_or_default());
    }
    println!("  Policy violations:      {}", run.violations.len());
    println!("  Signatures:             {}", run.signatures().len());
    println!("  Ledger submissions:     {}", ledger.submissions().len());
    print_audit_status(&audit);
    println!();
    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}
