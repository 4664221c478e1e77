//! WARDEN Wallet Agent — Demo CLI
//!
//! Runs the reference scenarios against simulated collaborators, checks a plan
//! file against a policy file, or drives a configured agent for one goal.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- scenario partial-failure
//!   cargo run -p demo -- validate --plan plan.json --policy policy.toml
//!   cargo run -p demo -- audit
//!   cargo run -p demo -- agent --config agent.toml "pay alice 1000 lamports"

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use warden_audit::InMemoryAuditWriter;
use warden_contracts::{
    error::{WardenError, WardenResult},
    plan::Plan,
};
use warden_policy::{validate_plan, WalletPolicyEngine};
use warden_ref_sim::{
    fixtures::{funded_ledger, payer_credentials, sim_aggregator},
    scenarios::{
        allowlisted_transfer, confirmation_gate, partial_failure, policy_rejection,
        proposal_cleanup, run_all,
    },
    AgentConfig, WalletAgent,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// WARDEN — Policy-gated wallet agent demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "WARDEN wallet agent reference demo",
    long_about = "Runs WARDEN demo scenarios showing plan normalization, policy enforcement,\n\
                  confirmation gating, partial-failure handling, and audit chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Run a single scenario.
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,
    },
    /// Check a plan JSON file against a wallet policy TOML file.
    Validate {
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        policy: PathBuf,
    },
    /// Run the happy-path scenario and print its audit trail as JSON.
    Audit,
    /// Run one goal through an agent built from a config file, against the
    /// simulated ledger and swap aggregator.
    Agent {
        #[arg(long)]
        config: PathBuf,
        goal: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioName {
    AllowlistedTransfer,
    PolicyRejection,
    PartialFailure,
    ConfirmationGate,
    ProposalCleanup,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all().await
        }
        Command::Scenario { name } => {
            print_banner();
            run_scenario(name).await
        }
        Command::Validate { plan, policy } => validate(&plan, &policy),
        Command::Audit => print_audit().await,
        Command::Agent { config, goal } => run_agent(&config, &goal).await,
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run_scenario(name: ScenarioName) -> WardenResult<()> {
    match name {
        ScenarioName::AllowlistedTransfer => allowlisted_transfer::run_scenario().await,
        ScenarioName::PolicyRejection => policy_rejection::run_scenario().await,
        ScenarioName::PartialFailure => partial_failure::run_scenario().await,
        ScenarioName::ConfirmationGate => confirmation_gate::run_scenario().await,
        ScenarioName::ProposalCleanup => proposal_cleanup::run_scenario().await,
    }
}

fn validate(plan_path: &Path, policy_path: &Path) -> WardenResult<()> {
    let engine = WalletPolicyEngine::from_file(policy_path)?;
    let contents = std::fs::read_to_string(plan_path).map_err(|e| WardenError::ConfigError {
        reason: format!("failed to read plan file '{}': {}", plan_path.display(), e),
    })?;
    let plan: Plan = serde_json::from_str(&contents).map_err(|e| WardenError::ConfigError {
        reason: format!("failed to parse plan JSON: {}", e),
    })?;

    let violations = validate_plan(&plan, engine.policy());
    if violations.is_empty() {
        println!("OK: {} action(s), no violations", plan.actions.len());
        return Ok(());
    }

    for violation in &violations {
        println!("{violation}");
    }
    Err(WardenError::PolicyRejected { violations })
}

async fn print_audit() -> WardenResult<()> {
    let (_, _, audit) = allowlisted_transfer::execute().await?;
    let trail = audit.export_log();
    let json = serde_json::to_string_pretty(&trail).map_err(|e| WardenError::AuditWriteFailed {
        reason: format!("failed to serialize audit trail: {e}"),
        completed: Vec::new(),
    })?;

    println!("{json}");
    eprintln!(
        "integrity: {}",
        if audit.verify_integrity() { "verified" } else { "FAILED" }
    );
    Ok(())
}

async fn run_agent(config_path: &Path, goal: &str) -> WardenResult<()> {
    let config = AgentConfig::from_file(config_path)?;
    let audit = Arc::new(InMemoryAuditWriter::new("demo-agent"));
    let agent = WalletAgent::from_config(
        &config,
        payer_credentials(),
        Arc::new(funded_ledger()),
        Arc::new(sim_aggregator()),
        audit.clone(),
    )?;

    info!(wallet = agent.wallet_address(), goal, "running goal");
    let run = agent.run(goal).await?;

    println!("Plan: {}", run.plan.summary.as_deref().unwrap_or("(no summary)"));
    for (index, action) in run.plan.actions.iter().enumerate() {
        println!("  [{index}] {}", serde_json::to_string(action).unwrap_or_default());
    }
    if !run.violations.is_empty() {
        println!("Rejected:");
        for violation in &run.violations {
            println!("  - {violation}");
        }
    }
    if let Some(report) = &run.report {
        println!("Final state: {}", report.final_state.name());
        for signature in report.signatures() {
            println!("  {signature}");
        }
    }
    println!(
        "Audit: {} entr(ies), integrity {}",
        audit.len(),
        if audit.verify_integrity() { "verified" } else { "FAILED" }
    );
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("WARDEN — Policy-gated Wallet Agent");
    println!("Reference Demo (simulated ledger)");
    println!("==================================");
    println!();
    println!("WARDEN pipeline per goal:");
    println!("  [1] Planner asks the model, normalizes the answer into a Plan");
    println!("  [2] Policy engine checks every action → list of violations");
    println!("  [3] Executor re-validates; any violation → nothing executes");
    println!("  [4] Each action: confirm → dispatch → audit, strictly in order");
    println!("  [5] First failure stops the plan; prior signatures are kept");
    println!();
}
