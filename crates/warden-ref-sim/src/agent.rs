//! The wallet agent facade: one wallet, one policy, one pipeline.
//!
//! `WalletAgent` wires the plan source, the policy engine and the executor
//! around a single set of credentials:
//!
//!   goal → propose → validate → (only if clean) execute → report
//!
//! The executor re-validates every plan it is given, so `execute` is safe to
//! call on a plan that never went through `validate`.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use warden_contracts::{
    credentials::Credentials,
    error::WardenResult,
    execution::{ExecutionReport, TxSignature},
    plan::Plan,
    policy::{summarize, PolicyViolation},
};
use warden_core::{
    traits::{AuditWriter, Confirmer, LedgerClient, PlanValidator, SwapClient},
    ExecutionCoordinator, ExecutionOptions,
};
use warden_planner::PlanSource;
use warden_policy::{WalletPolicy, WalletPolicyEngine};

use crate::config::AgentConfig;

pub const DEFAULT_MAX_ACTIONS: usize = 4;

/// What `WalletAgent::run` did with one goal.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub plan: Plan,
    /// Empty when the plan was handed to the executor.
    pub violations: Vec<PolicyViolation>,
    /// `None` when validation failed and nothing was executed.
    pub report: Option<ExecutionReport>,
}

impl AgentRun {
    pub fn executed(&self) -> bool {
        self.report.is_some()
    }

    pub fn signatures(&self) -> Vec<TxSignature> {
        self.report
            .as_ref()
            .map(ExecutionReport::signatures)
            .unwrap_or_default()
    }
}

pub struct WalletAgent {
    credentials: Credentials,
    policy: WalletPolicyEngine,
    planner: PlanSource,
    coordinator: ExecutionCoordinator,
    ledger: Arc<dyn LedgerClient>,
    max_actions: usize,
}

impl WalletAgent {
    /// An agent with no inference configured, auto-approval and default
    /// execution options.
    pub fn new(
        credentials: Credentials,
        policy: WalletPolicy,
        ledger: Arc<dyn LedgerClient>,
        swaps: Arc<dyn SwapClient>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        let policy = WalletPolicyEngine::new(policy);
        let coordinator =
            ExecutionCoordinator::new(Box::new(policy.clone()), ledger.clone(), swaps, audit);

        Self {
            credentials,
            policy,
            planner: PlanSource::without_inference(),
            coordinator,
            ledger,
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }

    /// Build an agent from a loaded `AgentConfig`.
    pub fn from_config(
        config: &AgentConfig,
        credentials: Credentials,
        ledger: Arc<dyn LedgerClient>,
        swaps: Arc<dyn SwapClient>,
        audit: Arc<dyn AuditWriter>,
    ) -> WardenResult<Self> {
        let planner = config.planner.plan_source()?;
        Ok(
            Self::new(credentials, config.policy.clone(), ledger, swaps, audit)
                .with_plan_source(planner)
                .with_max_actions(config.planner.max_actions)
                .with_options(config.execution.into()),
        )
    }

    pub fn with_plan_source(mut self, planner: PlanSource) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.coordinator = self.coordinator.with_confirmer(confirmer);
        self
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.coordinator = self.coordinator.with_options(options);
        self
    }

    pub fn wallet_address(&self) -> &str {
        self.credentials.public_key()
    }

    pub fn policy(&self) -> &WalletPolicy {
        self.policy.policy()
    }

    /// The context handed to the planner: who we are, what we hold, and the
    /// limits any plan will be checked against.
    ///
    /// A failed balance lookup is reported as `null` rather than failing the
    /// proposal.
    pub async fn planning_context(&self) -> Value {
        let balance = match self.ledger.get_balance(self.wallet_address()).await {
            Ok(lamports) => json!(lamports),
            Err(e) => {
                warn!(error = %e, "balance lookup failed; planning without it");
                Value::Null
            }
        };
        let policy = self.policy();

        json!({
            "walletAddress": self.wallet_address(),
            "balanceLamports": balance,
            "allowedRecipients": policy.allowed_recipients,
            "allowedMints": policy.allowed_mints,
            "maxTransferLamports": policy.max_transfer_lamports,
            "maxSwapAmount": policy.max_swap_amount,
            "maxSlippageBps": policy.max_slippage_bps,
        })
    }

    pub async fn propose(&self, goal: &str) -> WardenResult<Plan> {
        let context = self.planning_context().await;
        self.planner
            .propose_plan(goal, &context, self.max_actions)
            .await
    }

    pub fn validate(&self, plan: &Plan) -> Vec<PolicyViolation> {
        self.policy.validate(plan)
    }

    pub async fn execute(&self, plan: &Plan) -> WardenResult<Vec<TxSignature>> {
        self.coordinator.execute(plan, &self.credentials).await
    }

    pub async fn execute_with_report(&self, plan: &Plan) -> WardenResult<ExecutionReport> {
        self.coordinator
            .execute_with_report(plan, &self.credentials)
            .await
    }

    /// Propose a plan for `goal`, validate it, and execute it only if it has
    /// no violations.
    pub async fn run(&self, goal: &str) -> WardenResult<AgentRun> {
        let plan = self.propose(goal).await?;

        let violations = self.validate(&plan);
        if !violations.is_empty() {
            warn!(
                goal,
                violations = %summarize(&violations),
                "proposed plan rejected; nothing executed"
            );
            return Ok(AgentRun {
                plan,
                violations,
                report: None,
            });
        }

        let report = self.execute_with_report(&plan).await?;
        info!(
            goal,
            state = report.final_state.name(),
            signatures = report.signatures().len(),
            "goal processed"
        );
        Ok(AgentRun {
            plan,
            violations,
            report: Some(report),
        })
    }
}
