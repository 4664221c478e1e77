//! The WARDEN executor: walks a validated plan one action at a time.
//!
//! The executor enforces the WARDEN execution model:
//!
//!   Validate → for each action: Confirm → Dispatch → Audit
//!
//! The invariant is absolute: no ledger or swap collaborator is called for a
//! plan unless `PlanValidator::validate()` returned no violations for that
//! exact plan, and never for an action the confirmer refused. This is enforced
//! structurally: `dispatch()` is only reachable past both checks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use warden_contracts::{
    action::{Action, SwapRequest},
    credentials::Credentials,
    error::{CollaboratorError, WardenError, WardenResult},
    execution::{
        ActionOutcome, ExecutionEvent, ExecutionId, ExecutionRecord, ExecutionReport,
        ExecutionState, TxSignature,
    },
    plan::Plan,
    policy::summarize,
};

use crate::{
    confirm::AutoApprove,
    state::advance,
    traits::{
        AuditWriter, CollaboratorResult, Confirmer, LedgerClient, PlanValidator, SwapClient,
    },
};

/// Slippage used for a swap that does not name one, in basis points.
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

/// Knobs that apply to every action the executor dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Wait for each submitted transaction to settle before the next action.
    pub wait_for_settlement: bool,
    /// Slippage passed to the swap collaborator when an action omits it.
    /// Clamped to the validator's `max_slippage_bps()` when it has one.
    pub default_slippage_bps: u16,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            wait_for_settlement: true,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }
}

/// Executes plans against the ledger and swap collaborators.
///
/// One executor serves any number of plan executions. It holds only shared,
/// immutable handles; all per-execution state lives inside the `execute`
/// call, so independent plans may run concurrently on the same executor.
pub struct ExecutionCoordinator {
    validator: Box<dyn PlanValidator>,
    ledger: Arc<dyn LedgerClient>,
    swaps: Arc<dyn SwapClient>,
    confirmer: Box<dyn Confirmer>,
    audit: Arc<dyn AuditWriter>,
    options: ExecutionOptions,
}

impl ExecutionCoordinator {
    /// Create an executor that auto-approves every action and waits for
    /// settlement. Use `with_confirmer` and `with_options` to change either.
    pub fn new(
        validator: Box<dyn PlanValidator>,
        ledger: Arc<dyn LedgerClient>,
        swaps: Arc<dyn SwapClient>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        Self {
            validator,
            ledger,
            swaps,
            confirmer: Box::new(AutoApprove),
            audit,
            options: ExecutionOptions::default(),
        }
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExecutionOptions {
        self.options
    }

    /// Execute `plan`, returning the signatures of every executed action.
    ///
    /// # Errors
    ///
    /// - `PolicyRejected` if the plan has any violation; nothing was executed.
    /// - `ActionFailed` if a collaborator failed; `completed` carries the
    ///   signatures of the actions that took effect before it.
    /// - `AuditWriteFailed` if a decision could not be recorded; `completed`
    ///   carries every signature that settled before the write failed.
    /// - `StateMachineError` for an illegal state transition.
    pub async fn execute(
        &self,
        plan: &Plan,
        credentials: &Credentials,
    ) -> WardenResult<Vec<TxSignature>> {
        self.execute_with_report(plan, credentials).await?.into_result()
    }

    /// Execute `plan` and return the full report.
    ///
    /// # Pipeline
    ///
    /// 1. Re-validate the plan. Any violation → audit, return `Rejected`.
    /// 2. For each action, in order:
    ///    a. ask the confirmer; `false` → `Declined`, no collaborator call
    ///    b. `Noop` → `Skipped`
    ///    c. `Transfer` → ledger transfer
    ///    d. `Swap` → quote, check the quote, execute
    ///    e. audit the outcome
    /// 3. The first collaborator failure ends the walk in `Failed`; later
    ///    actions are never attempted.
    ///
    /// Rejection and collaborator failure are reported through
    /// `final_state`, not as `Err`. `Err` means the executor itself could not
    /// proceed (audit write failure, illegal state transition).
    pub async fn execute_with_report(
        &self,
        plan: &Plan,
        credentials: &Credentials,
    ) -> WardenResult<ExecutionReport> {
        let execution_id = ExecutionId::new();
        let mut state = ExecutionState::Pending;

        debug!(
            execution_id = %execution_id,
            goal = %plan.goal,
            actions = plan.actions.len(),
            "execution starting"
        );

        // ── Validation ───────────────────────────────────────────────────────
        //
        // Always re-run, even if the caller already validated. Nothing below
        // this block runs for a plan with violations.
        state = advance(&state, ExecutionState::Validating)?;
        let violations = self.validator.validate(plan);
        if !violations.is_empty() {
            warn!(
                execution_id = %execution_id,
                violations = %summarize(&violations),
                "plan rejected by policy; executing nothing"
            );
            self.audit.write(&ExecutionRecord::now(
                &execution_id,
                ExecutionEvent::Rejected {
                    violations: violations.clone(),
                },
            ))?;
            state = advance(&state, ExecutionState::Rejected { violations })?;
            return self.finish(execution_id, state, Vec::new());
        }
        state = advance(&state, ExecutionState::Validated)?;

        // ── Sequential walk ──────────────────────────────────────────────────
        let mut outcomes = Vec::with_capacity(plan.actions.len());
        let mut signatures = Vec::new();

        for (index, action) in plan.actions.iter().enumerate() {
            state = advance(&state, ExecutionState::Executing { index })?;

            let outcome = if !self.confirmer.confirm(index, action).await {
                info!(
                    execution_id = %execution_id,
                    index,
                    kind = action.kind(),
                    "action declined by confirmer"
                );
                ActionOutcome::Declined
            } else {
                match self.dispatch(action, credentials).await {
                    Ok(Some(signature)) => {
                        info!(
                            execution_id = %execution_id,
                            index,
                            kind = action.kind(),
                            signature = %signature,
                            "action executed"
                        );
                        signatures.push(signature.clone());
                        ActionOutcome::Executed { signature }
                    }
                    Ok(None) => {
                        debug!(execution_id = %execution_id, index, "noop skipped");
                        ActionOutcome::Skipped
                    }
                    Err(error) => {
                        warn!(
                            execution_id = %execution_id,
                            index,
                            kind = action.kind(),
                            error = %error,
                            completed = signatures.len(),
                            "action failed; abandoning remaining actions"
                        );
                        let outcome = ActionOutcome::Failed {
                            error: error.to_string(),
                        };
                        self.record_action(&execution_id, index, action, &outcome)
                            .map_err(|e| keep_completed(e, &signatures))?;
                        outcomes.push(outcome);
                        state = advance(
                            &state,
                            ExecutionState::Failed {
                                index,
                                completed: signatures,
                                error,
                            },
                        )?;
                        return self.finish(execution_id, state, outcomes);
                    }
                }
            };

            self.record_action(&execution_id, index, action, &outcome)
                .map_err(|e| keep_completed(e, &signatures))?;
            outcomes.push(outcome);
        }

        state = advance(&state, ExecutionState::Completed { signatures })?;
        self.finish(execution_id, state, outcomes)
    }

    /// Hand one confirmed action to its collaborator.
    ///
    /// Returns `None` for actions with no side effect. The match is
    /// exhaustive on purpose: a new `Action` variant must be handled here.
    async fn dispatch(
        &self,
        action: &Action,
        credentials: &Credentials,
    ) -> CollaboratorResult<Option<TxSignature>> {
        match action {
            Action::Noop { .. } => Ok(None),

            Action::Transfer { to, amount } => {
                let lamports = amount.parse_u64().map_err(refuse)?;
                let signature = self
                    .ledger
                    .transfer(
                        credentials,
                        to.trim(),
                        lamports,
                        self.options.wait_for_settlement,
                    )
                    .await?;
                Ok(Some(signature))
            }

            Action::Swap {
                input_mint,
                output_mint,
                amount,
                slippage_bps,
                swap_mode,
            } => {
                let request = SwapRequest {
                    input_mint: input_mint.trim().to_string(),
                    output_mint: output_mint.trim().to_string(),
                    amount: amount.parse_u64().map_err(refuse)?,
                    slippage_bps: slippage_bps.unwrap_or_else(|| self.default_slippage_bps()),
                    swap_mode: swap_mode.unwrap_or_default(),
                };

                let quote = self.swaps.quote(&request).await?;

                // The quote is the one collaborator value we sign on the
                // strength of, so it must price exactly what was validated.
                if !quote.matches(&request) {
                    return Err(CollaboratorError::Rejected {
                        reason: format!(
                            "quote does not match request: quoted {} {} -> {} {}, \
                             requested {} {:?} of {} -> {}",
                            quote.in_amount,
                            quote.input_mint,
                            quote.out_amount,
                            quote.output_mint,
                            request.amount,
                            request.swap_mode,
                            request.input_mint,
                            request.output_mint,
                        ),
                    });
                }

                let signature = self
                    .swaps
                    .execute_swap(&quote, credentials, self.options.wait_for_settlement)
                    .await?;
                Ok(Some(signature))
            }
        }
    }

    /// Slippage for a swap that names none: the configured default, never
    /// above what the validator would have accepted.
    fn default_slippage_bps(&self) -> u16 {
        match self.validator.max_slippage_bps() {
            Some(max) => self.options.default_slippage_bps.min(max),
            None => self.options.default_slippage_bps,
        }
    }

    fn record_action(
        &self,
        execution_id: &ExecutionId,
        index: usize,
        action: &Action,
        outcome: &ActionOutcome,
    ) -> WardenResult<()> {
        self.audit.write(&ExecutionRecord::now(
            execution_id,
            ExecutionEvent::Action {
                index,
                action: action.clone(),
                outcome: outcome.clone(),
            },
        ))
    }

    fn finish(
        &self,
        execution_id: ExecutionId,
        final_state: ExecutionState,
        outcomes: Vec<ActionOutcome>,
    ) -> WardenResult<ExecutionReport> {
        info!(
            execution_id = %execution_id,
            state = final_state.name(),
            outcomes = outcomes.len(),
            "execution finished"
        );
        let report = ExecutionReport {
            execution_id,
            final_state,
            outcomes,
        };
        self.audit
            .finalize(&report.execution_id.to_string())
            .map_err(|e| keep_completed(e, &report.signatures()))?;
        Ok(report)
    }
}

/// Attach the signatures that already settled to an audit failure, so the
/// caller can still reconcile them.
fn keep_completed(error: WardenError, signatures: &[TxSignature]) -> WardenError {
    match error {
        WardenError::AuditWriteFailed { reason, .. } => WardenError::AuditWriteFailed {
            reason,
            completed: signatures.to_vec(),
        },
        other => other,
    }
}

/// An amount that slipped past the validator unparsed is refused here rather
/// than guessed at.
fn refuse(error: warden_contracts::action::AmountError) -> CollaboratorError {
    CollaboratorError::Rejected {
        reason: format!("refusing to dispatch: {error}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
