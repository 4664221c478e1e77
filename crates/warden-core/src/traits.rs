//! Trait definitions for the WARDEN pipeline.
//!
//! These traits define the whole trust boundary:
//!
//! - `PlanValidator`   — trusted gate, evaluated before anything is signed
//! - `Confirmer`       — per-action human or automatic sign-off
//! - `LedgerClient`    — external: balances and native transfers
//! - `SwapClient`      — external: quotes and swap execution
//! - `InferenceClient` — external and untrusted: the model behind the planner
//! - `AuditWriter`     — trusted sink recording every executor decision
//!
//! The executor wires them together in order. Collaborator implementations are
//! never called for an action unless the plan validated cleanly and the
//! confirmer accepted that action.

use async_trait::async_trait;

use warden_contracts::{
    action::{Action, SwapQuote, SwapRequest},
    credentials::Credentials,
    error::{CollaboratorError, WardenResult},
    execution::{ExecutionRecord, TxSignature},
    plan::Plan,
    policy::PolicyViolation,
};

/// Result type returned by external collaborators.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// The plan validator: the first gate in the execution pipeline.
///
/// Implementations are **trusted** and must be deterministic and free of I/O.
/// An empty result means the plan is acceptable as a whole.
pub trait PlanValidator: Send + Sync {
    fn validate(&self, plan: &Plan) -> Vec<PolicyViolation>;

    /// The highest swap slippage this validator accepts, if it bounds it.
    ///
    /// The executor never fills in a default slippage above this value.
    fn max_slippage_bps(&self) -> Option<u16> {
        None
    }
}

/// Per-action confirmation capability.
///
/// Called once for each action of a validated plan, immediately before it
/// would be dispatched. Returning `false` skips that action only.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, index: usize, action: &Action) -> bool;
}

/// Network client for native balances and transfers.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of `address` in lamports.
    async fn get_balance(&self, address: &str) -> CollaboratorResult<u64>;

    /// Build, sign with `payer`, and submit a transfer of `lamports` to `to`.
    ///
    /// When `wait_for_settlement` is true the call returns only after the
    /// network reports the transaction as settled.
    async fn transfer(
        &self,
        payer: &Credentials,
        to: &str,
        lamports: u64,
        wait_for_settlement: bool,
    ) -> CollaboratorResult<TxSignature>;
}

/// Swap aggregator client.
#[async_trait]
pub trait SwapClient: Send + Sync {
    /// Price the requested swap.
    async fn quote(&self, request: &SwapRequest) -> CollaboratorResult<SwapQuote>;

    /// Build the swap transaction for `quote`, sign it with `signer`, submit.
    async fn execute_swap(
        &self,
        quote: &SwapQuote,
        signer: &Credentials,
        wait_for_settlement: bool,
    ) -> CollaboratorResult<TxSignature>;
}

/// Model-inference client used by the planner.
///
/// Implementations must surface transport failures and non-2xx responses as
/// errors rather than empty results. Whatever JSON they return is treated as
/// untrusted.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete_json(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> CollaboratorResult<serde_json::Value>;
}

/// The audit writer: the immutable execution record.
///
/// Every executor decision produces exactly one `ExecutionRecord`. A failed
/// write is fatal to the execution and returns
/// `WardenError::AuditWriteFailed`.
pub trait AuditWriter: Send + Sync {
    /// Append one record. Implementations must treat this as append-only.
    fn write(&self, record: &ExecutionRecord) -> WardenResult<()>;

    /// Mark an execution as finished. Called once per terminal state.
    fn finalize(&self, execution_id: &str) -> WardenResult<()>;
}
