//! Runtime error types for the WARDEN pipeline.
//!
//! Policy violations are data, not errors: `validate_plan` returns them as a
//! list. The variants here cover what actually stops a pipeline run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{execution::TxSignature, policy::PolicyViolation};

/// A failure reported by an external collaborator (ledger, swap aggregator,
/// inference service).
///
/// Callers can tell a funding problem from a bad address by variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollaboratorError {
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("invalid address '{address}'")]
    InvalidAddress { address: String },

    #[error("network error: {reason}")]
    Network { reason: String },

    /// The remote answered with a non-2xx status.
    #[error("remote returned status {status}: {body}")]
    Http { status: u16, body: String },

    /// The remote accepted the request but refused the operation.
    #[error("rejected: {reason}")]
    Rejected { reason: String },

    /// The remote answered with something that does not decode.
    #[error("malformed response: {reason}")]
    Decode { reason: String },
}

/// The unified error type for WARDEN.
#[derive(Debug, Error)]
pub enum WardenError {
    /// The plan failed validation at execution time. Nothing was executed.
    #[error("plan rejected by policy: {}", crate::policy::summarize(.violations))]
    PolicyRejected { violations: Vec<PolicyViolation> },

    /// A collaborator failed while executing the action at `index`.
    ///
    /// Actions before `index` already took effect and are not rolled back;
    /// their signatures are kept in `completed` for reconciliation.
    #[error("action {index} failed after {n} completed action(s): {source}", n = .completed.len())]
    ActionFailed {
        index: usize,
        completed: Vec<TxSignature>,
        source: CollaboratorError,
    },

    /// The inference collaborator could not produce a response.
    #[error("inference failed: {0}")]
    Inference(#[source] CollaboratorError),

    /// The execution state machine was asked to make an illegal transition.
    #[error("state machine error: {reason}")]
    StateMachineError { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The audit writer could not persist an execution record.
    ///
    /// Fatal: no further action runs once a decision cannot be recorded.
    /// Writers report an empty `completed`; the executor fills in the
    /// signatures of every action that settled before the write failed.
    #[error("audit write failed after {n} completed action(s): {reason}", n = .completed.len())]
    AuditWriteFailed {
        reason: String,
        completed: Vec<TxSignature>,
    },
}

impl WardenError {
    /// Signatures of actions that took effect before this error, if any.
    pub fn completed(&self) -> &[TxSignature] {
        match self {
            WardenError::ActionFailed { completed, .. }
            | WardenError::AuditWriteFailed { completed, .. } => completed,
            _ => &[],
        }
    }
}

/// Convenience alias used throughout the WARDEN crates.
pub type WardenResult<T> = Result<T, WardenError>;
