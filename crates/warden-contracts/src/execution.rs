//! Execution state, per-action outcomes and audit records.
//!
//! `ExecutionReport` is what the executor returns after walking a plan.
//! `ExecutionRecord` is what gets written to the audit log, one per decision.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    error::{CollaboratorError, WardenError, WardenResult},
    policy::PolicyViolation,
};

/// Identifier of a submitted transaction, as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(pub String);

impl TxSignature {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for one plan execution.
///
/// Every record the executor writes to the audit log carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub uuid::Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a single plan execution.
///
/// ```text
/// Pending → Validating → Rejected
///                      → Validated → Executing(0) → … → Executing(n-1) → Completed
///                                                 ↘ Failed(i)
/// ```
///
/// `Rejected`, `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExecutionState {
    Pending,
    Validating,
    Rejected {
        violations: Vec<PolicyViolation>,
    },
    Validated,
    Executing {
        index: usize,
    },
    Completed {
        signatures: Vec<TxSignature>,
    },
    Failed {
        index: usize,
        completed: Vec<TxSignature>,
        error: CollaboratorError,
    },
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Rejected { .. }
                | ExecutionState::Completed { .. }
                | ExecutionState::Failed { .. }
        )
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Pending => "pending",
            ExecutionState::Validating => "validating",
            ExecutionState::Rejected { .. } => "rejected",
            ExecutionState::Validated => "validated",
            ExecutionState::Executing { .. } => "executing",
            ExecutionState::Completed { .. } => "completed",
            ExecutionState::Failed { .. } => "failed",
        }
    }
}

/// What happened to one action of a validated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Submitted; the ledger returned this signature.
    Executed { signature: TxSignature },
    /// The confirmer refused it. No collaborator was called.
    Declined,
    /// A `Noop`. No collaborator was called.
    Skipped,
    /// The collaborator failed. Later actions were not attempted.
    Failed { error: String },
}

/// A single audited decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    /// The plan failed re-validation; no action ran.
    Rejected { violations: Vec<PolicyViolation> },
    /// One action reached a final outcome.
    Action {
        index: usize,
        action: Action,
        outcome: ActionOutcome,
    },
}

/// An immutable record of one executor decision, written to the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// The execution this decision belongs to.
    pub execution_id: ExecutionId,
    pub event: ExecutionEvent,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ExecutionRecord {
    pub fn now(execution_id: &ExecutionId, event: ExecutionEvent) -> Self {
        Self {
            execution_id: execution_id.clone(),
            event,
            timestamp: Utc::now(),
        }
    }
}

/// Everything the executor knows after walking a plan.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub execution_id: ExecutionId,
    /// Always a terminal state.
    pub final_state: ExecutionState,
    /// One entry per action that reached an outcome, in plan order.
    pub outcomes: Vec<ActionOutcome>,
}

impl ExecutionReport {
    /// Signatures of every executed action, in plan order.
    pub fn signatures(&self) -> Vec<TxSignature> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ActionOutcome::Executed { signature } => Some(signature.clone()),
                _ => None,
            })
            .collect()
    }

    /// Collapse the report into the caller-facing result: the signature list
    /// on completion, an error on rejection or failure.
    pub fn into_result(self) -> WardenResult<Vec<TxSignature>> {
        match self.final_state {
            ExecutionState::Completed { signatures } => Ok(signatures),
            ExecutionState::Rejected { violations } => {
                Err(WardenError::PolicyRejected { violations })
            }
            ExecutionState::Failed {
                index,
                completed,
                error,
            } => Err(WardenError::ActionFailed {
                index,
                completed,
                source: error,
            }),
            other => Err(WardenError::StateMachineError {
                reason: format!("execution ended in non-terminal state '{}'", other.name()),
            }),
        }
    }
}
