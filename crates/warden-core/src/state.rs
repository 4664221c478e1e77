//! Transition table for `ExecutionState`.

use warden_contracts::{
    error::{WardenError, WardenResult},
    execution::ExecutionState,
};

/// Check that `current → next` is a legal move and return `next`.
///
/// Executing indices must advance one at a time, and a failure must be
/// reported at the index that was executing.
pub fn advance(current: &ExecutionState, next: ExecutionState) -> WardenResult<ExecutionState> {
    use ExecutionState::*;

    let legal = match (current, &next) {
        (Pending, Validating) => true,
        (Validating, Rejected { .. }) => true,
        (Validating, Validated) => true,
        (Validated, Executing { index: 0 }) => true,
        (Validated, Completed { .. }) => true,
        (Executing { index: from }, Executing { index: to }) => *to == from + 1,
        (Executing { .. }, Completed { .. }) => true,
        (Executing { index: from }, Failed { index: at, .. }) => from == at,
        _ => false,
    };

    if legal {
        Ok(next)
    } else {
        Err(WardenError::StateMachineError {
            reason: format!(
                "illegal transition from '{}' to '{}'",
                current.name(),
                next.name()
            ),
        })
    }
}
