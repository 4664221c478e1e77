//! Policy violation type.
//!
//! The policy engine produces a list of these for a plan. Any non-empty list
//! rejects the plan as a whole: WARDEN never executes part of a plan that
//! failed validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One rule failure tied to one field of one action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyViolation {
    /// Field path inside the plan, e.g. `actions[2].to`.
    pub path: String,
    /// Human-readable explanation, suitable for showing to an operator.
    pub message: String,
}

impl PolicyViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of `field` inside the action at `index`.
    pub fn at(index: usize, field: &str, message: impl Into<String>) -> Self {
        Self::new(format!("actions[{index}].{field}"), message)
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Render violations as a single `; `-separated line for logs and errors.
pub fn summarize(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
