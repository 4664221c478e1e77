//! The envelope grouping the actions proposed for one goal.

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// An ordered list of actions produced for a single goal.
///
/// Action order is execution order. A plan is built once by the planner and
/// never mutated afterwards; callers that want a different plan ask for a new
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub actions: Vec<Action>,
}

impl Plan {
    /// A harmless single-`Noop` plan, used whenever a usable proposal is not
    /// available.
    pub fn fallback(goal: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            summary: Some(summary.into()),
            actions: vec![Action::Noop { reason: None }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
