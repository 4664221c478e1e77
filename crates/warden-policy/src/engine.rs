//! Wallet policy evaluation.
//!
//! `validate_plan` checks every action of a plan against a `WalletPolicy` and
//! returns every violation it finds. `WalletPolicyEngine` wraps a loaded
//! policy and implements the `PlanValidator` trait from warden-core.
//!
//! Evaluation algorithm, per action in plan order:
//!
//! 1. `Noop` never violates.
//! 2. `Transfer`: the recipient must be allowlisted (or transfers unrestricted),
//!    and the amount must parse and not exceed `max_transfer_lamports`.
//! 3. `Swap`: each mint is checked on its own, the amount as for transfers
//!    against `max_swap_amount`, and a requested slippage against
//!    `max_slippage_bps`.
//!
//! Checks never short-circuit: one action may contribute several violations.

use std::path::Path;

use tracing::{debug, warn};

use warden_contracts::{
    action::{Action, Amount},
    error::{WardenError, WardenResult},
    plan::Plan,
    policy::{summarize, PolicyViolation},
};
use warden_core::traits::PlanValidator;

use crate::config::WalletPolicy;

/// Check `plan` against `policy`.
///
/// Deterministic and free of side effects. An empty result means the plan may
/// be executed as a whole.
pub fn validate_plan(plan: &Plan, policy: &WalletPolicy) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    for (index, action) in plan.actions.iter().enumerate() {
        match action {
            Action::Noop { .. } => {}

            Action::Transfer { to, amount } => {
                if !policy.recipient_allowed(to) {
                    violations.push(PolicyViolation::at(
                        index,
                        "to",
                        format!("recipient '{}' is not in allowed_recipients", to.trim()),
                    ));
                }
                check_amount(
                    &mut violations,
                    index,
                    amount,
                    policy.max_transfer_lamports,
                    "max_transfer_lamports",
                );
            }

            Action::Swap {
                input_mint,
                output_mint,
                amount,
                slippage_bps,
                swap_mode: _,
            } => {
                if !policy.mint_allowed(input_mint) {
                    violations.push(PolicyViolation::at(
                        index,
                        "inputMint",
                        format!("mint '{}' is not in allowed_mints", input_mint.trim()),
                    ));
                }
                if !policy.mint_allowed(output_mint) {
                    violations.push(PolicyViolation::at(
                        index,
                        "outputMint",
                        format!("mint '{}' is not in allowed_mints", output_mint.trim()),
                    ));
                }
                check_amount(
                    &mut violations,
                    index,
                    amount,
                    policy.max_swap_amount,
                    "max_swap_amount",
                );
                if let (Some(requested), Some(max)) = (slippage_bps, policy.max_slippage_bps) {
                    if *requested > max {
                        violations.push(PolicyViolation::at(
                            index,
                            "slippageBps",
                            format!("slippage {requested} bps exceeds max_slippage_bps {max}"),
                        ));
                    }
                }
            }
        }
    }

    violations
}

fn check_amount(
    violations: &mut Vec<PolicyViolation>,
    index: usize,
    amount: &Amount,
    max: Option<u64>,
    limit_name: &str,
) {
    match amount.parse_u64() {
        Ok(value) => {
            if let Some(max) = max {
                if value > max {
                    violations.push(PolicyViolation::at(
                        index,
                        "amount",
                        format!("amount {value} exceeds {limit_name} {max}"),
                    ));
                }
            }
        }
        Err(e) => violations.push(PolicyViolation::at(
            index,
            "amount",
            format!("invalid amount '{}': {}", amount.as_str(), e),
        )),
    }
}

/// A `PlanValidator` backed by a `WalletPolicy` loaded from TOML.
///
/// ```rust,ignore
/// use warden_policy::WalletPolicyEngine;
///
/// let engine = WalletPolicyEngine::from_file(Path::new("policies/conservative.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct WalletPolicyEngine {
    policy: WalletPolicy,
}

impl WalletPolicyEngine {
    pub fn new(policy: WalletPolicy) -> Self {
        Self { policy }
    }

    /// Parse `s` as TOML and build a `WalletPolicyEngine`.
    ///
    /// Returns `WardenError::ConfigError` if the TOML is malformed or does
    /// not match the `WalletPolicy` schema.
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        let policy: WalletPolicy = toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Ok(Self::new(policy))
    }

    /// Read the file at `path` and parse it as a TOML wallet policy.
    pub fn from_file(path: &Path) -> WardenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn policy(&self) -> &WalletPolicy {
        &self.policy
    }
}

impl PlanValidator for WalletPolicyEngine {
    fn validate(&self, plan: &Plan) -> Vec<PolicyViolation> {
        debug!(goal = %plan.goal, actions = plan.actions.len(), "validating plan");

        let violations = validate_plan(plan, &self.policy);
        if !violations.is_empty() {
            warn!(
                count = violations.len(),
                violations = %summarize(&violations),
                "plan violates wallet policy"
            );
        }
        violations
    }

    fn max_slippage_bps(&self) -> Option<u16> {
        self.policy.max_slippage_bps
    }
}
