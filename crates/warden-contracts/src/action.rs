//! The closed vocabulary of operations an agent may propose.
//!
//! `Action` is the only shape that crosses from the untrusted planner into the
//! trusted policy engine and executor. Both consumers match on it without a
//! wildcard arm, so adding a variant fails to compile until each handles it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unsigned 64-bit quantity carried as a decimal string.
///
/// Amounts are never floats anywhere in the pipeline. The string form is kept
/// verbatim from the proposal so the policy engine can report exactly what the
/// agent asked for, and is parsed only at the point of comparison or dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

/// Why an `Amount` could not be read as a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount '{0}' is not a non-negative decimal integer")]
    NotDecimal(String),

    #[error("amount '{0}' does not fit in an unsigned 64-bit integer")]
    Overflow(String),
}

impl Amount {
    /// Wrap a raw decimal string without checking it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as `u64`. Only ASCII digits are accepted: no sign, no
    /// whitespace, no exponent, no fractional part.
    pub fn parse_u64(&self) -> Result<u64, AmountError> {
        let raw = self.0.as_str();
        if raw.is_empty() {
            return Err(AmountError::Empty);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::NotDecimal(raw.to_string()));
        }
        raw.parse::<u64>()
            .map_err(|_| AmountError::Overflow(raw.to_string()))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of a swap the amount fixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapMode {
    /// `amount` is the exact input; output floats within slippage.
    #[default]
    ExactIn,
    /// `amount` is the exact output; input floats within slippage.
    ExactOut,
}

/// One atomic operation proposed by the agent.
///
/// Wire form is internally tagged on `type`:
///
/// ```json
/// { "type": "noop", "reason": "nothing to do" }
/// { "type": "transfer", "to": "9xQe…", "amount": "1000000" }
/// { "type": "swap", "inputMint": "So11…", "outputMint": "EPjF…",
///   "amount": "500000", "slippageBps": 50, "swapMode": "ExactIn" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Always legal and never has an effect.
    Noop {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Native-currency transfer, `amount` in lamports.
    Transfer { to: String, amount: Amount },

    /// Token swap routed through the swap aggregator.
    #[serde(rename_all = "camelCase")]
    Swap {
        input_mint: String,
        output_mint: String,
        amount: Amount,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slippage_bps: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        swap_mode: Option<SwapMode>,
    },
}

impl Action {
    pub fn noop(reason: impl Into<String>) -> Self {
        Action::Noop {
            reason: Some(reason.into()),
        }
    }

    /// The wire tag of this variant, used in logs and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Noop { .. } => "noop",
            Action::Transfer { .. } => "transfer",
            Action::Swap { .. } => "swap",
        }
    }
}

/// Swap parameters after the executor has resolved defaults and parsed the
/// amount. This is what the swap collaborator is asked to quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub slippage_bps: u16,
    pub swap_mode: SwapMode,
}

/// A quote returned by the swap collaborator.
///
/// The executor inspects only the mint and amount fields; `route` is carried
/// back to the collaborator untouched when the swap is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub slippage_bps: u16,
    pub swap_mode: SwapMode,
    #[serde(default)]
    pub route: serde_json::Value,
}

impl SwapQuote {
    /// True when this quote prices exactly the swap that was requested.
    pub fn matches(&self, request: &SwapRequest) -> bool {
        let fixed_side = match request.swap_mode {
            SwapMode::ExactIn => self.in_amount,
            SwapMode::ExactOut => self.out_amount,
        };
        self.input_mint == request.input_mint
            && self.output_mint == request.output_mint
            && self.swap_mode == request.swap_mode
            && fixed_side == request.amount
    }
}
