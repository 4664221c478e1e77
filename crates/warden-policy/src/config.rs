//! Wallet policy schema.
//!
//! A `WalletPolicy` is deserialized from TOML. Every field is optional in the
//! file; an empty document yields a policy that rejects every transfer and
//! every swap.
//!
//! Example:
//! ```toml
//! allowed_recipients = ["9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"]
//! max_transfer_lamports = 1_000_000
//!
//! allowed_mints = [
//!     "So11111111111111111111111111111111111111112",
//!     "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
//! ]
//! max_swap_amount = 5_000_000
//! max_slippage_bps = 100
//! ```

use serde::{Deserialize, Serialize};

/// Caller-supplied limits on what a plan may do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletPolicy {
    /// Recipients a `transfer` may pay. Compared after trimming whitespace.
    pub allowed_recipients: Vec<String>,

    /// Skip the recipient allowlist entirely.
    pub allow_all_transfers: bool,

    /// Largest single transfer, in lamports. Inclusive.
    pub max_transfer_lamports: Option<u64>,

    /// Mints a `swap` may take as input or produce as output.
    pub allowed_mints: Vec<String>,

    /// Skip the mint allowlist entirely.
    pub allow_all_swaps: bool,

    /// Largest single swap amount, in base units. Inclusive.
    pub max_swap_amount: Option<u64>,

    /// Highest slippage a `swap` may request, in basis points. Inclusive.
    pub max_slippage_bps: Option<u16>,
}

impl WalletPolicy {
    pub fn recipient_allowed(&self, to: &str) -> bool {
        self.allow_all_transfers || contains_trimmed(&self.allowed_recipients, to)
    }

    pub fn mint_allowed(&self, mint: &str) -> bool {
        self.allow_all_swaps || contains_trimmed(&self.allowed_mints, mint)
    }
}

fn contains_trimmed(list: &[String], value: &str) -> bool {
    let value = value.trim();
    list.iter().any(|entry| entry.trim() == value)
}
