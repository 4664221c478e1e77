//! Fictional addresses and pre-funded collaborators for the reference agent.
//!
//! Nothing here corresponds to a real wallet. Mint ids use the well-known
//! mainnet values so plans read naturally.

use secrecy::SecretString;

use warden_contracts::credentials::Credentials;

use crate::sim::{Rate, SimLedger, SimSwapAggregator};

// ── Accounts ─────────────────────────────────────────────────────────────────

pub const PAYER: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
pub const ALICE: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
pub const BOB: &str = "HN7cABqLq46Es1jh92dQQisAq662SmxELLLsHHe4YWrH";
pub const MALLORY: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

// ── Mints ────────────────────────────────────────────────────────────────────

pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const BONK_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Starting balance of `PAYER` in `funded_ledger()`.
pub const PAYER_BALANCE: u64 = 5 * LAMPORTS_PER_SOL;

// ── Collaborators ────────────────────────────────────────────────────────────

pub fn payer_credentials() -> Credentials {
    Credentials::new(PAYER, SecretString::from("sim-secret-key".to_string()))
}

pub fn funded_ledger() -> SimLedger {
    SimLedger::new().with_balance(PAYER, PAYER_BALANCE)
}

/// SOL↔USDC at 150 USDC per SOL and SOL→BONK at 20 000 000 BONK per SOL.
pub fn sim_aggregator() -> SimSwapAggregator {
    SimSwapAggregator::new()
        .with_rate(SOL_MINT, USDC_MINT, Rate::new(150_000_000, LAMPORTS_PER_SOL))
        .with_rate(USDC_MINT, SOL_MINT, Rate::new(LAMPORTS_PER_SOL, 150_000_000))
        .with_rate(SOL_MINT, BONK_MINT, Rate::new(2_000_000_000_000, LAMPORTS_PER_SOL))
}
