//! An in-process ledger with native balances.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use warden_contracts::{
    credentials::Credentials, error::CollaboratorError, execution::TxSignature,
};
use warden_core::traits::{CollaboratorResult, LedgerClient};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// One transfer the ledger accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub signature: TxSignature,
    pub from: String,
    pub to: String,
    pub lamports: u64,
    pub waited_for_settlement: bool,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<String, u64>,
    submissions: Vec<Submission>,
    offline: bool,
}

/// Balances keyed by address. Transfers settle immediately.
///
/// Addresses must look like base58 public keys (32 to 44 characters from the
/// base58 alphabet), otherwise the transfer fails with `InvalidAddress`.
#[derive(Default)]
pub struct SimLedger {
    state: Mutex<LedgerState>,
}

impl SimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, address: &str, lamports: u64) -> Self {
        self.lock().balances.insert(address.to_string(), lamports);
        self
    }

    pub fn balance_of(&self, address: &str) -> u64 {
        self.lock().balances.get(address).copied().unwrap_or(0)
    }

    /// Every accepted transfer, oldest first.
    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.clone()
    }

    /// While offline every call fails with `Network`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn is_plausible_address(address: &str) -> bool {
    (32..=44).contains(&address.len()) && address.chars().all(|c| BASE58_ALPHABET.contains(c))
}

pub(crate) fn simulated_signature(parts: &[&str], nonce: usize) -> TxSignature {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update((nonce as u64).to_le_bytes());
    TxSignature::new(hex::encode(hasher.finalize()))
}

#[async_trait]
impl LedgerClient for SimLedger {
    async fn get_balance(&self, address: &str) -> CollaboratorResult<u64> {
        let state = self.lock();
        if state.offline {
            return Err(CollaboratorError::Network {
                reason: "ledger unreachable".to_string(),
            });
        }
        if !is_plausible_address(address) {
            return Err(CollaboratorError::InvalidAddress {
                address: address.to_string(),
            });
        }
        Ok(state.balances.get(address).copied().unwrap_or(0))
    }

    async fn transfer(
        &self,
        payer: &Credentials,
        to: &str,
        lamports: u64,
        wait_for_settlement: bool,
    ) -> CollaboratorResult<TxSignature> {
        let mut state = self.lock();
        if state.offline {
            return Err(CollaboratorError::Network {
                reason: "ledger unreachable".to_string(),
            });
        }
        if !is_plausible_address(to) {
            return Err(CollaboratorError::InvalidAddress {
                address: to.to_string(),
            });
        }

        let from = payer.public_key().to_string();
        let available = state.balances.get(&from).copied().unwrap_or(0);
        if available < lamports {
            return Err(CollaboratorError::InsufficientFunds {
                needed: lamports,
                available,
            });
        }

        state.balances.insert(from.clone(), available - lamports);
        *state.balances.entry(to.to_string()).or_insert(0) += lamports;

        let signature = simulated_signature(
            &[&from, to, &lamports.to_string()],
            state.submissions.len(),
        );
        debug!(%from, %to, lamports, signature = %signature, "sim transfer settled");

        state.submissions.push(Submission {
            signature: signature.clone(),
            from,
            to: to.to_string(),
            lamports,
            waited_for_settlement: wait_for_settlement,
        });
        Ok(signature)
    }
}
