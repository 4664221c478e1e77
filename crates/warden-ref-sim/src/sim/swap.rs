//! A swap aggregator with a fixed price table.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use warden_contracts::{
    action::{SwapMode, SwapQuote, SwapRequest},
    credentials::Credentials,
    error::CollaboratorError,
    execution::TxSignature,
};
use warden_core::traits::{CollaboratorResult, SwapClient};

use crate::sim::ledger::simulated_signature;

/// An exchange rate: `numerator` output units per `denominator` input units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub numerator: u64,
    pub denominator: u64,
}

impl Rate {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

#[derive(Default)]
struct AggregatorState {
    rates: HashMap<(String, String), Rate>,
    failing_mints: HashSet<String>,
    executed: Vec<SwapQuote>,
}

/// Quotes from a static rate table and "executes" by returning a signature.
///
/// Swaps touching a mint marked with `fail_on_mint` quote normally but fail at
/// submission, which is the interesting case for partial-failure handling.
#[derive(Default)]
pub struct SimSwapAggregator {
    state: Mutex<AggregatorState>,
}

impl SimSwapAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-directional rate from `input_mint` to `output_mint`.
    pub fn with_rate(self, input_mint: &str, output_mint: &str, rate: Rate) -> Self {
        self.lock()
            .rates
            .insert((input_mint.to_string(), output_mint.to_string()), rate);
        self
    }

    pub fn fail_on_mint(self, mint: &str) -> Self {
        self.lock().failing_mints.insert(mint.to_string());
        self
    }

    /// Every quote that was executed, oldest first.
    pub fn executed(&self) -> Vec<SwapQuote> {
        self.lock().executed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn scale(amount: u64, multiply: u64, divide: u64, round_up: bool) -> Option<u64> {
    if divide == 0 {
        return None;
    }
    let product = u128::from(amount) * u128::from(multiply);
    let divide = u128::from(divide);
    let quotient = if round_up {
        product.div_ceil(divide)
    } else {
        product / divide
    };
    u64::try_from(quotient).ok()
}

#[async_trait]
impl SwapClient for SimSwapAggregator {
    async fn quote(&self, request: &SwapRequest) -> CollaboratorResult<SwapQuote> {
        let state = self.lock();
        let key = (request.input_mint.clone(), request.output_mint.clone());
        let Some(rate) = state.rates.get(&key).copied() else {
            return Err(CollaboratorError::Rejected {
                reason: format!(
                    "no route from {} to {}",
                    request.input_mint, request.output_mint
                ),
            });
        };

        let (in_amount, out_amount) = match request.swap_mode {
            SwapMode::ExactIn => (
                request.amount,
                scale(request.amount, rate.numerator, rate.denominator, false),
            ),
            SwapMode::ExactOut => {
                let input = scale(request.amount, rate.denominator, rate.numerator, true);
                match input {
                    Some(input) => (input, Some(request.amount)),
                    None => (0, None),
                }
            }
        };
        let Some(out_amount) = out_amount else {
            return Err(CollaboratorError::Rejected {
                reason: "quoted amount out of range".to_string(),
            });
        };

        debug!(
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            in_amount,
            out_amount,
            "sim quote"
        );

        Ok(SwapQuote {
            input_mint: request.input_mint.clone(),
            output_mint: request.output_mint.clone(),
            in_amount,
            out_amount,
            slippage_bps: request.slippage_bps,
            swap_mode: request.swap_mode,
            route: json!({ "venue": "sim", "hops": 1 }),
        })
    }

    async fn execute_swap(
        &self,
        quote: &SwapQuote,
        signer: &Credentials,
        _wait_for_settlement: bool,
    ) -> CollaboratorResult<TxSignature> {
        let mut state = self.lock();
        for mint in [&quote.input_mint, &quote.output_mint] {
            if state.failing_mints.contains(mint) {
                return Err(CollaboratorError::Network {
                    reason: format!("swap submission for mint {mint} timed out"),
                });
            }
        }

        let signature = simulated_signature(
            &[
                signer.public_key(),
                &quote.input_mint,
                &quote.output_mint,
                &quote.in_amount.to_string(),
            ],
            state.executed.len(),
        );
        state.executed.push(quote.clone());
        Ok(signature)
    }
}
