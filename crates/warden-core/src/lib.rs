//! # warden-core
//!
//! The policy-gated execution runtime for WARDEN wallet agents.
//!
//! This crate provides:
//! - The collaborator traits (`PlanValidator`, `Confirmer`, `LedgerClient`,
//!   `SwapClient`, `InferenceClient`, `AuditWriter`)
//! - The `ExecutionCoordinator` that wires them together in trust order
//! - The `ExecutionState` transition table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::{ExecutionCoordinator, traits::{PlanValidator, LedgerClient, SwapClient, AuditWriter}};
//! ```

pub mod confirm;
pub mod executor;
pub mod state;
pub mod traits;

pub use executor::{ExecutionCoordinator, ExecutionOptions, DEFAULT_SLIPPAGE_BPS};
