//! # warden-policy
//!
//! A TOML-driven, deny-by-default wallet policy engine for the WARDEN runtime.
//!
//! ## Overview
//!
//! [`validate_plan`] checks a [`Plan`](warden_contracts::plan::Plan) against a
//! [`WalletPolicy`] and returns every violation. [`WalletPolicyEngine`] wraps a
//! policy loaded from TOML and implements the
//! [`PlanValidator`](warden_core::traits::PlanValidator) trait so the executor
//! can re-check every plan it is handed.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use warden_policy::WalletPolicyEngine;
//!
//! let engine = WalletPolicyEngine::from_file(Path::new("policies/conservative.toml"))?;
//! // Pass `Box::new(engine)` to `warden_core::ExecutionCoordinator::new(...)`.
//! ```
//!
//! ## Deny by default
//!
//! An empty allowlist admits nothing. Transfers and swaps are only permitted
//! once recipients or mints are listed, or the matching `allow_all_*` flag is
//! set.

pub mod config;
pub mod engine;

pub use config::WalletPolicy;
pub use engine::{validate_plan, WalletPolicyEngine};

// ── Tests ─────────────────────────────────────────────────────────────────────
