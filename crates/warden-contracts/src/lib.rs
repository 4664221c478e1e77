//! # warden-contracts
//!
//! Shared types for the WARDEN wallet runtime: the action vocabulary, plans,
//! policy violations, execution records and errors.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod action;
pub mod credentials;
pub mod error;
pub mod execution;
pub mod plan;
pub mod policy;

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use action::{Action, Amount, AmountError, SwapMode, SwapQuote, SwapRequest};
    use credentials::Credentials;
    use error::{CollaboratorError, WardenError};
    use execution::{ActionOutcome, ExecutionId, ExecutionReport, ExecutionState, TxSignature};
    use plan::Plan;
    use policy::PolicyViolation;

    fn round_trip(action: &Action) -> Action {
        let json = serde_json::to_string(action).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    // ── Action serde round-trip ──────────────────────────────────────────────

    #[test]
    fn noop_round_trips_with_and_without_reason() {
        let bare = Action::Noop { reason: None };
        assert_eq!(round_trip(&bare), bare);

        let with_reason = Action::noop("market closed");
        assert_eq!(round_trip(&with_reason), with_reason);
    }

    #[test]
    fn transfer_round_trips() {
        let original = Action::Transfer {
            to: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".to_string(),
            amount: Amount::from(1_500_000),
        };
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn swap_round_trips_with_all_fields() {
        let original = Action::Swap {
            input_mint: "So11111111111111111111111111111111111111112".to_string(),
            output_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            amount: Amount::new("250000"),
            slippage_bps: Some(75),
            swap_mode: Some(SwapMode::ExactOut),
        };
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn swap_round_trips_without_optional_fields() {
        let original = Action::Swap {
            input_mint: "A".to_string(),
            output_mint: "B".to_string(),
            amount: Amount::new("1"),
            slippage_bps: None,
            swap_mode: None,
        };
        let json = serde_json::to_value(&original).unwrap();

        // Absent optionals are omitted, not serialized as null.
        assert!(json.get("slippageBps").is_none());
        assert!(json.get("swapMode").is_none());
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn action_wire_format_uses_type_tag_and_camel_case() {
        let parsed: Action = serde_json::from_value(json!({
            "type": "swap",
            "inputMint": "A",
            "outputMint": "B",
            "amount": "42",
            "slippageBps": 30,
            "swapMode": "ExactIn"
        }))
        .unwrap();

        assert_eq!(
            parsed,
            Action::Swap {
                input_mint: "A".to_string(),
                output_mint: "B".to_string(),
                amount: Amount::new("42"),
                slippage_bps: Some(30),
                swap_mode: Some(SwapMode::ExactIn),
            }
        );
        assert_eq!(parsed.kind(), "swap");
    }

    #[test]
    fn unknown_action_type_does_not_deserialize() {
        let result: Result<Action, _> =
            serde_json::from_value(json!({ "type": "drain_wallet", "to": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn plan_round_trips() {
        let plan = Plan {
            goal: "rebalance".to_string(),
            summary: None,
            actions: vec![
                Action::noop("warmup"),
                Action::Transfer {
                    to: "abc".to_string(),
                    amount: Amount::from(5),
                },
            ],
        };
        let json = serde_json::to_string(&plan).unwrap();
        let decoded: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, plan);
    }

    // ── Amount parsing ───────────────────────────────────────────────────────

    #[test]
    fn amount_parses_full_u64_range() {
        assert_eq!(Amount::new("0").parse_u64(), Ok(0));
        assert_eq!(Amount::from(u64::MAX).parse_u64(), Ok(u64::MAX));
    }

    #[test]
    fn amount_rejects_non_decimal_forms() {
        for raw in ["-1", "+1", "1.5", "1e9", " 1", "0x10", "abc"] {
            assert!(
                matches!(Amount::new(raw).parse_u64(), Err(AmountError::NotDecimal(_))),
                "'{raw}' must not parse"
            );
        }
        assert_eq!(Amount::new("").parse_u64(), Err(AmountError::Empty));
    }

    #[test]
    fn amount_rejects_overflow() {
        // u64::MAX + 1
        let result = Amount::new("18446744073709551616").parse_u64();
        assert!(matches!(result, Err(AmountError::Overflow(_))));
    }

    // ── SwapQuote::matches ───────────────────────────────────────────────────

    fn request(mode: SwapMode) -> SwapRequest {
        SwapRequest {
            input_mint: "A".to_string(),
            output_mint: "B".to_string(),
            amount: 100,
            slippage_bps: 50,
            swap_mode: mode,
        }
    }

    fn quote(in_amount: u64, out_amount: u64, mode: SwapMode) -> SwapQuote {
        SwapQuote {
            input_mint: "A".to_string(),
            output_mint: "B".to_string(),
            in_amount,
            out_amount,
            slippage_bps: 50,
            swap_mode: mode,
            route: serde_json::Value::Null,
        }
    }

    #[test]
    fn quote_matches_fixed_side_per_mode() {
        assert!(quote(100, 7, SwapMode::ExactIn).matches(&request(SwapMode::ExactIn)));
        assert!(!quote(99, 7, SwapMode::ExactIn).matches(&request(SwapMode::ExactIn)));

        assert!(quote(3, 100, SwapMode::ExactOut).matches(&request(SwapMode::ExactOut)));
        assert!(!quote(100, 3, SwapMode::ExactOut).matches(&request(SwapMode::ExactOut)));
    }

    #[test]
    fn quote_with_swapped_mints_does_not_match() {
        let mut q = quote(100, 7, SwapMode::ExactIn);
        q.output_mint = "C".to_string();
        assert!(!q.matches(&request(SwapMode::ExactIn)));
    }

    // ── ExecutionReport ──────────────────────────────────────────────────────

    #[test]
    fn completed_report_yields_signatures() {
        let sigs = vec![TxSignature::new("sig-1"), TxSignature::new("sig-2")];
        let report = ExecutionReport {
            execution_id: ExecutionId::new(),
            final_state: ExecutionState::Completed {
                signatures: sigs.clone(),
            },
            outcomes: vec![
                ActionOutcome::Executed {
                    signature: sigs[0].clone(),
                },
                ActionOutcome::Declined,
                ActionOutcome::Executed {
                    signature: sigs[1].clone(),
                },
            ],
        };

        assert_eq!(report.signatures(), sigs);
        assert_eq!(report.into_result().unwrap(), sigs);
    }

    #[test]
    fn failed_report_preserves_completed_signatures() {
        let report = ExecutionReport {
            execution_id: ExecutionId::new(),
            final_state: ExecutionState::Failed {
                index: 1,
                completed: vec![TxSignature::new("sig-1")],
                error: CollaboratorError::Network {
                    reason: "timeout".to_string(),
                },
            },
            outcomes: vec![],
        };

        match report.into_result() {
            Err(err @ WardenError::ActionFailed { index: 1, .. }) => {
                assert_eq!(err.completed(), &[TxSignature::new("sig-1")]);
                assert!(err.to_string().contains("timeout"));
            }
            other => panic!("expected ActionFailed, got {:?}", other),
        }
    }

    #[test]
    fn audit_failure_reports_settled_signatures() {
        let err = WardenError::AuditWriteFailed {
            reason: "disk full".to_string(),
            completed: vec![TxSignature::new("sig-1"), TxSignature::new("sig-2")],
        };

        assert_eq!(err.completed().len(), 2);
        assert!(err.to_string().contains("2 completed action(s)"));
    }

    #[test]
    fn non_terminal_report_is_a_state_machine_error() {
        let report = ExecutionReport {
            execution_id: ExecutionId::new(),
            final_state: ExecutionState::Executing { index: 0 },
            outcomes: vec![],
        };
        assert!(matches!(
            report.into_result(),
            Err(WardenError::StateMachineError { .. })
        ));
    }

    // ── ExecutionId ──────────────────────────────────────────────────────────

    #[test]
    fn execution_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| ExecutionId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── Credentials ──────────────────────────────────────────────────────────

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = Credentials::new(
            "wallet-pubkey",
            SecretString::from("super-secret-key".to_string()),
        );
        let debug = format!("{:?}", creds);

        assert!(debug.contains("wallet-pubkey"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-key"));
        assert_eq!(creds.expose_secret(), "super-secret-key");
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_policy_rejected_lists_every_violation() {
        let err = WardenError::PolicyRejected {
            violations: vec![
                PolicyViolation::at(0, "to", "recipient not allowlisted"),
                PolicyViolation::at(2, "amount", "exceeds limit"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("actions[0].to: recipient not allowlisted"));
        assert!(msg.contains("actions[2].amount: exceeds limit"));
    }

    #[test]
    fn collaborator_errors_are_distinguishable() {
        let funds = CollaboratorError::InsufficientFunds {
            needed: 10,
            available: 3,
        };
        assert!(funds.to_string().contains("needed 10"));

        let addr = CollaboratorError::InvalidAddress {
            address: "nope".to_string(),
        };
        assert!(addr.to_string().contains("'nope'"));

        let http = CollaboratorError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(http.to_string().contains("502"));
    }

    #[test]
    fn error_config_error_display() {
        let err = WardenError::ConfigError {
            reason: "missing policy path".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing policy path"));
    }
}
