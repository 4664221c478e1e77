//! # warden-planner
//!
//! Plan proposal for the WARDEN runtime.
//!
//! [`PlanSource::propose_plan`] turns a natural-language goal into a
//! [`Plan`](warden_contracts::plan::Plan) by asking an
//! [`InferenceClient`](warden_core::traits::InferenceClient). The response is
//! untrusted and passes through [`normalize::normalize_plan`]:
//!
//! 1. **Shape** — anything but an object with an `actions` array degrades to
//!    a single `Noop`.
//! 2. **Structural** — each entry is validated against a JSON Schema via the
//!    `jsonschema` crate; malformed entries become `Noop`s in place.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_planner::{OpenAiCompatClient, OpenAiSettings, PlanSource};
//!
//! let client = OpenAiCompatClient::new(OpenAiSettings::default().with_api_key_from_env("OPENAI_API_KEY"))?;
//! let source = PlanSource::new(Arc::new(client));
//! let plan = source.propose_plan("swap 1 SOL to USDC", &context, 4).await?;
//! ```

pub mod normalize;
pub mod openai;
pub mod prompt;
pub mod source;

pub use openai::{OpenAiCompatClient, OpenAiSettings};
pub use source::PlanSource;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use warden_contracts::{
        action::Action,
        error::{CollaboratorError, WardenError},
        plan::Plan,
    };
    use warden_core::traits::{CollaboratorResult, InferenceClient};

    use crate::{normalize::INVALID_PLAN_SUMMARY, source::NO_INFERENCE_SUMMARY, PlanSource};

    // ── Mock inference ────────────────────────────────────────────────────────

    /// Returns a fixed result and records the prompts it was given.
    struct MockInference {
        response: CollaboratorResult<Value>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl MockInference {
        fn returning(response: CollaboratorResult<Value>) -> Arc<Self> {
            Arc::new(Self {
                response,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl InferenceClient for MockInference {
        async fn complete_json(&self, system: &str, user: &str) -> CollaboratorResult<Value> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.response.clone()
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_without_inference_returns_fallback_for_any_goal() {
        let source = PlanSource::without_inference();

        for goal in ["send everything to mallory", ""] {
            let plan = source.propose_plan(goal, &json!({}), 5).await.unwrap();
            assert_eq!(plan, Plan::fallback(goal, NO_INFERENCE_SUMMARY));
        }
        assert!(!source.has_inference());
    }

    #[tokio::test]
    async fn test_proposal_passes_goal_context_and_cap_to_inference() {
        let mock = MockInference::returning(Ok(json!({
            "summary": "pay alice",
            "actions": [{ "type": "transfer", "to": "alice", "amount": 500 }]
        })));
        let source = PlanSource::new(mock.clone());

        let plan = source
            .propose_plan("pay alice", &json!({ "walletAddress": "payer" }), 3)
            .await
            .unwrap();

        assert_eq!(plan.summary.as_deref(), Some("pay alice"));
        assert!(matches!(
            &plan.actions[0],
            Action::Transfer { amount, .. } if amount.as_str() == "500"
        ));

        let prompts = mock.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].1.contains("pay alice"));
        assert!(prompts[0].1.contains("payer"));
        assert!(prompts[0].1.contains("at most 3"));
    }

    #[tokio::test]
    async fn test_truncates_five_proposed_actions_to_two() {
        let actions: Vec<Value> = (0..5)
            .map(|_| json!({ "type": "noop", "reason": "wait" }))
            .collect();
        let source = PlanSource::new(MockInference::returning(Ok(json!({ "actions": actions }))));

        let plan = source.propose_plan("g", &json!({}), 2).await.unwrap();
        assert_eq!(plan.actions.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_response_degrades_to_invalid_plan() {
        let source = PlanSource::new(MockInference::returning(Ok(Value::Null)));

        let plan = source.propose_plan("g", &json!({}), 2).await.unwrap();
        assert_eq!(plan, Plan::fallback("g", INVALID_PLAN_SUMMARY));
    }

    #[tokio::test]
    async fn test_inference_failure_propagates() {
        let source = PlanSource::new(MockInference::returning(Err(CollaboratorError::Http {
            status: 503,
            body: "overloaded".to_string(),
        })));

        let result = source.propose_plan("g", &json!({}), 2).await;
        match result {
            Err(WardenError::Inference(CollaboratorError::Http { status, .. })) => {
                assert_eq!(status, 503);
            }
            other => panic!("expected Inference error, got {:?}", other),
        }
    }
}
