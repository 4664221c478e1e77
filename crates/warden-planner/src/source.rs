//! The plan source: goal in, untrusted `Plan` out.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use warden_contracts::{
    error::{WardenError, WardenResult},
    plan::Plan,
};
use warden_core::traits::InferenceClient;

use crate::{
    normalize::normalize_plan,
    prompt::{user_instruction, SYSTEM_INSTRUCTION},
};

/// Summary of the plan produced when no inference client is configured.
pub const NO_INFERENCE_SUMMARY: &str = "no inference configured";

/// Proposes plans by asking an inference service, or falls back to a `Noop`
/// plan when none is configured.
///
/// A proposed plan is never trusted: it still has to pass the policy engine
/// before anything is executed.
#[derive(Clone)]
pub struct PlanSource {
    inference: Option<Arc<dyn InferenceClient>>,
}

impl PlanSource {
    pub fn new(inference: Arc<dyn InferenceClient>) -> Self {
        Self {
            inference: Some(inference),
        }
    }

    /// A source that always returns the single-`Noop` fallback plan.
    pub fn without_inference() -> Self {
        Self { inference: None }
    }

    pub fn has_inference(&self) -> bool {
        self.inference.is_some()
    }

    /// Propose a plan of at most `max_actions` actions for `goal`.
    ///
    /// # Errors
    ///
    /// `WardenError::Inference` if the inference call itself fails. A response
    /// that arrives but makes no sense is not an error; it degrades to `Noop`s.
    pub async fn propose_plan(
        &self,
        goal: &str,
        context: &Value,
        max_actions: usize,
    ) -> WardenResult<Plan> {
        let Some(inference) = &self.inference else {
            debug!(goal, "no inference client; returning fallback plan");
            return Ok(Plan::fallback(goal, NO_INFERENCE_SUMMARY));
        };

        let user = user_instruction(goal, context, max_actions);
        let raw = inference
            .complete_json(SYSTEM_INSTRUCTION, &user)
            .await
            .map_err(WardenError::Inference)?;

        let plan = normalize_plan(goal, &raw, max_actions)?;
        info!(goal, actions = plan.actions.len(), "plan proposed");
        Ok(plan)
    }
}

impl Default for PlanSource {
    fn default() -> Self {
        Self::without_inference()
    }
}
