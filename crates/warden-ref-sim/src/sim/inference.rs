//! Canned inference responses.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use warden_contracts::error::CollaboratorError;
use warden_core::traits::{CollaboratorResult, InferenceClient};

#[derive(Default)]
struct Script {
    responses: VecDeque<CollaboratorResult<Value>>,
    prompts: Vec<String>,
}

/// Replays queued responses in order, one per call.
///
/// Once the queue is empty every call fails with `Network`, so a test that
/// makes more calls than it scripted fails loudly.
#[derive(Default)]
pub struct ScriptedInference {
    script: Mutex<Script>,
}

impl ScriptedInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_respond(self, response: Value) -> Self {
        self.lock().responses.push_back(Ok(response));
        self
    }

    pub fn then_fail(self, error: CollaboratorError) -> Self {
        self.lock().responses.push_back(Err(error));
        self
    }

    /// The user prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl InferenceClient for ScriptedInference {
    async fn complete_json(
        &self,
        _system_instruction: &str,
        user_prompt: &str,
    ) -> CollaboratorResult<Value> {
        let mut script = self.lock();
        script.prompts.push(user_prompt.to_string());
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| {
                Err(CollaboratorError::Network {
                    reason: "inference script exhausted".to_string(),
                })
            })
    }
}
