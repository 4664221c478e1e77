//! Agent configuration loaded from TOML.
//!
//! Every section is optional; a missing section or field takes its default.
//! See `policies/agent.toml` for a complete example.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use warden_contracts::error::{WardenError, WardenResult};
use warden_core::{ExecutionOptions, DEFAULT_SLIPPAGE_BPS};
use warden_planner::{
    openai::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    OpenAiCompatClient, OpenAiSettings, PlanSource,
};
use warden_policy::WalletPolicy;

use crate::agent::DEFAULT_MAX_ACTIONS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub policy: WalletPolicy,
    pub planner: PlannerConfig,
    pub execution: ExecutionConfig,
}

/// `[planner]`: how plans are proposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Call the inference endpoint. When false every goal yields the
    /// single-`Noop` fallback plan.
    pub enabled: bool,
    pub max_actions: usize,
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_actions: DEFAULT_MAX_ACTIONS,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl PlannerConfig {
    pub fn openai_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: None,
            timeout: Duration::from_secs(self.timeout_secs),
        }
        .with_api_key_from_env(&self.api_key_env)
    }

    /// Build the plan source this section describes.
    pub fn plan_source(&self) -> WardenResult<PlanSource> {
        if !self.enabled {
            return Ok(PlanSource::without_inference());
        }
        let client = OpenAiCompatClient::new(self.openai_settings())?;
        Ok(PlanSource::new(Arc::new(client)))
    }
}

/// `[execution]`: knobs passed to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub wait_for_settlement: bool,
    pub default_slippage_bps: u16,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            wait_for_settlement: true,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }
}

impl From<ExecutionConfig> for ExecutionOptions {
    fn from(config: ExecutionConfig) -> Self {
        ExecutionOptions {
            wait_for_settlement: config.wait_for_settlement,
            default_slippage_bps: config.default_slippage_bps,
        }
    }
}

impl AgentConfig {
    pub fn from_toml_str(s: &str) -> WardenResult<Self> {
        toml::from_str(s).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to parse agent TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> WardenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardenError::ConfigError {
            reason: format!("failed to read agent config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
