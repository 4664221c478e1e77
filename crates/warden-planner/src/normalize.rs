//! Turning untrusted model output into a `Plan`.
//!
//! Normalization is total: any JSON value yields a plan. The steps are
//!
//! 1. **Shape** — the response must be an object with an `actions` array;
//!    otherwise the plan degrades to a single `Noop`.
//! 2. **Cap** — only the first `max_actions` entries are kept.
//! 3. **Sanitize** — integer amounts become decimal strings and `null`
//!    optionals are dropped, so near-miss output still parses.
//! 4. **Structural** — each entry is validated against `action_schema()`.
//!    An entry that fails is replaced in place by a `Noop` naming the
//!    failure, keeping the indices of the surviving actions stable.
//!
//! Nothing here decides whether an action is *allowed*; that is the policy
//! engine's job.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use warden_contracts::{
    action::Action,
    error::{WardenError, WardenResult},
    plan::Plan,
};

/// Summary used when the response is not a JSON object.
pub const INVALID_PLAN_SUMMARY: &str = "invalid plan";

/// JSON Schema for a single action entry, after sanitizing.
///
/// Strict: unknown fields, unknown `type` tags and non-decimal amounts all
/// fail.
pub fn action_schema() -> Value {
    let amount = json!({ "type": "string", "pattern": "^[0-9]+$" });
    let address = json!({ "type": "string", "minLength": 1 });

    json!({
        "oneOf": [
            {
                "type": "object",
                "properties": {
                    "type": { "const": "noop" },
                    "reason": { "type": "string" }
                },
                "required": ["type"],
                "additionalProperties": false
            },
            {
                "type": "object",
                "properties": {
                    "type": { "const": "transfer" },
                    "to": address,
                    "amount": amount
                },
                "required": ["type", "to", "amount"],
                "additionalProperties": false
            },
            {
                "type": "object",
                "properties": {
                    "type": { "const": "swap" },
                    "inputMint": address,
                    "outputMint": address,
                    "amount": amount,
                    "slippageBps": { "type": "integer", "minimum": 0, "maximum": 65535 },
                    "swapMode": { "enum": ["ExactIn", "ExactOut"] }
                },
                "required": ["type", "inputMint", "outputMint", "amount"],
                "additionalProperties": false
            }
        ]
    })
}

/// Build a plan for `goal` from a raw inference response.
///
/// The goal always comes from the caller, never from the response. Only a
/// broken built-in schema produces an error.
pub fn normalize_plan(goal: &str, raw: &Value, max_actions: usize) -> WardenResult<Plan> {
    let Some(object) = raw.as_object() else {
        warn!(goal, kind = json_kind(raw), "inference response is not a JSON object");
        return Ok(Plan::fallback(goal, INVALID_PLAN_SUMMARY));
    };

    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(entries) = object.get("actions").and_then(Value::as_array) else {
        warn!(goal, "inference response has no actions array");
        return Ok(Plan {
            goal: goal.to_string(),
            summary,
            actions: vec![Action::Noop { reason: None }],
        });
    };

    if entries.len() > max_actions {
        warn!(
            goal,
            proposed = entries.len(),
            max_actions,
            "truncating proposal to max_actions"
        );
    }

    let schema = action_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| WardenError::ConfigError {
        reason: format!("invalid action schema: {e}"),
    })?;

    let actions = entries
        .iter()
        .take(max_actions)
        .enumerate()
        .map(|(index, entry)| {
            let entry = sanitize(entry);

            let errors: Vec<String> = validator
                .iter_errors(&entry)
                .map(|error| format!("{} at '{}'", error, error.instance_path))
                .collect();
            if !errors.is_empty() {
                return discard(index, errors.join("; "));
            }

            match serde_json::from_value::<Action>(entry) {
                Ok(action) => {
                    debug!(index, kind = action.kind(), "accepted proposed action");
                    action
                }
                Err(e) => discard(index, e.to_string()),
            }
        })
        .collect();

    Ok(Plan {
        goal: goal.to_string(),
        summary,
        actions,
    })
}

/// Repair the near-misses models commonly produce. Anything else passes
/// through unchanged for the schema to judge.
fn sanitize(entry: &Value) -> Value {
    let Some(object) = entry.as_object() else {
        return entry.clone();
    };

    let mut clean = Map::with_capacity(object.len());
    for (key, value) in object {
        match (key.as_str(), value) {
            (_, Value::Null) => {}
            ("amount", Value::Number(n)) if n.is_u64() => {
                clean.insert(key.clone(), Value::String(n.to_string()));
            }
            ("type", Value::String(tag)) => {
                clean.insert(key.clone(), Value::String(tag.trim().to_ascii_lowercase()));
            }
            _ => {
                clean.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(clean)
}

fn discard(index: usize, detail: String) -> Action {
    warn!(index, %detail, "discarding malformed proposed action");
    Action::noop(format!("discarded malformed action: {detail}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
