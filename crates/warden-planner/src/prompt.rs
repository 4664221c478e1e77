//! Instructions sent to the inference service.

use serde_json::Value;

/// The fixed system instruction describing the only accepted response shape.
pub const SYSTEM_INSTRUCTION: &str = r#"You are the planning component of a wallet agent.
Turn the user's goal into a plan of wallet actions. Respond with a single JSON
object and nothing else:

{
  "summary": "<one sentence describing the plan>",
  "actions": [ <action>, ... ]
}

Each <action> is exactly one of:

  {"type": "noop", "reason": "<why nothing should happen>"}
  {"type": "transfer", "to": "<recipient address>", "amount": "<lamports as a decimal string>"}
  {"type": "swap", "inputMint": "<mint address>", "outputMint": "<mint address>",
   "amount": "<base units as a decimal string>", "slippageBps": <integer, optional>,
   "swapMode": "ExactIn" | "ExactOut" (optional)}

Rules:
- Amounts are whole numbers written as strings. Never use decimals or exponents.
- Use only addresses and mints that appear in the goal or the context.
- If the goal cannot be met safely, return a single noop with the reason.
- Do not add fields that are not listed above."#;

/// Build the user instruction for one goal.
///
/// `context` is embedded as pretty-printed JSON so the model sees the wallet
/// address and balance it is planning against.
pub fn user_instruction(goal: &str, context: &Value, max_actions: usize) -> String {
    let context_json =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());

    format!(
        "Goal:\n{goal}\n\nContext:\n{context_json}\n\nReturn at most {max_actions} action(s). \
         Any action beyond the first {max_actions} will be ignored."
    )
}
