//! Turning raw model text into the JSON object returned to callers.
//!
//! Models often wrap JSON in a markdown code block even when told not to. The
//! stripping here is literal: every ```` ```json ```` token is
//! removed, then every remaining ```` ``` ```` token, then outer whitespace.

use crate::models::VibeResult;
use crate::{Error, Result};
use serde_json::Value;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Remove markdown code-fence tokens and trim the result.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace(JSON_FENCE, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Parse model text into a JSON object.
///
/// Anything that is not a JSON object after fence stripping is rejected. A
/// well-formed object that does not match [`VibeResult`] is passed through
/// unchanged with a warning.
pub fn parse_vibe(raw: &str) -> Result<Value> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(&cleaned)?;

    if !value.is_object() {
        return Err(Error::Invariant(format!(
            "model returned JSON {} instead of an object",
            json_kind(&value)
        )));
    }

    match serde_json::from_value::<VibeResult>(value.clone()) {
        Ok(vibe) => {
            for warning in vibe.shape_warnings() {
                tracing::warn!("Model output shape mismatch: {}", warning);
            }
        }
        Err(e) => tracing::warn!("Model output does not match the vibe schema: {}", e),
    }

    Ok(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
