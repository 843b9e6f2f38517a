//! Pulls the JSON object out of a model reply that may carry fences or chatter.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)```").unwrap());

static OBJECT_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// Unwrap the first fenced block, take the span from the first `{` to the last `}`
/// (or the whole text if there is none) and parse it strictly.
/// Anything that is not a JSON object yields `None`.
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    if raw.is_empty() {
        return None;
    }

    let unfenced = FENCED_BLOCK.replace(raw, "${1}");
    let text = unfenced.trim();

    let candidate = OBJECT_SPAN.find(text).map_or(text, |m| m.as_str());

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::debug!("Model reply parsed to a non-object: {other}");
            None
        }
        Err(e) => {
            tracing::debug!("Model reply is not JSON: {e}");
            None
        }
    }
}
