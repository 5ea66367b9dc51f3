//! Provider formatting helpers.

use serde_json::Value;

/// Convert a tool result JSON value into the text payload sent on the wire.
pub(crate) fn tool_result_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
