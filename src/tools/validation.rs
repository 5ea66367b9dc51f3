//! Check decoded tool arguments against the tool's JSON Schema.
//!
//! Only the top level is checked: the object type, required fields,
//! primitive property types and string enums. Nested schemas are left to the
//! tool itself.

use serde_json::Value;

use crate::error::{BotError, Result};

/// Validate `args` against `schema`, reporting the first violation as
/// [`BotError::ArgumentDecode`].
pub fn validate_arguments(tool_name: &str, args: &Value, schema: &Value) -> Result<()> {
    check(args, schema).map_err(|message| BotError::ArgumentDecode {
        tool_name: tool_name.to_string(),
        message,
    })
}

fn check(args: &Value, schema: &Value) -> std::result::Result<(), String> {
    if schema.get("type").and_then(Value::as_str) == Some("object") && !args.is_object() {
        return Err(format!("expected an object, got {}", type_name(args)));
    }
    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);
    for field in required {
        if !obj.contains_key(field) {
            return Err(format!("missing required field '{field}'"));
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (key, value) in obj {
        let Some(prop) = properties.get(key) else {
            continue;
        };
        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            if !matches_type(value, expected) {
                return Err(format!(
                    "field '{key}' should be {expected}, got {}",
                    type_name(value)
                ));
            }
        }
        if let Some(allowed) = prop.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                return Err(format!("field '{key}' has a value outside its allowed set"));
            }
        }
    }
    Ok(())
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
