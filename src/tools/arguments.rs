//! Decoding and typed access to tool call arguments.

use serde_json::Value;

use crate::error::{BotError, Result};

/// Decoded tool call arguments with typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Decode the raw argument text a model sent with a tool call.
    ///
    /// Blank input decodes to an empty object; anything that is not a JSON
    /// object is rejected.
    pub fn decode(tool_name: &str, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(Value::Object(Default::default())));
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|e| BotError::ArgumentDecode {
            tool_name: tool_name.to_string(),
            message: format!("arguments are not valid JSON: {e}"),
        })?;
        if !value.is_object() {
            return Err(BotError::ArgumentDecode {
                tool_name: tool_name.to_string(),
                message: "arguments must be a JSON object".into(),
            });
        }
        Ok(Self::new(value))
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| BotError::InvalidArgument(format!("Missing string argument: {key}")))
    }
}
