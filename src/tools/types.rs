//! What the model is told about a tool.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Name, purpose and argument schema of a tool.
///
/// `parameters` is always an object schema; the model is asked to send its
/// arguments as a JSON object matching it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// A tool that takes no arguments.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({
                "type": "object",
                "properties": Map::new(),
                "required": Vec::<String>::new(),
            }),
        }
    }

    /// Declare a string argument.
    pub fn string_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.parameters["properties"][&name] =
            json!({ "type": "string", "description": description.into() });
        if required {
            if let Some(list) = self.parameters["required"].as_array_mut() {
                list.push(Value::String(name));
            }
        }
        self
    }
}
