//! Name-keyed tool registry.

use std::sync::Arc;

use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolDescriptor;
use super::validation::validate_arguments;
use crate::error::{BotError, Result};
use crate::types::ToolCall;

/// Tools available to the model, in registration order.
///
/// Filled once at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are unique keys; a duplicate is rejected.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(BotError::InvalidState(format!(
                "tool '{}' is already registered",
                tool.name()
            )));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by the name the model used.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| BotError::UnknownTool(name.to_string()))
    }

    /// Descriptors for advertisement to the model.
    pub fn describe(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve, decode, validate and run one model tool call.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<serde_json::Value> {
        let tool = self.resolve(&call.name)?;
        let args = ToolArguments::decode(&call.name, &call.arguments)?;
        validate_arguments(&call.name, args.raw(), &tool.descriptor().parameters)?;

        debug!(tool = call.name.as_str(), id = call.id.as_str(), "executing tool");
        tool.invoke(args).await.map_err(|e| match e {
            BotError::ToolExecution { .. } => e,
            other => BotError::ToolExecution {
                tool_name: call.name.clone(),
                message: other.to_string(),
            },
        })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| t.name()))
            .finish()
    }
}
