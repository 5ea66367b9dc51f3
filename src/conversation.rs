//! Append-only conversation history.

use crate::error::{BotError, Result};
use crate::types::{ModelMessage, Role};

/// Ordered message history replayed in full on every model call.
///
/// Messages can only be appended. A system message is only accepted as the
/// very first message, and tool results must answer a call made by the most
/// recent assistant message.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system prompt.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ModelMessage::system(prompt)],
        }
    }

    /// Append a message, enforcing role sequencing.
    pub fn push(&mut self, message: ModelMessage) -> Result<()> {
        match message.role {
            Role::System if !self.messages.is_empty() => {
                return Err(BotError::InvalidState(
                    "system message must be the first message".into(),
                ));
            }
            Role::Tool => self.check_tool_result(&message)?,
            _ => {}
        }
        self.messages.push(message);
        Ok(())
    }

    fn check_tool_result(&self, message: &ModelMessage) -> Result<()> {
        let result = message.tool_result_part().ok_or_else(|| {
            BotError::InvalidState("tool message without a tool result".into())
        })?;
        let requested = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role != Role::Tool)
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.tool_calls().iter().any(|c| c.id == result.tool_call_id))
            .unwrap_or(false);
        if !requested {
            return Err(BotError::InvalidState(format!(
                "tool result '{}' does not answer the preceding assistant message",
                result.tool_call_id
            )));
        }
        Ok(())
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ToolCall, ToolResult};

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "get_restaurant_info".into(),
            arguments: "{}".into(),
        }
    }

    #[test]
    fn system_prompt_only_first() {
        let mut conv = Conversation::with_system_prompt("be nice");
        assert_eq!(conv.len(), 1);
        assert!(conv.push(ModelMessage::system("again")).is_err());
        assert_eq!(conv.len(), 1);

        let mut empty = Conversation::new();
        assert!(empty.push(ModelMessage::system("first")).is_ok());
    }

    #[test]
    fn tool_result_must_answer_preceding_call() {
        let mut conv = Conversation::new();
        conv.push(ModelMessage::user("hi")).unwrap();

        let orphan =
            ModelMessage::tool_result(ToolResult::success("call_1", serde_json::json!({})));
        assert!(conv.push(orphan.clone()).is_err());

        conv.push(ModelMessage::assistant_tool_calls("", &[call("call_1"), call("call_2")]))
            .unwrap();
        conv.push(orphan).unwrap();
        conv.push(ModelMessage::tool_result(ToolResult::failure("call_2", "nope")))
            .unwrap();
        assert!(conv
            .push(ModelMessage::tool_result(ToolResult::failure("call_3", "nope")))
            .is_err());
        assert_eq!(conv.len(), 4);
    }

    #[test]
    fn tool_result_after_plain_answer_is_rejected() {
        let mut conv = Conversation::new();
        conv.push(ModelMessage::user("hi")).unwrap();
        conv.push(ModelMessage::assistant_tool_calls("", &[call("call_1")])).unwrap();
        conv.push(ModelMessage::tool_result(ToolResult::success("call_1", serde_json::json!(1))))
            .unwrap();
        conv.push(ModelMessage::assistant("done")).unwrap();
        assert!(conv
            .push(ModelMessage::tool_result(ToolResult::success("call_1", serde_json::json!(1))))
            .is_err());
    }
}
