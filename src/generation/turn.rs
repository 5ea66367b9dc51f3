//! One user turn: request a completion, run any tools the model asks for,
//! feed the results back, and repeat until the model answers in text.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{BotConfig, DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_TIMEOUT};
use crate::conversation::Conversation;
use crate::error::{BotError, Result};
use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use crate::tools::ToolRegistry;
use crate::types::*;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

/// Progress notifications emitted while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// About to send the conversation to the model. `round` starts at 1.
    RequestingCompletion { round: usize },
    /// The model asked for a tool; it is about to run.
    ToolRequested { call: ToolCall },
    /// A tool-result message is about to be appended.
    ToolFinished { result: ToolResult },
}

/// Result of a turn that reached a final answer.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The model's final text, verbatim.
    pub text: String,
    /// Completion requests made during the turn.
    pub rounds: usize,
    /// Every tool result appended during the turn, in order.
    pub tool_results: Vec<ToolResult>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Drives completion round-trips against a provider with a fixed tool set.
pub struct TurnDriver {
    provider: Arc<dyn ModelProvider>,
    registry: ToolRegistry,
    settings: GenerationSettings,
    max_tool_rounds: usize,
    timeout: Duration,
    retry: RetryPolicy,
}

impl TurnDriver {
    pub fn new(provider: Arc<dyn ModelProvider>, registry: ToolRegistry) -> Self {
        Self {
            provider,
            registry,
            settings: GenerationSettings::default(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
        }
    }

    pub fn from_config(
        provider: Arc<dyn ModelProvider>,
        registry: ToolRegistry,
        config: &BotConfig,
    ) -> Self {
        Self::new(provider, registry)
            .with_settings(config.generation_settings())
            .with_max_tool_rounds(config.max_tool_rounds)
            .with_timeout(config.request_timeout)
            .with_retry_policy(config.retry.clone())
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Tool rounds allowed per turn before [`BotError::ToolRoundsExhausted`].
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Append `user_text` and drive the conversation to a final answer.
    pub async fn run_turn(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
    ) -> Result<TurnOutcome> {
        self.run_turn_with(conversation, user_text, &mut |_| {}).await
    }

    /// [`run_turn`](Self::run_turn), reporting progress to `on_event`.
    ///
    /// On error, messages already appended stay in the conversation.
    pub async fn run_turn_with(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
        on_event: &mut dyn FnMut(&TurnEvent),
    ) -> Result<TurnOutcome> {
        conversation.push(ModelMessage::user(user_text))?;
        self.complete_with(conversation, on_event).await
    }

    /// Drive the conversation as it stands, without adding a user message.
    pub async fn complete(&self, conversation: &mut Conversation) -> Result<TurnOutcome> {
        self.complete_with(conversation, &mut |_| {}).await
    }

    async fn complete_with(
        &self,
        conversation: &mut Conversation,
        on_event: &mut dyn FnMut(&TurnEvent),
    ) -> Result<TurnOutcome> {
        let mut rounds = 0;
        let mut tool_rounds = 0;
        let mut tool_results = Vec::new();
        let mut usage = Usage::default();

        loop {
            rounds += 1;
            on_event(&TurnEvent::RequestingCompletion { round: rounds });
            debug!(round = rounds, messages = conversation.len(), "requesting completion");

            let response = self.request(conversation).await?;
            usage.merge(&response.usage);

            if response.tool_calls.is_empty() {
                conversation.push(ModelMessage::assistant(response.text.as_str()))?;
                return Ok(TurnOutcome {
                    text: response.text,
                    rounds,
                    tool_results,
                    usage,
                    finish_reason: response.finish_reason,
                });
            }

            if tool_rounds >= self.max_tool_rounds {
                warn!(rounds = tool_rounds, "tool round limit reached");
                return Err(BotError::ToolRoundsExhausted {
                    rounds: tool_rounds,
                });
            }
            tool_rounds += 1;

            conversation.push(ModelMessage::assistant_tool_calls(
                response.text,
                &response.tool_calls,
            ))?;
            for call in &response.tool_calls {
                on_event(&TurnEvent::ToolRequested { call: call.clone() });
                let result = self.execute_call(call).await;
                on_event(&TurnEvent::ToolFinished {
                    result: result.clone(),
                });
                conversation.push(ModelMessage::tool_result(result.clone()))?;
                tool_results.push(result);
            }
        }
    }

    async fn request(&self, conversation: &Conversation) -> Result<ProviderResponse> {
        let tools = (!self.registry.is_empty()).then(|| self.registry.describe());
        let request = ProviderRequest {
            messages: conversation.messages().to_vec(),
            settings: self.settings.clone(),
            tools,
        };

        let provider = &self.provider;
        let request = &request;
        let timeout = self.timeout;
        self.retry
            .execute(move || with_timeout(timeout, provider.generate_text(request)))
            .await
    }

    /// Run one call; every failure becomes an error result for the model.
    async fn execute_call(&self, call: &ToolCall) -> ToolResult {
        match self.registry.dispatch(call).await {
            Ok(value) => ToolResult::success(call.id.as_str(), value),
            Err(e) => {
                warn!(
                    tool = call.name.as_str(),
                    id = call.id.as_str(),
                    error = %e,
                    "tool call failed"
                );
                ToolResult::failure(call.id.as_str(), e.to_string())
            }
        }
    }
}
