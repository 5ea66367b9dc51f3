//! Shared test helpers and scripted mock provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use dinebot::error::BotError;
use dinebot::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use dinebot::types::*;

/// A provider that replays queued outcomes and records every request.
///
/// When the queue is empty it answers with `"Mock response"`.
#[derive(Default)]
pub struct MockProvider {
    outcomes: Mutex<VecDeque<Result<ProviderResponse, BotError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a single tool call response with raw argument text.
    pub fn queue_tool_call(&self, id: &str, name: &str, arguments: &str) {
        self.queue_tool_calls(&[(id, name, arguments)]);
    }

    /// Queue a response carrying several tool calls.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, &str)]) {
        self.push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: calls
                .iter()
                .map(|(id, name, arguments)| ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: BotError) {
        self.push(Err(error));
    }

    fn push(&self, outcome: Result<ProviderResponse, BotError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, BotError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ProviderResponse {
                    text: "Mock response".to_string(),
                    finish_reason: Some(FinishReason::Stop),
                    ..Default::default()
                })
            })
    }
}

/// A real `reqwest` error, for exercising network failure paths.
pub fn network_error() -> BotError {
    let err = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    BotError::Network(err)
}

/// Snapshot of a conversation for append-only comparisons.
pub fn snapshot(messages: &[ModelMessage]) -> Vec<ModelMessage> {
    messages.to_vec()
}
