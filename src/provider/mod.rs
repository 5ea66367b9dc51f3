//! Model provider trait and the OpenAI-compatible implementation.

pub mod format;
pub mod http;
pub mod openai;

pub use openai::OpenAiCompatibleProvider;

use async_trait::async_trait;

use crate::error::BotError;
use crate::tools::ToolDescriptor;
use crate::types::{FinishReason, GenerationSettings, ModelMessage, ToolCall, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDescriptor>>,
}

/// Response from a provider.
///
/// Either `text` is the final answer, or `tool_calls` is non-empty and the
/// model is waiting for their results.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Run one completion round-trip.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, BotError>;
}
