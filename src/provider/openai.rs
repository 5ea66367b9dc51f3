//! OpenAI-compatible Chat Completions provider (DeepSeek and friends).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::BotError;
use crate::types::*;

use super::format::tool_result_to_string;
use super::http::{bearer_headers, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

pub struct OpenAiCompatibleProvider {
    provider_name: String,
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        provider_name: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            provider_name: provider_name.into(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let messages: Vec<Value> = request.messages.iter().map(message_to_openai).collect();

        let mut body = serde_json::Map::new();
        body.insert("model".into(), self.model.clone().into());
        body.insert("messages".into(), messages.into());
        body.insert("stream".into(), false.into());

        if let Some(max) = request.settings.max_tokens {
            body.insert("max_tokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            body.insert("temperature".into(), temp.into());
        }

        if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body.insert("tools".into(), tool_defs.into());
        }

        Value::Object(body)
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, BotError> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            provider = self.provider_name.as_str(),
            model = self.model.as_str(),
            messages = request.messages.len(),
            "chat completion request"
        );

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key)?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let body_text = resp.text().await?;
        if !status.is_success() {
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        let data: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| BotError::MalformedResponse(format!("unexpected response body: {e}")))?;
        parse_chat_response(data)
    }
}

fn parse_chat_response(data: ChatResponse) -> Result<ProviderResponse, BotError> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BotError::MalformedResponse("no choices in response".into()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| {
            let id = tc
                .id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| BotError::MalformedResponse("tool call without an id".into()))?;
            let function = tc.function.ok_or_else(|| {
                BotError::MalformedResponse(format!("tool call '{id}' without a function"))
            })?;
            let name = function.name.filter(|n| !n.is_empty()).ok_or_else(|| {
                BotError::MalformedResponse(format!("tool call '{id}' without a function name"))
            })?;
            Ok(ToolCall {
                id,
                name,
                arguments: function.arguments.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, BotError>>()?;

    Ok(ProviderResponse {
        text: choice.message.content.unwrap_or_default(),
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
        tool_calls,
        finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::parse_wire),
    })
}

fn message_to_openai(msg: &ModelMessage) -> Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if let Some(tr) = msg.tool_result_part() {
        return json!({
            "role": "tool",
            "tool_call_id": tr.tool_call_id,
            "content": tool_result_to_string(&tr.result),
        });
    }

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let tc_json: Vec<Value> = tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments,
                    }
                })
            })
            .collect();
        let text = msg.text();
        return json!({
            "role": role,
            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            "tool_calls": tc_json,
        });
    }

    json!({ "role": role, "content": msg.text() })
}

// Wire types (internal). Fields are optional so missing data surfaces as
// `MalformedResponse` rather than a generic decode failure.

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: Option<WireFunction>,
}

#[derive(Deserialize)]
struct WireFunction {
    name: Option<String>,
    arguments: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
