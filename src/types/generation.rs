//! Generation settings and related enums.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling text generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}

impl FinishReason {
    /// Parse a wire `finish_reason`; unknown values yield `None`.
    pub fn parse_wire(s: &str) -> Option<Self> {
        // Older OpenAI-compatible servers still report the legacy name.
        if s == "function_call" {
            return Some(Self::ToolCalls);
        }
        s.parse().ok()
    }
}
