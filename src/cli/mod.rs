//! Command-line arguments for the `dinebot` binary.

use clap::{ArgAction, Parser};

/// Terminal restaurant assistant
#[derive(Parser, Debug, Default)]
#[command(name = "dinebot", version, about = "Terminal restaurant assistant")]
pub struct Cli {
    /// Model identifier (default: DEEPSEEK_MODEL or deepseek-chat)
    #[arg(short, long)]
    pub model: Option<String>,

    /// API base URL (default: DEEPSEEK_BASE_URL or https://api.deepseek.com)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Max tokens per completion
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Maximum tool rounds per turn before giving up
    #[arg(long)]
    pub max_tool_rounds: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Replace the built-in system prompt
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Name shown in the welcome banner
    #[arg(short, long)]
    pub user: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
