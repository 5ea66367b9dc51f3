//! Interactive session loop over an operator's input and output streams.

use std::io::Write;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::conversation::Conversation;
use crate::error::Result;
use crate::generation::{TurnDriver, TurnEvent};
use crate::prompts::{BANNER_RULE_WIDTH, CALLING_TOOL_NOTICE, FAREWELL};

const EXIT_KEYWORDS: [&str; 2] = ["quit", "exit"];

/// Whether an input line asks to end the session.
pub fn is_exit_command(line: &str) -> bool {
    let trimmed = line.trim();
    EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitCommand,
    EndOfInput,
}

/// Owns the conversation for the lifetime of the process.
pub struct Session {
    driver: TurnDriver,
    conversation: Conversation,
    user_name: String,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        driver: TurnDriver,
        system_prompt: Option<String>,
        user_name: impl Into<String>,
    ) -> Self {
        let conversation = match system_prompt {
            Some(prompt) => Conversation::with_system_prompt(prompt),
            None => Conversation::new(),
        };
        Self {
            driver,
            conversation,
            user_name: user_name.into(),
            started_at: Utc::now(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Print the welcome banner.
    pub fn write_banner<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Welcome to the Terminal Chatbot, {}!", self.user_name)?;
        writeln!(
            out,
            "Session started at: {} UTC",
            self.started_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out, "{}", "-".repeat(BANNER_RULE_WIDTH))?;
        Ok(())
    }

    /// Read lines until an exit keyword or end of input.
    ///
    /// Turn failures are printed and the loop carries on; only I/O errors on
    /// the operator streams end it early.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.write_banner(out)?;

        let mut buf = Vec::new();
        loop {
            write!(out, "\nYou: ")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(out, "\n{FAREWELL}")?;
                return Ok(SessionEnd::EndOfInput);
            }
            // Invalid UTF-8 is replaced, not rejected.
            let line = String::from_utf8_lossy(&buf);

            if is_exit_command(&line) {
                writeln!(out, "\n{FAREWELL}")?;
                info!(messages = self.conversation.len(), "session ended by operator");
                return Ok(SessionEnd::ExitCommand);
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            self.handle_turn(text, out).await?;
        }
    }

    /// Run one turn and print exactly one answer or error line for it.
    pub async fn handle_turn<W: Write>(&mut self, text: &str, out: &mut W) -> Result<()> {
        let mut notified = false;
        let mut write_err = None;
        let result = {
            let mut on_event = |event: &TurnEvent| {
                if let TurnEvent::ToolRequested { call } = event {
                    debug!(tool = call.name.as_str(), "model requested a tool");
                    if !notified {
                        notified = true;
                        if let Err(e) = writeln!(out, "\nBot: {CALLING_TOOL_NOTICE}") {
                            write_err = Some(e);
                        }
                    }
                }
            };
            self.driver
                .run_turn_with(&mut self.conversation, text, &mut on_event)
                .await
        };
        if let Some(e) = write_err {
            return Err(e.into());
        }

        match result {
            Ok(outcome) => {
                debug!(
                    rounds = outcome.rounds,
                    tools = outcome.tool_results.len(),
                    total_tokens = outcome.usage.total_tokens,
                    "turn complete"
                );
                writeln!(out, "\nBot: {}", outcome.text)?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "turn failed");
                writeln!(out, "\nError: {e}")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
