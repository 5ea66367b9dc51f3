//! dinebot: a terminal restaurant assistant backed by a hosted chat model.
//!
//! The model can ask for locally registered tools (here a single
//! `get_restaurant_info` lookup). [`generation::TurnDriver`] runs those
//! requests, feeds the results back, and keeps going until the model answers
//! in plain text.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dinebot::config::BotConfig;
//! use dinebot::conversation::Conversation;
//! use dinebot::generation::TurnDriver;
//! use dinebot::provider::{http::build_client, OpenAiCompatibleProvider};
//!
//! # async fn example() -> dinebot::error::Result<()> {
//! let config = BotConfig::from_env()?;
//! let provider = OpenAiCompatibleProvider::new(
//!     config.provider_name.clone(),
//!     config.model.clone(),
//!     config.api_key.clone(),
//!     Some(config.base_url.clone()),
//!     build_client(config.request_timeout)?,
//! );
//! let registry = dinebot::tools::default_registry()?;
//! let driver = TurnDriver::from_config(Arc::new(provider), registry, &config);
//! let mut conversation = Conversation::with_system_prompt(config.system_prompt.clone());
//! let outcome = driver.run_turn(&mut conversation, "Tell me about Luigi's").await?;
//! println!("{}", outcome.text);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod prompts;
pub mod provider;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;
