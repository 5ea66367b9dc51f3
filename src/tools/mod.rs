//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod restaurant;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use restaurant::restaurant_info_tool;
pub use tool::{FnTool, Tool};
pub use types::ToolDescriptor;

/// The registry the bot starts with.
pub fn default_registry() -> crate::error::Result<ToolRegistry> {
    ToolRegistry::new().with(restaurant_info_tool())
}
