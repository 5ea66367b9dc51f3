//! `get_restaurant_info`: placeholder restaurant lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::tool::{FnTool, Tool};
use super::types::ToolDescriptor;
use crate::error::BotError;

pub const TOOL_NAME: &str = "get_restaurant_info";

/// Details returned for a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantInfo {
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub rating: f64,
    pub price_range: String,
}

/// Fixed, deterministic lookup. Stands in for a real directory service.
pub fn lookup(restaurant_name: &str) -> RestaurantInfo {
    info!(restaurant = restaurant_name, "looking up restaurant");
    RestaurantInfo {
        name: restaurant_name.to_string(),
        cuisine: "Italian".to_string(),
        location: "123 Main St, New York, NY".to_string(),
        rating: 4.5,
        price_range: "$$".to_string(),
    }
}

/// The tool as registered with the model.
pub fn restaurant_info_tool() -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        ToolDescriptor::new(TOOL_NAME, "Get information about a specific restaurant")
            .string_param("restaurant_name", "The name of the restaurant", true),
        |args| async move {
            let name = args.get_str("restaurant_name")?;
            let info = serde_json::to_value(lookup(name))?;
            Ok::<_, BotError>(info)
        },
    ))
}
