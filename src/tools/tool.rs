//! The callable side of a tool.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde_json::Value;

use super::arguments::ToolArguments;
use super::types::ToolDescriptor;
use crate::error::Result;

/// Something the model can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Run with arguments already decoded and checked against the schema.
    async fn invoke(&self, args: ToolArguments) -> Result<Value>;
}

type BoxedHandler =
    Box<dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// A tool backed by an async closure.
pub struct FnTool {
    descriptor: ToolDescriptor,
    handler: BoxedHandler,
}

impl FnTool {
    pub fn new<F, Fut>(descriptor: ToolDescriptor, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            descriptor,
            handler: Box::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: ToolArguments) -> Result<Value> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnTool").field(&self.descriptor.name).finish()
    }
}
