//! Tool registry for the document tools.
//!
//! Provides a `ToolHandler` trait for implementing tools and a `ToolRegistry`
//! that holds them in registration order, rejects malformed or colliding
//! declarations up front, and dispatches calls by exact name.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool as McpTool};
use tracing::debug;

use crate::tools::response::invalid_arguments;
use crate::tools::schema::{CompiledSchema, ToolSchema};

/// Boxed future returned by `ToolHandler::execute`.
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = CallToolResult> + Send + 'a>>;

/// Trait for handling MCP tool invocations.
///
/// `execute` resolves to a `CallToolResult` in every case; failures are
/// reported through `is_error`, never as an `Err`.
pub trait ToolHandler: Send + Sync {
    /// Returns the tool's name (e.g., "gsheets_append_row").
    fn name(&self) -> &'static str;

    /// Returns the tool's human-readable title.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Returns the tool's description.
    fn description(&self) -> &str;

    /// Returns the input schema for this tool.
    fn input_schema(&self) -> ToolSchema;

    /// Executes the tool with arguments already validated against `input_schema`.
    fn execute(&self, args: JsonObject) -> ToolFuture<'_>;
}

/// Errors raised while building or querying the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Two handlers share a name.
    DuplicateName(String),
    /// A name is not a lowercase snake token.
    InvalidName(String),
    /// A schema failed its consistency check.
    InvalidSchema { tool: String, reason: String },
    /// No handler is registered under this name.
    NotFound(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "Tool `{}` is registered more than once", name),
            Self::InvalidName(name) => write!(f, "Invalid tool name: `{}`", name),
            Self::InvalidSchema { tool, reason } => {
                write!(f, "Invalid input schema for `{}`: {}", tool, reason)
            }
            Self::NotFound(name) => write!(f, "Tool not found: {}", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Tool names are lowercase snake tokens: `[a-z][a-z0-9_]*`.
fn is_valid_tool_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && name.len() <= 128
}

/// A handler with its schema checked and compiled, and its listing entry prepared.
struct RegisteredTool {
    handler: Arc<dyn ToolHandler>,
    validator: CompiledSchema,
    listing: McpTool,
}

impl RegisteredTool {
    fn new(handler: Arc<dyn ToolHandler>) -> Result<Self, RegistryError> {
        let name = handler.name();
        if !is_valid_tool_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }

        let schema = handler.input_schema();
        let validator = schema
            .check()
            .and_then(|()| schema.compile())
            .map_err(|reason| RegistryError::InvalidSchema {
                tool: name.to_string(),
                reason,
            })?;

        let mut listing = McpTool::new(
            name,
            handler.description().to_string(),
            Arc::new(schema.to_json()),
        );
        listing.title = handler.title().map(|s| s.to_string());

        Ok(Self {
            handler,
            validator,
            listing,
        })
    }
}

/// Ordered, build-once registry of tool handlers.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<RegisteredTool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler, failing on a name collision or a malformed schema.
    pub fn register(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, RegistryError> {
        let name = handler.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let entry = RegisteredTool::new(handler)?;
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(entry));
        Ok(self)
    }

    /// Register a tool handler from a type that implements `ToolHandler`.
    pub fn register_handler<T: ToolHandler + 'static>(self, handler: T) -> Result<Self, RegistryError> {
        self.register(Arc::new(handler))
    }

    /// Get a tool handler by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&i| self.tools[i].handler.clone())
    }

    /// List all registered tool names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.handler.name().to_string()).collect()
    }

    /// Get all registered tools as `McpTool` instances for `list_tools`.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.tools.iter().map(|t| t.listing.clone()).collect()
    }

    /// Validate the arguments and execute the named tool.
    ///
    /// Only an unknown name is an `Err`; argument and remote failures come
    /// back as `CallToolResult`s with `is_error` set.
    pub async fn call_tool(&self, name: &str, args: JsonObject) -> Result<CallToolResult, RegistryError> {
        let entry = self
            .index
            .get(name)
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        if let Err(reason) = entry.validator.validate(&args) {
            debug!(tool = name, %reason, "Rejected tool arguments");
            return Ok(invalid_arguments(name, reason));
        }

        Ok(entry.handler.execute(args).await)
    }

    /// Check if a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Return the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Return `true` if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
