// Core modules
mod config;
pub mod google;
mod tools;
pub mod server;


// Re-export key types and functions
pub use config::ServiceConfig;
pub use google::{DocumentService, GoogleClient, ServiceError};
pub use server::McpServer;
pub use tools::{RegistryError, ToolFuture, ToolHandler, ToolRegistry, build_registry};
pub use tools::schema::{PropertyKind, PropertySpec, ToolSchema};

use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::info;

/// Convenience function to create a fully configured MCP server.
///
/// This builds the Google client from `config`, registers every document
/// tool, and returns a McpServer that implements rmcp's ServerHandler.
pub fn create_server(config: &ServiceConfig) -> Result<Arc<McpServer>> {
    let client = GoogleClient::new(config)?;
    let service: Arc<dyn DocumentService> = Arc::new(client);

    let tool_registry = build_registry(service).context("Failed to build tool registry")?;
    info!(tools = ?tool_registry.list_names(), "Tool registry built");

    Ok(Arc::new(McpServer::new(Arc::new(tool_registry))))
}
