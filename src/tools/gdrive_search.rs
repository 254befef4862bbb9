//! Handler for the `gdrive_search` tool.
//!
//! Full-text search over Drive, newest first, with a raw page-token passthrough.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use crate::google::{DocumentService, FileList, FileSearch};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    query: String,
    #[serde(default)]
    page_token: Option<String>,
    #[serde(default)]
    page_size: Option<u32>,
}

/// Wrap free text in a Drive `fullText contains` clause.
fn drive_query(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("fullText contains '{}'", escaped)
}

fn render(list: FileList) -> String {
    let lines: Vec<String> = list
        .files
        .iter()
        .map(|file| {
            format!(
                "{} {} ({})",
                file.id.as_deref().unwrap_or("unknown"),
                file.name.as_deref().unwrap_or("untitled"),
                file.mime_type.as_deref().unwrap_or("unknown type"),
            )
        })
        .collect();

    let mut text = format!("Found {} files:\n{}", list.files.len(), lines.join("\n"));
    if let Some(token) = list.next_page_token.filter(|t| !t.is_empty()) {
        text.push_str(&format!("\n\nMore results available. Use pageToken: {}", token));
    }
    text
}

/// Handler for the `gdrive_search` tool.
pub struct SearchHandler {
    service: Arc<dyn DocumentService>,
}

impl SearchHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for SearchHandler {
    fn name(&self) -> &'static str {
        "gdrive_search"
    }

    fn title(&self) -> Option<&str> {
        Some("Search Google Drive")
    }

    fn description(&self) -> &str {
        "Search for files in Google Drive"
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .property("query", PropertySpec::string("Search query"))
            .property(
                "pageToken",
                PropertySpec::string("Token for the next page of results (omit for the first page)"),
            )
            .property(
                "pageSize",
                PropertySpec::integer("Number of results per page (default: 10)")
                    .with_default(json!(DEFAULT_PAGE_SIZE)),
            )
            .required(["query"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: SearchInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            let request = FileSearch {
                query: drive_query(&input.query),
                page_token: input.page_token,
                page_size: input.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            };

            normalize_remote_call(
                self.name(),
                "Error searching files",
                self.service.search_files(request),
                render,
            )
            .await
        })
    }
}
