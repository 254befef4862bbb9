//! Handler for the `gdrive_read_file` tool.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rmcp::model::JsonObject;
use serde::Deserialize;

use crate::google::{DocumentService, FileBody, FileContents};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadFileInput {
    file_id: String,
}

fn render(file: FileContents) -> String {
    let body = match file.body {
        FileBody::Text(text) => text,
        FileBody::Binary(bytes) => format!("Binary content (base64):\n{}", STANDARD.encode(bytes)),
    };
    format!("Contents of {} ({}):\n\n{}", file.name, file.mime_type, body)
}

/// Handler for the `gdrive_read_file` tool.
pub struct ReadFileHandler {
    service: Arc<dyn DocumentService>,
}

impl ReadFileHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for ReadFileHandler {
    fn name(&self) -> &'static str {
        "gdrive_read_file"
    }

    fn title(&self) -> Option<&str> {
        Some("Read Google Drive File")
    }

    fn description(&self) -> &str {
        "Read contents of a file from Google Drive. Google Docs are exported as Markdown, \
         Sheets as CSV, Slides as plain text and Drawings as PNG."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .property("fileId", PropertySpec::string("ID of the file to read"))
            .required(["fileId"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: ReadFileInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            normalize_remote_call(
                self.name(),
                "Error reading file",
                self.service.read_file(input.file_id),
                render,
            )
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::ServiceError;
    use crate::tools::response::first_text;
    use crate::tools::testing::{StubCall, StubService};
    use serde_json::json;

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_text_file_is_inlined() {
        let stub = Arc::new(StubService::default().with_file(FileContents {
            name: "Budget".to_string(),
            mime_type: "text/csv".to_string(),
            body: FileBody::Text("a,b\n1,2".to_string()),
        }));
        let handler = ReadFileHandler::new(stub.clone());

        let result = handler.execute(args(json!({ "fileId": "abc" }))).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(first_text(&result), Some("Contents of Budget (text/csv):\n\na,b\n1,2"));
        assert_eq!(stub.calls(), vec![StubCall::ReadFile("abc".to_string())]);
    }

    #[tokio::test]
    async fn test_binary_file_is_base64() {
        let stub = Arc::new(StubService::default().with_file(FileContents {
            name: "logo".to_string(),
            mime_type: "image/png".to_string(),
            body: FileBody::Binary(vec![0x89, b'P', b'N', b'G']),
        }));
        let handler = ReadFileHandler::new(stub);

        let result = handler.execute(args(json!({ "fileId": "img" }))).await;

        assert_eq!(
            first_text(&result),
            Some("Contents of logo (image/png):\n\nBinary content (base64):\niVBORw==")
        );
    }

    #[tokio::test]
    async fn test_not_found_is_contained() {
        let stub = Arc::new(StubService::failing(ServiceError::Api {
            status: 404,
            message: "File not found: nope.".to_string(),
        }));
        let handler = ReadFileHandler::new(stub);

        let result = handler.execute(args(json!({ "fileId": "nope" }))).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), Some("Error reading file: File not found: nope."));
    }
}
