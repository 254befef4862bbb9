//! Uniform tool responses.
//!
//! Every handler leaves through one of these helpers, so every outcome is a
//! `CallToolResult` with a single text block and an explicit `is_error`.

use std::future::Future;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::google::ServiceError;

/// Successful result carrying one text block.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Failed result carrying one diagnostic text block.
pub fn error_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Failed result for arguments that do not fit the tool's input shape.
pub fn invalid_arguments(tool: &str, reason: impl std::fmt::Display) -> CallToolResult {
    error_result(format!("Invalid arguments for {}: {}", tool, reason))
}

/// Deserialize call arguments into a handler's typed input.
///
/// Defaults declared through `#[serde(default)]` are applied here.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, args: JsonObject) -> Result<T, CallToolResult> {
    serde_json::from_value(serde_json::Value::Object(args)).map_err(|e| invalid_arguments(tool, e))
}

/// Await one remote call and normalize its outcome.
///
/// On success `render` turns the payload into the summary text. On failure
/// the fault's message is prefixed with `failure_prefix` and returned with
/// `is_error` set; the fault itself never leaves this function.
pub async fn normalize_remote_call<T, F, R>(
    tool: &str,
    failure_prefix: &str,
    call: F,
    render: R,
) -> CallToolResult
where
    F: Future<Output = Result<T, ServiceError>>,
    R: FnOnce(T) -> String,
{
    match call.await {
        Ok(payload) => {
            debug!(tool, "Remote call succeeded");
            text_result(render(payload))
        }
        Err(err) => {
            warn!(tool, error = %err, "Remote call failed");
            error_result(format!("{}: {}", failure_prefix, err.message()))
        }
    }
}

/// Text of the first content block, if it is text.
#[cfg(test)]
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.as_str())
}
