//! Handler for the `gsheets_update_cell` tool.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;

use crate::google::{DocumentService, ValueInputOption, ValueUpdate};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCellInput {
    file_id: String,
    range: String,
    value: String,
}

/// Handler for the `gsheets_update_cell` tool.
pub struct UpdateCellHandler {
    service: Arc<dyn DocumentService>,
}

impl UpdateCellHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for UpdateCellHandler {
    fn name(&self) -> &'static str {
        "gsheets_update_cell"
    }

    fn title(&self) -> Option<&str> {
        Some("Update Spreadsheet Cell")
    }

    fn description(&self) -> &str {
        "Update a cell value in a Google Spreadsheet. The value is stored as entered (RAW)."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .property("fileId", PropertySpec::string("ID of the spreadsheet"))
            .property("range", PropertySpec::string("Cell range in A1 notation (e.g. 'Sheet1!A1')"))
            .property("value", PropertySpec::string("New cell value"))
            .required(["fileId", "range", "value"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: UpdateCellInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            let UpdateCellInput { file_id, range, value } = input;
            let request = ValueUpdate {
                spreadsheet_id: file_id,
                range: range.clone(),
                value_input_option: ValueInputOption::Raw,
                values: vec![vec![value.clone()]],
            };

            normalize_remote_call(
                self.name(),
                "Error updating cell",
                self.service.update_values(request),
                move |resp| {
                    let updated = resp.updated_range.filter(|r| !r.is_empty()).unwrap_or(range);
                    format!("Updated cell {} to value: {}", updated, value)
                },
            )
            .await
        })
    }
}
