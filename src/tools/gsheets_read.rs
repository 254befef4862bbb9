//! Handler for the `gsheets_read` tool.
//!
//! Reads specific ranges when `ranges` is given, otherwise the whole grid of
//! the spreadsheet (or of the one sheet named by `sheetId`). The result is a
//! JSON array of `{range, values}` objects.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;

use crate::google::{DocumentService, ServiceError, SheetRead, ValueRange};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertyKind, PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadSheetInput {
    spreadsheet_id: String,
    #[serde(default)]
    ranges: Option<Vec<String>>,
    #[serde(default)]
    sheet_id: Option<i64>,
}

fn render(ranges: &[ValueRange]) -> Result<String, ServiceError> {
    serde_json::to_string_pretty(ranges).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Handler for the `gsheets_read` tool.
pub struct ReadSheetHandler {
    service: Arc<dyn DocumentService>,
}

impl ReadSheetHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for ReadSheetHandler {
    fn name(&self) -> &'static str {
        "gsheets_read"
    }

    fn title(&self) -> Option<&str> {
        Some("Read Spreadsheet")
    }

    fn description(&self) -> &str {
        "Read data from a Google Spreadsheet. Without `ranges` the whole spreadsheet is read; \
         `sheetId` then narrows the result to one sheet and is ignored when `ranges` is given."
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .property("spreadsheetId", PropertySpec::string("The ID of the spreadsheet to read"))
            .property(
                "ranges",
                PropertySpec::array(
                    PropertySpec::of(PropertyKind::String),
                    "Optional array of A1 notation ranges like ['Sheet1!A1:B10']. If not provided, reads entire sheet.",
                ),
            )
            .property(
                "sheetId",
                PropertySpec::integer("Optional specific sheet ID to read. If not provided with ranges, reads all sheets."),
            )
            .required(["spreadsheetId"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: ReadSheetInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            let request = SheetRead {
                spreadsheet_id: input.spreadsheet_id,
                ranges: input.ranges,
                sheet_id: input.sheet_id,
            };

            let call = async {
                let ranges = self.service.read_values(request).await?;
                render(&ranges)
            };

            normalize_remote_call(self.name(), "Error reading spreadsheet", call, |text| text).await
        })
    }
}
