//! Handler for the `gsheets_append_row` tool.
//!
//! Appends exactly one row after the table detected in `range`.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use crate::google::{AppendValuesResponse, DocumentService, InsertDataOption, ValueAppend, ValueInputOption};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertyKind, PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendRowInput {
    file_id: String,
    range: String,
    values: Vec<String>,
    #[serde(default)]
    value_input_option: ValueInputOption,
    #[serde(default)]
    insert_data_option: InsertDataOption,
}

fn render(resp: AppendValuesResponse, values: &[String]) -> String {
    let updates = resp.updates.unwrap_or_default();
    let updated_range = updates
        .updated_range
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "unknown range".to_string());

    format!(
        "Successfully appended row to {}. Updated {} row(s) and {} cell(s). Values: [{}]",
        updated_range,
        updates.updated_rows.unwrap_or(0),
        updates.updated_cells.unwrap_or(0),
        values.join(", "),
    )
}

/// Handler for the `gsheets_append_row` tool.
pub struct AppendRowHandler {
    service: Arc<dyn DocumentService>,
}

impl AppendRowHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for AppendRowHandler {
    fn name(&self) -> &'static str {
        "gsheets_append_row"
    }

    fn title(&self) -> Option<&str> {
        Some("Append Spreadsheet Row")
    }

    fn description(&self) -> &str {
        "Append a row of values to a Google Spreadsheet"
    }

    fn input_schema(&self) -> ToolSchema {
        ToolSchema::object()
            .property("fileId", PropertySpec::string("ID of the spreadsheet"))
            .property(
                "range",
                PropertySpec::string(
                    "A1 notation range to search for the table (e.g., 'Sheet1!A:A' or 'Sheet1!A1:Z1'). \
                     Values will be appended to the next row of the table.",
                ),
            )
            .property(
                "values",
                PropertySpec::array(
                    PropertySpec::of(PropertyKind::String),
                    "Array of values to append as a new row",
                ),
            )
            .property(
                "valueInputOption",
                PropertySpec::string("How input data should be interpreted (default: USER_ENTERED)")
                    .one_of(ValueInputOption::NAMES)
                    .with_default(json!(ValueInputOption::default().as_str())),
            )
            .property(
                "insertDataOption",
                PropertySpec::string("How data should be inserted (default: INSERT_ROWS)")
                    .one_of(InsertDataOption::NAMES)
                    .with_default(json!(InsertDataOption::default().as_str())),
            )
            .required(["fileId", "range", "values"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: AppendRowInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            let values = input.values;
            let request = ValueAppend {
                spreadsheet_id: input.file_id,
                range: input.range,
                value_input_option: input.value_input_option,
                insert_data_option: input.insert_data_option,
                values: vec![values.clone()],
            };

            normalize_remote_call(
                self.name(),
                "Error appending row to spreadsheet",
                self.service.append_values(request),
                move |resp| render(resp, &values),
            )
            .await
        })
    }
}
