//! Handler for the `gsheets_batch_update` tool.
//!
//! All range updates travel in a single `values:batchUpdate` request. The
//! summary echoes the ranges in input order, whatever the API returns.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use crate::google::{BatchUpdateValuesResponse, BatchValueUpdate, DocumentService, RangeValues, ValueInputOption};
use crate::tools::response::{normalize_remote_call, parse_arguments};
use crate::tools::schema::{PropertyKind, PropertySpec, ToolSchema};
use crate::tools::{ToolFuture, ToolHandler};

#[derive(Debug, Deserialize)]
struct RangeUpdate {
    range: String,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateInput {
    file_id: String,
    updates: Vec<RangeUpdate>,
    #[serde(default)]
    value_input_option: ValueInputOption,
    #[serde(default)]
    include_values_in_response: bool,
}

fn render(resp: BatchUpdateValuesResponse, ranges: &[String]) -> String {
    format!(
        "Successfully batch updated {} range(s): [{}]. Updated {} cell(s), {} row(s), {} column(s) across {} sheet(s).",
        ranges.len(),
        ranges.join(", "),
        resp.total_updated_cells.unwrap_or(0),
        resp.total_updated_rows.unwrap_or(0),
        resp.total_updated_columns.unwrap_or(0),
        resp.total_updated_sheets.unwrap_or(0),
    )
}

/// Handler for the `gsheets_batch_update` tool.
pub struct BatchUpdateHandler {
    service: Arc<dyn DocumentService>,
}

impl BatchUpdateHandler {
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }
}

impl ToolHandler for BatchUpdateHandler {
    fn name(&self) -> &'static str {
        "gsheets_batch_update"
    }

    fn title(&self) -> Option<&str> {
        Some("Batch Update Spreadsheet")
    }

    fn description(&self) -> &str {
        "Update multiple cell ranges in a Google Spreadsheet in a single batch operation"
    }

    fn input_schema(&self) -> ToolSchema {
        let row = PropertySpec::of(PropertyKind::Array(Box::new(PropertySpec::of(PropertyKind::String))));
        let update = ToolSchema::object()
            .property("range", PropertySpec::string("A1 notation range (e.g., 'Sheet1!A1:B2')"))
            .property(
                "values",
                PropertySpec::array(row, "2D array of values to update. Each inner array represents a row."),
            )
            .required(["range", "values"]);

        ToolSchema::object()
            .property("fileId", PropertySpec::string("ID of the spreadsheet"))
            .property(
                "updates",
                PropertySpec::array(PropertySpec::object(update), "Array of range updates to perform"),
            )
            .property(
                "valueInputOption",
                PropertySpec::string("How input data should be interpreted (default: USER_ENTERED)")
                    .one_of(ValueInputOption::NAMES)
                    .with_default(json!(ValueInputOption::default().as_str())),
            )
            .property(
                "includeValuesInResponse",
                PropertySpec::boolean("Whether to include updated values in response (default: false)")
                    .with_default(json!(false)),
            )
            .required(["fileId", "updates"])
    }

    fn execute(&self, args: JsonObject) -> ToolFuture<'_> {
        Box::pin(async move {
            let input: BatchUpdateInput = match parse_arguments(self.name(), args) {
                Ok(input) => input,
                Err(result) => return result,
            };

            let ranges: Vec<String> = input.updates.iter().map(|u| u.range.clone()).collect();
            let request = BatchValueUpdate {
                spreadsheet_id: input.file_id,
                value_input_option: input.value_input_option,
                include_values_in_response: input.include_values_in_response,
                data: input
                    .updates
                    .into_iter()
                    .map(|u| RangeValues {
                        range: u.range,
                        values: u.values,
                    })
                    .collect(),
            };

            normalize_remote_call(
                self.name(),
                "Error performing batch update on spreadsheet",
                self.service.batch_update_values(request),
                move |resp| render(resp, &ranges),
            )
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::{ServiceError, UpdateValuesResponse};
    use crate::tools::response::first_text;
    use crate::tools::testing::{StubCall, StubService};

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn two_updates() -> JsonObject {
        args(json!({
            "fileId": "F",
            "updates": [
                { "range": "Sheet1!A1:B1", "values": [["a", "b"]] },
                { "range": "Sheet2!C3", "values": [["c"]] }
            ]
        }))
    }

    #[tokio::test]
    async fn test_summary_lists_ranges_in_input_order() {
        // The API echoes responses in a different order than requested.
        let stub = Arc::new(StubService::default().with_batch(BatchUpdateValuesResponse {
            total_updated_rows: Some(2),
            total_updated_columns: Some(2),
            total_updated_cells: Some(3),
            total_updated_sheets: Some(2),
            responses: vec![
                UpdateValuesResponse {
                    updated_range: Some("Sheet2!C3".to_string()),
                    ..Default::default()
                },
                UpdateValuesResponse {
                    updated_range: Some("Sheet1!A1:B1".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }));
        let handler = BatchUpdateHandler::new(stub.clone());

        let result = handler.execute(two_updates()).await;

        assert_eq!(result.is_error, Some(false));
        let text = first_text(&result).unwrap();
        assert!(text.starts_with("Successfully batch updated 2 range(s): [Sheet1!A1:B1, Sheet2!C3]"));
        assert_eq!(
            text,
            "Successfully batch updated 2 range(s): [Sheet1!A1:B1, Sheet2!C3]. \
             Updated 3 cell(s), 2 row(s), 2 column(s) across 2 sheet(s)."
        );
    }

    #[tokio::test]
    async fn test_updates_map_one_to_one_in_a_single_call() {
        let stub = Arc::new(StubService::default());
        let handler = BatchUpdateHandler::new(stub.clone());

        handler.execute(two_updates()).await;

        assert_eq!(
            stub.calls(),
            vec![StubCall::BatchUpdate(BatchValueUpdate {
                spreadsheet_id: "F".to_string(),
                value_input_option: ValueInputOption::UserEntered,
                include_values_in_response: false,
                data: vec![
                    RangeValues {
                        range: "Sheet1!A1:B1".to_string(),
                        values: vec![vec!["a".to_string(), "b".to_string()]],
                    },
                    RangeValues {
                        range: "Sheet2!C3".to_string(),
                        values: vec![vec!["c".to_string()]],
                    },
                ],
            })]
        );
    }

    #[tokio::test]
    async fn test_missing_totals_default_to_zero() {
        let stub = Arc::new(StubService::default());
        let handler = BatchUpdateHandler::new(stub);

        let result = handler.execute(two_updates()).await;

        assert_eq!(
            first_text(&result),
            Some(
                "Successfully batch updated 2 range(s): [Sheet1!A1:B1, Sheet2!C3]. \
                 Updated 0 cell(s), 0 row(s), 0 column(s) across 0 sheet(s)."
            )
        );
    }

    #[tokio::test]
    async fn test_batch_failure_is_contained() {
        let stub = Arc::new(StubService::failing(ServiceError::Other("socket hang up".to_string())));
        let handler = BatchUpdateHandler::new(stub);

        let result = handler.execute(two_updates()).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            first_text(&result),
            Some("Error performing batch update on spreadsheet: socket hang up")
        );
    }
}
