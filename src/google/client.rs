//! `reqwest`-backed client for the Drive v3 and Sheets v4 REST APIs.

use std::time::Duration;

use anyhow::Context;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::types::{BatchGetValuesResponse, Spreadsheet};
use super::{
    AppendValuesResponse, BatchUpdateValuesResponse, BatchValueUpdate, DocumentService, DriveFile,
    FileBody, FileContents, FileList, FileSearch, ServiceError, ServiceFuture, SheetRead,
    UpdateValuesResponse, ValueAppend, ValueRange, ValueUpdate,
};
use crate::config::ServiceConfig;

/// Fields requested for each file in a search listing.
const SEARCH_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Fields requested when reading a whole spreadsheet grid.
const GRID_FIELDS: &str = "sheets(properties(sheetId,title),data(rowData(values(formattedValue))))";

/// Export target for Google Workspace mime types, `None` for regular files.
fn export_mime_type(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "application/vnd.google-apps.document" => Some("text/markdown"),
        "application/vnd.google-apps.spreadsheet" => Some("text/csv"),
        "application/vnd.google-apps.presentation" => Some("text/plain"),
        "application/vnd.google-apps.drawing" => Some("image/png"),
        _ => None,
    }
}

fn is_text_mime(mime_type: &str) -> bool {
    mime_type.starts_with("text/") || mime_type == "application/json"
}

/// Append path segments to a base URL such as `https://sheets.googleapis.com/v4`.
fn endpoint<S: AsRef<str>>(base: &Url, segments: &[S]) -> Result<Url, ServiceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ServiceError::Other(format!("Base URL cannot carry a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::from_response_body(status.as_u16(), &body))
}

/// Client for the hosted document service.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    access_token: Option<String>,
    drive_base: Url,
    sheets_base: Url,
}

impl GoogleClient {
    /// Build a client from service configuration.
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        let drive_base = Url::parse(&config.drive_base_url)
            .with_context(|| format!("Invalid Drive base URL `{}`", config.drive_base_url))?;
        let sheets_base = Url::parse(&config.sheets_base_url)
            .with_context(|| format!("Invalid Sheets base URL `{}`", config.sheets_base_url))?;

        Ok(Self {
            http,
            access_token: config.access_token.clone(),
            drive_base,
            sheets_base,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = check_status(self.authorize(request).send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, ServiceError> {
        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn search_files_impl(&self, request: FileSearch) -> Result<FileList, ServiceError> {
        let mut url = endpoint(&self.drive_base, &["files"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", &request.query)
                .append_pair("pageSize", &request.page_size.to_string())
                .append_pair("orderBy", "modifiedTime desc")
                .append_pair("fields", SEARCH_FIELDS);
            if let Some(token) = &request.page_token {
                query.append_pair("pageToken", token);
            }
        }

        debug!(query = %request.query, "Searching Drive files");
        self.send_json(self.http.get(url)).await
    }

    async fn read_file_impl(&self, file_id: String) -> Result<FileContents, ServiceError> {
        let mut meta_url = endpoint(&self.drive_base, &["files", file_id.as_str()])?;
        meta_url.query_pairs_mut().append_pair("fields", "id, name, mimeType");
        let meta: DriveFile = self.send_json(self.http.get(meta_url)).await?;

        let name = meta.name.unwrap_or_else(|| file_id.clone());
        let source_mime = meta.mime_type.unwrap_or_default();

        let (mime_type, bytes) = match export_mime_type(&source_mime) {
            Some(export) => {
                let mut url = endpoint(&self.drive_base, &["files", file_id.as_str(), "export"])?;
                url.query_pairs_mut().append_pair("mimeType", export);
                debug!(file_id = %file_id, export, "Exporting Workspace file");
                (export.to_string(), self.send_bytes(self.http.get(url)).await?)
            }
            None => {
                let mut url = endpoint(&self.drive_base, &["files", file_id.as_str()])?;
                url.query_pairs_mut().append_pair("alt", "media");
                debug!(file_id = %file_id, mime_type = %source_mime, "Downloading file");
                (source_mime, self.send_bytes(self.http.get(url)).await?)
            }
        };

        let body = if is_text_mime(&mime_type) {
            FileBody::Text(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            FileBody::Binary(bytes)
        };

        Ok(FileContents { name, mime_type, body })
    }

    async fn update_values_impl(&self, request: ValueUpdate) -> Result<UpdateValuesResponse, ServiceError> {
        let mut url = endpoint(
            &self.sheets_base,
            &["spreadsheets", request.spreadsheet_id.as_str(), "values", request.range.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", request.value_input_option.as_str());

        let body = json!({
            "range": request.range,
            "values": request.values,
        });
        self.send_json(self.http.put(url).json(&body)).await
    }

    async fn read_values_impl(&self, request: SheetRead) -> Result<Vec<ValueRange>, ServiceError> {
        match request.ranges.filter(|r| !r.is_empty()) {
            Some(ranges) => {
                let mut url = endpoint(
                    &self.sheets_base,
                    &["spreadsheets", request.spreadsheet_id.as_str(), "values:batchGet"],
                )?;
                {
                    let mut query = url.query_pairs_mut();
                    for range in &ranges {
                        query.append_pair("ranges", range);
                    }
                }
                let resp: BatchGetValuesResponse = self.send_json(self.http.get(url)).await?;
                Ok(resp.value_ranges)
            }
            None => {
                let mut url = endpoint(&self.sheets_base, &["spreadsheets", request.spreadsheet_id.as_str()])?;
                url.query_pairs_mut()
                    .append_pair("includeGridData", "true")
                    .append_pair("fields", GRID_FIELDS);
                let spreadsheet: Spreadsheet = self.send_json(self.http.get(url)).await?;
                Ok(spreadsheet.into_value_ranges(request.sheet_id))
            }
        }
    }

    async fn append_values_impl(&self, request: ValueAppend) -> Result<AppendValuesResponse, ServiceError> {
        let target = format!("{}:append", request.range);
        let mut url = endpoint(
            &self.sheets_base,
            &["spreadsheets", request.spreadsheet_id.as_str(), "values", target.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", request.value_input_option.as_str())
            .append_pair("insertDataOption", request.insert_data_option.as_str());

        let body = json!({ "values": request.values });
        self.send_json(self.http.post(url).json(&body)).await
    }

    async fn batch_update_values_impl(
        &self,
        request: BatchValueUpdate,
    ) -> Result<BatchUpdateValuesResponse, ServiceError> {
        let url = endpoint(
            &self.sheets_base,
            &["spreadsheets", request.spreadsheet_id.as_str(), "values:batchUpdate"],
        )?;

        let body = json!({
            "valueInputOption": request.value_input_option,
            "data": request.data,
            "includeValuesInResponse": request.include_values_in_response,
        });
        self.send_json(self.http.post(url).json(&body)).await
    }
}

impl DocumentService for GoogleClient {
    fn search_files(&self, request: FileSearch) -> ServiceFuture<'_, FileList> {
        Box::pin(self.search_files_impl(request))
    }

    fn read_file(&self, file_id: String) -> ServiceFuture<'_, FileContents> {
        Box::pin(self.read_file_impl(file_id))
    }

    fn update_values(&self, request: ValueUpdate) -> ServiceFuture<'_, UpdateValuesResponse> {
        Box::pin(self.update_values_impl(request))
    }

    fn read_values(&self, request: SheetRead) -> ServiceFuture<'_, Vec<ValueRange>> {
        Box::pin(self.read_values_impl(request))
    }

    fn append_values(&self, request: ValueAppend) -> ServiceFuture<'_, AppendValuesResponse> {
        Box::pin(self.append_values_impl(request))
    }

    fn batch_update_values(
        &self,
        request: BatchValueUpdate,
    ) -> ServiceFuture<'_, BatchUpdateValuesResponse> {
        Box::pin(self.batch_update_values_impl(request))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::http::{Method, StatusCode, Uri};
    use serde_json::Value;

    use super::*;
    use crate::google::{InsertDataOption, RangeValues, ValueInputOption};

    #[derive(Debug, Clone)]
    struct SeenRequest {
        method: Method,
        path: String,
        query: String,
        body: String,
    }

    /// Serve a canned response for every request and record what arrived.
    async fn fake_google(status: StatusCode, reply: Value) -> (GoogleClient, Arc<Mutex<Vec<SeenRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let router = Router::new().fallback(move |method: Method, uri: Uri, body: String| {
            let recorder = recorder.clone();
            let reply = reply.clone();
            async move {
                recorder.lock().unwrap().push(SeenRequest {
                    method,
                    path: uri.path().to_string(),
                    query: uri.query().unwrap_or_default().to_string(),
                    body,
                });
                (status, axum::Json(reply))
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = ServiceConfig {
            access_token: Some("test-token".to_string()),
            drive_base_url: format!("http://{}/drive/v3", addr),
            sheets_base_url: format!("http://{}/v4", addr),
            request_timeout_secs: Some(5),
        };
        (GoogleClient::new(&config).unwrap(), seen)
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://sheets.googleapis.com/v4").unwrap();
        let url = endpoint(&base, &["spreadsheets", "abc", "values:batchUpdate"]).unwrap();
        assert_eq!(url.as_str(), "https://sheets.googleapis.com/v4/spreadsheets/abc/values:batchUpdate");

        let url = endpoint(&base, &["spreadsheets", "abc", "values", "My Sheet!A1"]).unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc/values/My%20Sheet!A1");
    }

    #[test]
    fn test_export_mapping() {
        assert_eq!(export_mime_type("application/vnd.google-apps.document"), Some("text/markdown"));
        assert_eq!(export_mime_type("application/vnd.google-apps.spreadsheet"), Some("text/csv"));
        assert_eq!(export_mime_type("application/pdf"), None);
        assert!(is_text_mime("text/csv"));
        assert!(is_text_mime("application/json"));
        assert!(!is_text_mime("image/png"));
    }

    #[tokio::test]
    async fn test_append_request_shape() {
        let (client, seen) = fake_google(
            StatusCode::OK,
            serde_json::json!({ "updates": { "updatedRange": "Sheet1!A5:B5", "updatedRows": 1, "updatedCells": 2 } }),
        )
        .await;

        let resp = client
            .append_values(ValueAppend {
                spreadsheet_id: "F".to_string(),
                range: "Sheet1!A:A".to_string(),
                value_input_option: ValueInputOption::UserEntered,
                insert_data_option: InsertDataOption::InsertRows,
                values: vec![vec!["a".to_string(), "b".to_string()]],
            })
            .await
            .unwrap();
        assert_eq!(resp.updates.unwrap().updated_cells, Some(2));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].path, "/v4/spreadsheets/F/values/Sheet1!A:A:append");
        assert!(seen[0].query.contains("valueInputOption=USER_ENTERED"));
        assert!(seen[0].query.contains("insertDataOption=INSERT_ROWS"));
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body, serde_json::json!({ "values": [["a", "b"]] }));
    }

    #[tokio::test]
    async fn test_batch_update_request_shape() {
        let (client, seen) = fake_google(StatusCode::OK, serde_json::json!({ "totalUpdatedCells": 3 })).await;

        client
            .batch_update_values(BatchValueUpdate {
                spreadsheet_id: "F".to_string(),
                value_input_option: ValueInputOption::Raw,
                include_values_in_response: false,
                data: vec![
                    RangeValues { range: "A1".to_string(), values: vec![vec!["x".to_string()]] },
                    RangeValues { range: "B1:B2".to_string(), values: vec![vec!["y".to_string()], vec!["z".to_string()]] },
                ],
            })
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/v4/spreadsheets/F/values:batchUpdate");
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body["valueInputOption"], "RAW");
        assert_eq!(body["includeValuesInResponse"], false);
        assert_eq!(body["data"][0]["range"], "A1");
        assert_eq!(body["data"][1]["range"], "B1:B2");
    }

    #[tokio::test]
    async fn test_api_error_body_becomes_structured_fault() {
        let (client, _seen) = fake_google(
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": { "code": 400, "message": "Unable to parse range: Nope!A1" } }),
        )
        .await;

        let err = client
            .update_values(ValueUpdate {
                spreadsheet_id: "F".to_string(),
                range: "Nope!A1".to_string(),
                value_input_option: ValueInputOption::Raw,
                values: vec![vec!["1".to_string()]],
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Api { status: 400, message: "Unable to parse range: Nope!A1".to_string() }
        );
    }

    #[tokio::test]
    async fn test_search_sends_query_parameters() {
        let (client, seen) = fake_google(
            StatusCode::OK,
            serde_json::json!({ "files": [{ "id": "1", "name": "Budget", "mimeType": "text/csv" }] }),
        )
        .await;

        let list = client
            .search_files(FileSearch {
                query: "fullText contains 'budget'".to_string(),
                page_token: Some("next".to_string()),
                page_size: 5,
            })
            .await
            .unwrap();
        assert_eq!(list.files.len(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/drive/v3/files");
        assert!(seen[0].query.contains("pageSize=5"));
        assert!(seen[0].query.contains("pageToken=next"));
        let fields = url::form_urlencoded::parse(seen[0].query.as_bytes())
            .find(|(key, _)| key == "fields")
            .map(|(_, value)| value.into_owned());
        assert_eq!(fields.as_deref(), Some("nextPageToken, files(id, name, mimeType)"));
    }

    #[tokio::test]
    async fn test_read_file_exports_workspace_document() {
        let (client, seen) = fake_google(
            StatusCode::OK,
            serde_json::json!({ "id": "D1", "name": "Plan", "mimeType": "application/vnd.google-apps.document" }),
        )
        .await;

        let contents = client.read_file("D1".to_string()).await.unwrap();
        assert_eq!(contents.name, "Plan");
        assert_eq!(contents.mime_type, "text/markdown");
        assert!(matches!(contents.body, FileBody::Text(ref text) if text.contains("\"Plan\"")));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path, "/drive/v3/files/D1");
        assert_eq!(seen[1].path, "/drive/v3/files/D1/export");
        assert_eq!(seen[1].query, "mimeType=text%2Fmarkdown");
    }

    #[tokio::test]
    async fn test_read_values_without_ranges_reads_grid() {
        let (client, seen) = fake_google(
            StatusCode::OK,
            serde_json::json!({
                "sheets": [
                    {
                        "properties": { "sheetId": 0, "title": "Summary" },
                        "data": [{ "rowData": [{ "values": [{ "formattedValue": "x" }] }] }]
                    },
                    {
                        "properties": { "sheetId": 7, "title": "Raw" },
                        "data": [{ "rowData": [{ "values": [{ "formattedValue": "y" }] }] }]
                    }
                ]
            }),
        )
        .await;

        let ranges = client
            .read_values(SheetRead {
                spreadsheet_id: "S".to_string(),
                ranges: None,
                sheet_id: Some(7),
            })
            .await
            .unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range.as_deref(), Some("Raw"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/v4/spreadsheets/S");
        assert!(seen[0].query.contains("includeGridData=true"));
    }
}
