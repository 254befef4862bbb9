//! Remote document service boundary.
//!
//! `DocumentService` is the seam every tool handler delegates through. The
//! production implementation is [`GoogleClient`], which talks to the Drive v3
//! and Sheets v4 REST APIs; tests substitute in-memory stubs.

mod client;
mod error;
mod types;

pub use client::GoogleClient;
pub use error::ServiceError;
pub use types::{
    AppendValuesResponse, BatchUpdateValuesResponse, BatchValueUpdate, DriveFile, FileBody,
    FileContents, FileList, FileSearch, InsertDataOption, RangeValues, SheetRead, UpdateValuesResponse,
    ValueAppend, ValueInputOption, ValueRange, ValueUpdate,
};

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every `DocumentService` operation.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// One method per remote operation. Each call is a single logical request.
pub trait DocumentService: Send + Sync {
    /// Drive `files.list`.
    fn search_files(&self, request: FileSearch) -> ServiceFuture<'_, FileList>;

    /// Drive `files.get` followed by an export or media download.
    fn read_file(&self, file_id: String) -> ServiceFuture<'_, FileContents>;

    /// Sheets `spreadsheets.values.update`.
    fn update_values(&self, request: ValueUpdate) -> ServiceFuture<'_, UpdateValuesResponse>;

    /// Sheets `spreadsheets.values.batchGet`, or `spreadsheets.get` with grid data.
    fn read_values(&self, request: SheetRead) -> ServiceFuture<'_, Vec<ValueRange>>;

    /// Sheets `spreadsheets.values.append`.
    fn append_values(&self, request: ValueAppend) -> ServiceFuture<'_, AppendValuesResponse>;

    /// Sheets `spreadsheets.values.batchUpdate`.
    fn batch_update_values(
        &self,
        request: BatchValueUpdate,
    ) -> ServiceFuture<'_, BatchUpdateValuesResponse>;
}
