//! In-memory `DocumentService` for handler tests.

use std::sync::Mutex;

use crate::google::{
    AppendValuesResponse, BatchUpdateValuesResponse, BatchValueUpdate, DocumentService, FileBody,
    FileContents, FileList, FileSearch, ServiceError, ServiceFuture, SheetRead, UpdateValuesResponse,
    ValueAppend, ValueRange, ValueUpdate,
};

/// A request the stub received.
#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    Search(FileSearch),
    ReadFile(String),
    Update(ValueUpdate),
    Read(SheetRead),
    Append(ValueAppend),
    BatchUpdate(BatchValueUpdate),
}

/// Answers every operation with a canned payload, or with `failure` when set.
pub struct StubService {
    failure: Option<ServiceError>,
    search: FileList,
    file: FileContents,
    update: UpdateValuesResponse,
    read: Vec<ValueRange>,
    append: AppendValuesResponse,
    batch: BatchUpdateValuesResponse,
    calls: Mutex<Vec<StubCall>>,
}

impl Default for StubService {
    fn default() -> Self {
        Self {
            failure: None,
            search: FileList::default(),
            file: FileContents {
                name: "empty.txt".to_string(),
                mime_type: "text/plain".to_string(),
                body: FileBody::Text(String::new()),
            },
            update: UpdateValuesResponse::default(),
            read: Vec::new(),
            append: AppendValuesResponse::default(),
            batch: BatchUpdateValuesResponse::default(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubService {
    pub fn failing(err: ServiceError) -> Self {
        Self {
            failure: Some(err),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, list: FileList) -> Self {
        self.search = list;
        self
    }

    pub fn with_file(mut self, file: FileContents) -> Self {
        self.file = file;
        self
    }

    pub fn with_update(mut self, resp: UpdateValuesResponse) -> Self {
        self.update = resp;
        self
    }

    pub fn with_read(mut self, ranges: Vec<ValueRange>) -> Self {
        self.read = ranges;
        self
    }

    pub fn with_append(mut self, resp: AppendValuesResponse) -> Self {
        self.append = resp;
        self
    }

    pub fn with_batch(mut self, resp: BatchUpdateValuesResponse) -> Self {
        self.batch = resp;
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T: Clone + Send + 'static>(&self, call: StubCall, payload: &T) -> ServiceFuture<'_, T> {
        self.calls.lock().unwrap().push(call);
        let outcome = match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(payload.clone()),
        };
        Box::pin(async move { outcome })
    }
}

impl DocumentService for StubService {
    fn search_files(&self, request: FileSearch) -> ServiceFuture<'_, FileList> {
        self.answer(StubCall::Search(request), &self.search)
    }

    fn read_file(&self, file_id: String) -> ServiceFuture<'_, FileContents> {
        self.answer(StubCall::ReadFile(file_id), &self.file)
    }

    fn update_values(&self, request: ValueUpdate) -> ServiceFuture<'_, UpdateValuesResponse> {
        self.answer(StubCall::Update(request), &self.update)
    }

    fn read_values(&self, request: SheetRead) -> ServiceFuture<'_, Vec<ValueRange>> {
        self.answer(StubCall::Read(request), &self.read)
    }

    fn append_values(&self, request: ValueAppend) -> ServiceFuture<'_, AppendValuesResponse> {
        self.answer(StubCall::Append(request), &self.append)
    }

    fn batch_update_values(
        &self,
        request: BatchValueUpdate,
    ) -> ServiceFuture<'_, BatchUpdateValuesResponse> {
        self.answer(StubCall::BatchUpdate(request), &self.batch)
    }
}
