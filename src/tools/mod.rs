//! Document tools and the registry that exposes them.
//!
//! Each tool is a `ToolHandler` delegating to a shared `DocumentService`.
//! `build_registry` assembles them once, in a fixed order, at startup.

mod registry;
pub mod response;
pub mod schema;

pub use registry::{RegistryError, ToolFuture, ToolHandler, ToolRegistry};

// Tool handler implementations
mod gdrive_read_file;
mod gdrive_search;
mod gsheets_append_row;
mod gsheets_batch_update;
mod gsheets_read;
mod gsheets_update_cell;

#[cfg(test)]
pub(crate) mod testing;

pub use gdrive_read_file::ReadFileHandler;
pub use gdrive_search::SearchHandler;
pub use gsheets_append_row::AppendRowHandler;
pub use gsheets_batch_update::BatchUpdateHandler;
pub use gsheets_read::ReadSheetHandler;
pub use gsheets_update_cell::UpdateCellHandler;

use std::sync::Arc;

use crate::google::DocumentService;

/// Build the registry of all document tools.
///
/// Pure aggregation: no I/O. Fails on the first name collision or malformed
/// schema so a broken declaration stops the process at startup.
pub fn build_registry(service: Arc<dyn DocumentService>) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new()
        .register_handler(SearchHandler::new(service.clone()))?
        .register_handler(ReadFileHandler::new(service.clone()))?
        .register_handler(UpdateCellHandler::new(service.clone()))?
        .register_handler(ReadSheetHandler::new(service.clone()))?
        .register_handler(AppendRowHandler::new(service.clone()))?
        .register_handler(BatchUpdateHandler::new(service))
}
