//! Storage backends for whole-table reads and rewrites
//!
//! None of the supported stores can append one structured row atomically, so
//! every backend exposes the same two operations: read a whole table and
//! replace a whole table.

mod csv_dir;
mod http;
#[cfg(test)]
pub mod memory;
mod workbook;
mod xlsx_file;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{BackendKind, StorageConfig};
use crate::intake::Table;

pub use csv_dir::CsvDirBackend;
pub use http::HttpWorkbookBackend;
pub use workbook::WorkbookData;
pub use xlsx_file::XlsxFileBackend;

/// A store of named tables
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Human-readable location, for logs and messages
    fn describe(&self) -> String;

    /// Whether reference tables live in the same resource as the intake
    /// table, so a save may have changed them too
    fn shares_catalog_resource(&self) -> bool;

    /// Read a whole table; `Ok(None)` when it does not exist
    async fn read_table(&self, name: &str) -> Result<Option<Table>>;

    /// Read several tables; backends that fetch a whole resource override
    /// this to fetch once
    async fn read_tables(&self, names: &[&str]) -> Result<Vec<Option<Table>>> {
        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            tables.push(self.read_table(name).await?);
        }
        Ok(tables)
    }

    /// Replace a whole table with `table`
    async fn write_table(&self, name: &str, table: &Table) -> Result<()>;
}

/// Open the backend selected by the storage configuration
pub fn open_backend(config: &StorageConfig) -> Result<Arc<dyn TableBackend>> {
    let backend: Arc<dyn TableBackend> = match config.backend {
        BackendKind::Csv => Arc::new(CsvDirBackend::new(config.resolved_path())),
        BackendKind::Xlsx => Arc::new(XlsxFileBackend::new(config.resolved_path())),
        BackendKind::Http => {
            let url = config.url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.url is required for the http backend")
            })?;
            Arc::new(HttpWorkbookBackend::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?)
        }
    };

    log::debug!("Using storage backend: {}", backend.describe());
    Ok(backend)
}
