//! In-memory backend for tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::TableBackend;
use crate::intake::Table;

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Table>>,
    shared: bool,
    fail_reads: bool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like a workbook: catalog and intake share one resource
    pub fn shared() -> Self {
        MemoryBackend {
            shared: true,
            ..Self::default()
        }
    }

    /// Every read fails, as if the backend were unreachable
    pub fn unreachable() -> Self {
        MemoryBackend {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn with_table(self, name: &str, table: Table) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(name.to_string(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<Table> {
        self.tables.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl TableBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn shares_catalog_resource(&self) -> bool {
        self.shared
    }

    async fn read_table(&self, name: &str) -> Result<Option<Table>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            bail!("backend unreachable");
        }
        Ok(self.table(name))
    }

    async fn write_table(&self, name: &str, table: &Table) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.tables
            .lock()
            .unwrap()
            .insert(name.to_string(), table.clone());
        Ok(())
    }
}
