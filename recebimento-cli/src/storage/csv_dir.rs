//! Local flat files: one `<table>.csv` per table in a directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, Writer};

use super::TableBackend;
use crate::intake::{Cell, Table};

pub struct CsvDirBackend {
    dir: PathBuf,
}

impl CsvDirBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvDirBackend { dir: dir.into() }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

#[async_trait]
impl TableBackend for CsvDirBackend {
    fn describe(&self) -> String {
        format!("csv directory {}", self.dir.display())
    }

    fn shares_catalog_resource(&self) -> bool {
        false
    }

    async fn read_table(&self, name: &str) -> Result<Option<Table>> {
        let path = self.table_path(name);
        if !path.exists() {
            return Ok(None);
        }
        read_csv(&path).map(Some)
    }

    async fn write_table(&self, name: &str, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.table_path(name);
        let tmp_path = self.dir.join(format!(".{}.csv.tmp", name));
        write_csv(&tmp_path, table)?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace CSV file: {}", path.display()))?;

        log::info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(&headers);
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read CSV row {} in {}", idx + 2, path.display()))?;

        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(Cell::text).collect());
    }

    Ok(table)
}

fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(&table.headers)
        .context("Failed to write CSV header")?;

    for (idx, row) in table.rows.iter().enumerate() {
        wtr.write_record(row.iter().map(|c| c.to_text()))
            .with_context(|| format!("Failed to write CSV row {}", idx + 1))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
