//! Local `.xlsx` workbook holding the intake and reference sheets

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{TableBackend, WorkbookData};
use crate::intake::Table;

pub struct XlsxFileBackend {
    path: PathBuf,
}

impl XlsxFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        XlsxFileBackend { path: path.into() }
    }

    /// Load the workbook; `None` when the file does not exist yet
    fn load(&self) -> Result<Option<WorkbookData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open Excel file: {}", self.path.display()))?;
        WorkbookData::read(BufReader::new(file))
            .with_context(|| format!("Failed to read Excel file: {}", self.path.display()))
            .map(Some)
    }
}

#[async_trait]
impl TableBackend for XlsxFileBackend {
    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }

    fn shares_catalog_resource(&self) -> bool {
        true
    }

    async fn read_table(&self, name: &str) -> Result<Option<Table>> {
        Ok(self
            .load()?
            .and_then(|workbook| workbook.sheet(name).cloned()))
    }

    async fn read_tables(&self, names: &[&str]) -> Result<Vec<Option<Table>>> {
        let workbook = self.load()?;
        Ok(names
            .iter()
            .map(|name| workbook.as_ref().and_then(|wb| wb.sheet(name).cloned()))
            .collect())
    }

    async fn write_table(&self, name: &str, table: &Table) -> Result<()> {
        let mut workbook = self.load()?.unwrap_or_default();
        workbook.upsert(name, table.clone());
        let bytes = workbook.to_xlsx_bytes()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("xlsx.tmp");
        fs::write(&tmp_path, bytes)
            .with_context(|| format!("Failed to write Excel file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to save Excel file: {}", self.path.display()))?;

        log::info!("Wrote {} rows to sheet '{}' in {}", table.len(), name, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::Cell;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_as_absent() {
        let tmp = tempdir().unwrap();
        let backend = XlsxFileBackend::new(tmp.path().join("modelo.xlsx"));
        assert!(backend.read_table("Recebimento").await.unwrap().is_none());
        assert_eq!(
            backend.read_tables(&["a", "b"]).await.unwrap(),
            vec![None, None]
        );
    }

    #[tokio::test]
    async fn test_write_preserves_other_sheets() {
        let tmp = tempdir().unwrap();
        let backend = XlsxFileBackend::new(tmp.path().join("modelo.xlsx"));

        let mut materials = Table::new(&["NI", "Descrição"]);
        materials.push_row(vec![Cell::text("123"), Cell::text("Bolt")]);
        backend.write_table("Planilha3", &materials).await.unwrap();

        let mut intake = Table::new(&["08 - Ni", "10 - Qtd"]);
        intake.push_row(vec![Cell::text("123"), Cell::Number(4.0)]);
        backend.write_table("Recebimento", &intake).await.unwrap();

        let tables = backend
            .read_tables(&["Planilha3", "Recebimento", "Compatibilidade"])
            .await
            .unwrap();
        assert_eq!(tables[0].as_ref().unwrap().text(0, 1), "Bolt");
        assert_eq!(tables[1].as_ref().unwrap().text(0, 1), "4");
        assert!(tables[2].is_none());
    }
}
