//! `.xlsx` workbook published on a file share over HTTP
//!
//! Reads download the whole workbook; writes download it, replace one sheet
//! and upload the whole workbook back with `PUT`.

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use super::{TableBackend, WorkbookData};
use crate::intake::Table;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct HttpWorkbookBackend {
    url: String,
    client: Client,
}

impl HttpWorkbookBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(url, client))
    }

    fn with_client(url: impl Into<String>, client: Client) -> Self {
        HttpWorkbookBackend {
            url: url.into(),
            client,
        }
    }

    /// Download the workbook; `None` when the server reports it missing
    async fn download(&self) -> Result<Option<WorkbookData>> {
        log::debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to download workbook: {}", self.url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("Workbook download rejected: {}", self.url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read workbook body: {}", self.url))?;

        let workbook = WorkbookData::read(Cursor::new(bytes.to_vec()))
            .with_context(|| format!("Downloaded workbook is not a valid .xlsx: {}", self.url))?;
        log::debug!(
            "Downloaded workbook with sheets: {}",
            workbook.sheet_names().collect::<Vec<_>>().join(", ")
        );
        Ok(Some(workbook))
    }

    async fn upload(&self, bytes: Vec<u8>) -> Result<()> {
        log::debug!("PUT {} ({} bytes)", self.url, bytes.len());
        self.client
            .put(&self.url)
            .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Failed to upload workbook: {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Workbook upload rejected: {}", self.url))?;
        Ok(())
    }
}

#[async_trait]
impl TableBackend for HttpWorkbookBackend {
    fn describe(&self) -> String {
        format!("remote workbook {}", self.url)
    }

    fn shares_catalog_resource(&self) -> bool {
        true
    }

    async fn read_table(&self, name: &str) -> Result<Option<Table>> {
        Ok(self
            .download()
            .await?
            .and_then(|workbook| workbook.sheet(name).cloned()))
    }

    async fn read_tables(&self, names: &[&str]) -> Result<Vec<Option<Table>>> {
        let workbook = self.download().await?;
        Ok(names
            .iter()
            .map(|name| workbook.as_ref().and_then(|wb| wb.sheet(name).cloned()))
            .collect())
    }

    async fn write_table(&self, name: &str, table: &Table) -> Result<()> {
        let mut workbook = self.download().await?.unwrap_or_default();
        workbook.upsert(name, table.clone());
        self.upload(workbook.to_xlsx_bytes()?).await?;

        log::info!("Uploaded {} rows to sheet '{}' at {}", table.len(), name, self.url);
        Ok(())
    }
}
