//! Session boundary: submit, browse and label operations
//!
//! A session owns one backend and a lazily loaded catalog snapshot. The
//! snapshot is reused until [`IntakeSession::invalidate`] is called, which
//! happens automatically after a save when the catalog lives in the same
//! resource as the intake table.

use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use serde::Serialize;

use super::assemble::{assemble, validate_form};
use super::catalog::CatalogSnapshot;
use super::label::{LabelView, format_label, select_latest};
use super::query::{Aggregates, FilterOptions, RecordFilter, aggregate};
use super::store::{IntakeStore, records_to_table};
use super::types::{IntakeForm, IntakeRecord, SessionError};
use crate::config::TablesConfig;
use crate::storage::TableBackend;

/// Filtered rows plus their summary
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResult {
    pub rows: Vec<IntakeRecord>,
    pub aggregates: Aggregates,
}

pub struct IntakeSession {
    backend: Arc<dyn TableBackend>,
    tables: TablesConfig,
    store: IntakeStore,
    catalog: ArcSwapOption<CatalogSnapshot>,
}

impl IntakeSession {
    pub fn new(backend: Arc<dyn TableBackend>, tables: TablesConfig) -> Self {
        let store = IntakeStore::new(backend.clone(), tables.intake.clone());
        IntakeSession {
            backend,
            tables,
            store,
            catalog: ArcSwapOption::empty(),
        }
    }

    pub fn store(&self) -> &IntakeStore {
        &self.store
    }

    pub fn backend(&self) -> &dyn TableBackend {
        self.backend.as_ref()
    }

    /// The catalog snapshot, loading it on first use
    pub async fn catalog(&self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.catalog.load_full() {
            return Ok(snapshot);
        }

        let names = [
            self.tables.materials.as_str(),
            self.tables.compatibility.as_str(),
            self.tables.locations.as_str(),
        ];
        let tables = self
            .backend
            .read_tables(&names)
            .await
            .with_context(|| format!("Failed to load reference tables from {}", self.backend.describe()))?;

        let snapshot = Arc::new(CatalogSnapshot::from_tables(
            tables[0].as_ref(),
            tables[1].as_ref(),
            tables[2].as_ref(),
        ));
        log::debug!(
            "Loaded catalog: {} materials, {} locations",
            snapshot.materials.len(),
            snapshot.locations.names().len()
        );

        self.catalog.store(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Drop the cached catalog; the next access reloads it
    pub fn invalidate(&self) {
        self.catalog.store(None);
    }

    /// Validate, assemble and persist one intake
    ///
    /// A form without a description gets the catalog description; a form with
    /// one keeps it as typed. Nothing is written unless validation passes and
    /// the current table could be read.
    pub async fn submit(&self, form: IntakeForm) -> Result<IntakeRecord, SessionError> {
        validate_form(&form)?;
        let catalog = self.catalog().await?;
        let description = match form.description.clone() {
            Some(text) => text,
            None => catalog.lookup_description(&form.ni),
        };

        let record = assemble(form, description, &catalog.locations)?;
        self.store.append(record.clone()).await?;

        if self.backend.shares_catalog_resource() {
            self.invalidate();
        }

        log::info!(
            "Recorded intake NI {} (process {}, control {})",
            record.ni,
            record.process_number,
            record.control
        );
        Ok(record)
    }

    /// All records, or none when the store cannot be read
    pub async fn load_for_display(&self) -> Vec<IntakeRecord> {
        match self.store.load_all().await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Showing no intakes: {:#}", err);
                Vec::new()
            }
        }
    }

    /// Filtered rows and aggregates
    pub async fn browse(&self, filter: &RecordFilter) -> BrowseResult {
        let records = self.load_for_display().await;
        let rows: Vec<IntakeRecord> = filter.apply(&records).into_iter().cloned().collect();
        let aggregates = aggregate(&rows);
        BrowseResult { rows, aggregates }
    }

    /// Distinct values available for filters and label selection
    pub async fn options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.load_for_display().await)
    }

    /// Label for the most recent intake of `ni`
    pub async fn print_label(&self, ni: &str) -> Result<LabelView, SessionError> {
        let records = self.load_for_display().await;
        let record = select_latest(&records, ni).ok_or_else(|| SessionError::NotFound {
            ni: ni.to_string(),
        })?;
        let catalog = self.catalog().await?;
        Ok(format_label(record, &catalog))
    }

    /// Create the intake table with its header if it does not exist;
    /// returns whether it was created
    pub async fn init_table(&self) -> Result<bool> {
        if self.store.exists().await? {
            return Ok(false);
        }
        self.backend
            .write_table(self.store.table_name(), &records_to_table(&[]))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::types::{Cell, Status, Table, ValidationError};
    use crate::storage::memory::MemoryBackend;
    use chrono::NaiveDate;
    use std::sync::atomic::Ordering;

    fn materials() -> Table {
        let mut t = Table::new(&["NI", "Descrição"]);
        t.push_row(vec![Cell::text("123"), Cell::text("Bolt")]);
        t.push_row(vec![Cell::text("5"), Cell::text("Porca")]);
        t
    }

    fn compatibility() -> Table {
        let mut t = Table::new(&["NI", "Materiais Incompatíveis"]);
        t.push_row(vec![Cell::text("5"), Cell::text("Ácidos")]);
        t
    }

    fn session_with(backend: MemoryBackend) -> (Arc<MemoryBackend>, IntakeSession) {
        let backend = Arc::new(
            backend
                .with_table("Planilha3", materials())
                .with_table("Compatibilidade", compatibility()),
        );
        let session = IntakeSession::new(backend.clone(), TablesConfig::default());
        (backend, session)
    }

    fn form(process: &str, invoice: &str, ni: &str) -> IntakeForm {
        IntakeForm {
            process_number: process.to_string(),
            invoice_number: invoice.to_string(),
            ni: ni.to_string(),
            supplier: "Acme".to_string(),
            quantity: 3.0,
            status: Status::Recebido,
            ..IntakeForm::dated(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        }
    }

    #[tokio::test]
    async fn test_submit_fills_catalog_description() {
        let (backend, session) = session_with(MemoryBackend::new());

        let record = session.submit(form("P-1", "NF-1", "123")).await.unwrap();
        assert_eq!(record.description, "Bolt");

        let table = backend.table("Recebimento").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_keeps_user_description() {
        let (_, session) = session_with(MemoryBackend::new());
        let mut f = form("P-1", "NF-1", "123");
        f.description = Some("Parafuso M8".to_string());

        let record = session.submit(f).await.unwrap();
        assert_eq!(record.description, "Parafuso M8");
    }

    #[tokio::test]
    async fn test_invalid_submit_leaves_store_unchanged() {
        let (backend, session) = session_with(MemoryBackend::new());
        session.submit(form("P-1", "NF-1", "123")).await.unwrap();
        let before = backend.table("Recebimento").unwrap();
        let writes = backend.writes.load(Ordering::SeqCst);

        let err = session.submit(form("", "X", "Y")).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::MissingFields(_))
        ));
        assert_eq!(backend.table("Recebimento").unwrap(), before);
        assert_eq!(backend.writes.load(Ordering::SeqCst), writes);
    }

    #[tokio::test]
    async fn test_submit_aborts_when_backend_unreachable() {
        let backend = Arc::new(MemoryBackend::unreachable());
        let session = IntakeSession::new(backend.clone(), TablesConfig::default());

        let err = session.submit(form("P-1", "NF-1", "123")).await.unwrap_err();
        assert!(matches!(err, SessionError::StorageUnavailable(_)));
        assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_reported_before_storage_is_touched() {
        let backend = Arc::new(MemoryBackend::unreachable());
        let session = IntakeSession::new(backend.clone(), TablesConfig::default());

        let err = session.submit(form("", "NF-1", "123")).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::MissingFields(_))
        ));
        assert_eq!(backend.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_padded_ni_and_area_found_by_browse_and_label() {
        let (_, session) = session_with(MemoryBackend::new());
        let mut padded = form("P-1", "NF-1", " 5 ");
        padded.area = " Área 2 ".to_string();

        let record = session.submit(padded).await.unwrap();
        assert_eq!(record.ni, "5");
        assert_eq!(record.description, "Porca");

        let result = session
            .browse(&RecordFilter::new(None, None, Some("Área 2")))
            .await;
        assert_eq!(result.rows.len(), 1);

        let label = session.print_label("5").await.unwrap();
        assert_eq!(label.area, "Área 2");
    }

    #[tokio::test]
    async fn test_unknown_stored_status_is_filterable() {
        let mut intake = records_to_table(&[]);
        let status = intake.column_index(crate::intake::types::cols::STATUS).unwrap();
        let ni = intake.column_index(crate::intake::types::cols::NI).unwrap();
        let mut row = vec![Cell::Empty; intake.headers.len()];
        row[status] = Cell::text("Cancelado");
        row[ni] = Cell::text("5");
        intake.push_row(row);

        let (_, session) = session_with(MemoryBackend::new().with_table("Recebimento", intake));
        let result = session
            .browse(&RecordFilter::new(None, Some("Cancelado"), None))
            .await;
        assert_eq!(result.rows.len(), 1);
        assert_eq!(session.options().await.statuses, ["Cancelado"]);
    }

    #[tokio::test]
    async fn test_catalog_cached_until_invalidated() {
        let (backend, session) = session_with(MemoryBackend::new());

        session.catalog().await.unwrap();
        let reads = backend.reads.load(Ordering::SeqCst);
        session.catalog().await.unwrap();
        assert_eq!(backend.reads.load(Ordering::SeqCst), reads);

        session.invalidate();
        session.catalog().await.unwrap();
        assert!(backend.reads.load(Ordering::SeqCst) > reads);
    }

    #[tokio::test]
    async fn test_shared_resource_invalidates_after_save() {
        let (backend, session) = session_with(MemoryBackend::shared());
        session.submit(form("P-1", "NF-1", "123")).await.unwrap();

        let reads = backend.reads.load(Ordering::SeqCst);
        session.catalog().await.unwrap();
        assert!(backend.reads.load(Ordering::SeqCst) > reads);
    }

    #[tokio::test]
    async fn test_separate_resource_keeps_catalog_after_save() {
        let (backend, session) = session_with(MemoryBackend::new());
        session.submit(form("P-1", "NF-1", "123")).await.unwrap();

        let reads = backend.reads.load(Ordering::SeqCst);
        session.catalog().await.unwrap();
        assert_eq!(backend.reads.load(Ordering::SeqCst), reads);
    }

    #[tokio::test]
    async fn test_browse_filters_and_aggregates() {
        let (_, session) = session_with(MemoryBackend::new());
        session.submit(form("P-1", "NF-1", "123")).await.unwrap();
        let mut other = form("P-2", "NF-2", "5");
        other.supplier = "Globex".to_string();
        other.quantity = 4.5;
        session.submit(other).await.unwrap();

        let all = session.browse(&RecordFilter::default()).await;
        assert_eq!(all.aggregates.count, 2);
        assert_eq!(all.aggregates.quantity_sum, 7.5);

        let acme = session
            .browse(&RecordFilter::new(Some("Acme"), Some("Todos"), Some("Todos")))
            .await;
        assert_eq!(acme.rows.len(), 1);
        assert_eq!(acme.rows[0].ni, "123");
    }

    #[tokio::test]
    async fn test_browse_degrades_to_empty_when_unreachable() {
        let session = IntakeSession::new(
            Arc::new(MemoryBackend::unreachable()),
            TablesConfig::default(),
        );
        let result = session.browse(&RecordFilter::default()).await;
        assert!(result.rows.is_empty());
        assert_eq!(result.aggregates.count, 0);
    }

    #[tokio::test]
    async fn test_print_label_uses_latest_record() {
        let (_, session) = session_with(MemoryBackend::new());
        let mut first = form("P-1", "NF-1", "5");
        first.area = "Área 1".to_string();
        session.submit(first).await.unwrap();
        let mut second = form("P-2", "NF-2", "5");
        second.area = "Área 2".to_string();
        session.submit(second).await.unwrap();

        let label = session.print_label("5").await.unwrap();
        assert_eq!(label.area, "Área 2");
        assert_eq!(label.description, "Porca");
        assert_eq!(label.incompatibility.as_deref(), Some("Ácidos"));

        assert!(matches!(
            session.print_label("999").await,
            Err(SessionError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_init_table_only_once() {
        let (backend, session) = session_with(MemoryBackend::new());
        assert!(session.init_table().await.unwrap());
        assert!(!session.init_table().await.unwrap());

        let table = backend.table("Recebimento").unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.headers.len(), 24);
    }
}
