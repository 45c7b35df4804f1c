//! Intake record store on top of a table backend
//!
//! The store never updates a single row: `append` loads the whole table, adds
//! one record in memory and rewrites everything. Concurrent writers racing this
//! cycle lose updates (last writer wins); there is no locking.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::types::{
    Cell, DATE_FORMAT, IntakeRecord, LegacyCells, Status, Table, TestPeriod, cols,
};
use crate::storage::TableBackend;

pub struct IntakeStore {
    backend: Arc<dyn TableBackend>,
    table_name: String,
}

impl IntakeStore {
    pub fn new(backend: Arc<dyn TableBackend>, table_name: impl Into<String>) -> Self {
        IntakeStore {
            backend,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Load every record in table order
    ///
    /// A missing table is an empty store. Backend failures are returned so
    /// that callers about to rewrite the table can abort instead of
    /// overwriting data they could not read.
    pub async fn load_all(&self) -> Result<Vec<IntakeRecord>> {
        let table = self
            .backend
            .read_table(&self.table_name)
            .await
            .with_context(|| format!("Failed to load table '{}'", self.table_name))?;

        match table {
            Some(table) => Ok(records_from_table(&table)),
            None => {
                log::warn!(
                    "Table '{}' not found in {}, starting empty",
                    self.table_name,
                    self.backend.describe()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the whole persisted table with `records`
    pub async fn save_all(&self, records: &[IntakeRecord]) -> Result<()> {
        self.backend
            .write_table(&self.table_name, &records_to_table(records))
            .await
            .with_context(|| format!("Failed to save table '{}'", self.table_name))
    }

    /// Load all, add one, rewrite all; returns the table as written
    pub async fn append(&self, record: IntakeRecord) -> Result<Vec<IntakeRecord>> {
        let mut records = self.load_all().await?;
        records.push(record);
        self.save_all(&records).await?;
        log::info!(
            "Appended intake to '{}' ({} records)",
            self.table_name,
            records.len()
        );
        Ok(records)
    }

    /// Whether the intake table exists in the backend
    pub async fn exists(&self) -> Result<bool> {
        Ok(self.backend.read_table(&self.table_name).await?.is_some())
    }
}

/// Build the persisted table
///
/// Schema columns come first in schema order, followed by any extra columns
/// carried by records read from an existing table.
pub fn records_to_table(records: &[IntakeRecord]) -> Table {
    let mut extra_headers: Vec<&str> = Vec::new();
    for record in records {
        for (header, _) in &record.legacy.extra {
            if !extra_headers.contains(&header.as_str()) {
                extra_headers.push(header);
            }
        }
    }

    let headers: Vec<&str> = cols::ALL.iter().copied().chain(extra_headers.iter().copied()).collect();
    let mut table = Table::new(&headers);
    for record in records {
        let mut row = record_to_row(record);
        row.extend(
            extra_headers
                .iter()
                .map(|h| record.legacy.extra(h).cloned().unwrap_or_default()),
        );
        table.push_row(row);
    }
    table
}

fn record_to_row(r: &IntakeRecord) -> Vec<Cell> {
    cols::ALL
        .iter()
        .map(|col| {
            r.legacy
                .get(col)
                .cloned()
                .unwrap_or_else(|| schema_cell(r, col))
        })
        .collect()
}

/// The cell a schema column holds for the record's typed fields
fn schema_cell(r: &IntakeRecord, col: &str) -> Cell {
    let int_cell = |v: Option<i64>| v.map(|n| Cell::Number(n as f64)).unwrap_or_default();

    match col {
        cols::TEST_PERIOD => Cell::text(r.test_period.label()),
        cols::MATERIAL_ITEM => Cell::text(r.material_item.clone()),
        cols::INVOICE => Cell::text(r.invoice_number.clone()),
        cols::RR => Cell::text(r.rr.clone()),
        cols::RR2 => Cell::text(r.rr2.clone()),
        cols::ACCESS_KEY => Cell::text(r.access_key.clone()),
        cols::SUPPLIER => Cell::text(r.supplier.clone()),
        cols::QUANTITY => Cell::Number(r.quantity),
        cols::DESCRIPTION => Cell::text(r.description.clone()),
        cols::MATERIAL_TYPE => Cell::text(r.material_type.clone()),
        cols::NI => Cell::text(r.ni.clone()),
        cols::AREA => Cell::text(r.area.clone()),
        cols::PALLET_MEASURE => Cell::text(r.pallet_measure.clone()),
        cols::SCHEDULED => Cell::text(r.scheduled.clone()),
        cols::RECEIVER => Cell::text(r.receiver.clone()),
        cols::STATUS => Cell::text(r.status.label()),
        cols::OBSERVATION => Cell::text(r.observation.clone()),
        cols::PROCESS => Cell::text(r.process_number.clone()),
        cols::CONTROL => Cell::text(r.control.clone()),
        cols::DATE => Cell::text(r.date_text()),
        cols::DAY => int_cell(r.day().map(i64::from)),
        cols::MONTH => int_cell(r.month().map(i64::from)),
        cols::YEAR => int_cell(r.year().map(i64::from)),
        cols::UNIQUE_ID => Cell::text(r.unique_id.clone()),
        _ => Cell::Empty,
    }
}

/// Read records by header name; absent columns read as empty
///
/// Cells the typed fields cannot reproduce, and columns outside the schema,
/// are kept on the record so a rewrite stores them unchanged.
pub fn records_from_table(table: &Table) -> Vec<IntakeRecord> {
    let missing: Vec<_> = cols::ALL
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .collect();
    if !missing.is_empty() && !table.headers.is_empty() {
        log::warn!(
            "Intake table is missing column(s) {:?}, reading them as empty",
            missing
        );
    }

    let extra_cols: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, h)| (idx, h.as_str()))
        .filter(|(_, h)| !h.trim().is_empty() && !cols::ALL.contains(&h.trim()))
        .collect();
    if !extra_cols.is_empty() {
        log::debug!(
            "Intake table has extra column(s) {:?}, carrying them through",
            extra_cols.iter().map(|(_, h)| *h).collect::<Vec<_>>()
        );
    }

    let records: Vec<IntakeRecord> = (0..table.len())
        .map(|row| {
            let reader = RowReader { table, row };
            let mut record = reader.record();
            record.legacy = reader.legacy_cells(&record, &extra_cols);
            record
        })
        .collect();

    let kept = records.iter().filter(|r| !r.legacy.is_empty()).count();
    if kept > 0 {
        log::debug!("{} row(s) keep stored cells outside the typed fields", kept);
    }
    records
}

struct RowReader<'a> {
    table: &'a Table,
    row: usize,
}

impl RowReader<'_> {
    fn cell(&self, col: &str) -> Cell {
        self.table
            .column_index(col)
            .map(|idx| self.table.cell(self.row, idx).clone())
            .unwrap_or_default()
    }

    fn text(&self, col: &str) -> String {
        self.cell(col).to_text()
    }

    /// Stored cells that differ from what `record` would write back
    fn legacy_cells(&self, record: &IntakeRecord, extra_cols: &[(usize, &str)]) -> LegacyCells {
        let overrides = cols::ALL
            .iter()
            .filter_map(|col| {
                let stored = self.cell(col);
                (stored != schema_cell(record, col)).then_some((*col, stored))
            })
            .collect();
        let extra = extra_cols
            .iter()
            .map(|(idx, header)| (header.to_string(), self.table.cell(self.row, *idx).clone()))
            .collect();
        LegacyCells { overrides, extra }
    }

    fn record(&self) -> IntakeRecord {
        let row_num = self.row + 2;

        let quantity_cell = self.cell(cols::QUANTITY);
        let quantity = match quantity_cell.as_number() {
            Some(q) => q,
            None => {
                if !quantity_cell.is_blank() {
                    log::warn!(
                        "Row {}: unreadable quantity '{}', using 0",
                        row_num,
                        quantity_cell.to_text()
                    );
                }
                0.0
            }
        };

        let status_text = self.text(cols::STATUS);
        let status = Status::parse(&status_text).unwrap_or_else(|| {
            log::warn!("Row {}: unknown status '{}'", row_num, status_text);
            Status::Unset
        });

        let period_text = self.text(cols::TEST_PERIOD);
        let test_period = TestPeriod::parse(&period_text).unwrap_or_else(|| {
            if !period_text.trim().is_empty() {
                log::warn!("Row {}: unknown test period '{}'", row_num, period_text);
            }
            TestPeriod::default()
        });

        let date_text = self.text(cols::DATE);
        let date = parse_date(&date_text);
        if date.is_none() && !date_text.trim().is_empty() {
            log::warn!("Row {}: unreadable date '{}'", row_num, date_text);
        }

        IntakeRecord {
            process_number: self.text(cols::PROCESS),
            invoice_number: self.text(cols::INVOICE),
            invoice_item: String::new(),
            material_item: self.text(cols::MATERIAL_ITEM),
            rr: self.text(cols::RR),
            rr2: self.text(cols::RR2),
            access_key: self.text(cols::ACCESS_KEY),
            supplier: self.text(cols::SUPPLIER),
            quantity,
            description: self.text(cols::DESCRIPTION),
            material_type: self.text(cols::MATERIAL_TYPE),
            ni: self.text(cols::NI),
            pallet_measure: self.text(cols::PALLET_MEASURE),
            scheduled: self.text(cols::SCHEDULED),
            receiver: self.text(cols::RECEIVER),
            status,
            area: self.text(cols::AREA),
            observation: self.text(cols::OBSERVATION),
            control: self.text(cols::CONTROL),
            date,
            unique_id: self.text(cols::UNIQUE_ID),
            test_period,
            legacy: LegacyCells::default(),
        }
    }
}

/// Parse a stored date: ISO first, then the Brazilian day-first form
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}
