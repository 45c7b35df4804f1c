//! Whole-workbook snapshot shared by the `.xlsx` backends
//!
//! Reading loads every sheet; writing replaces one sheet and re-emits the full
//! workbook, so sheets other than the one being saved keep their data.

use std::io::{Read, Seek};

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Days, NaiveDate};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::intake::{Cell, Table};

/// Every sheet of a workbook, in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    sheets: Vec<(String, Table)>,
}

impl WorkbookData {
    /// Parse an `.xlsx` workbook
    pub fn read<RS: Read + Seek>(reader: RS) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(reader).context("Failed to parse workbook")?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&sheet_name)
                .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;
            sheets.push((sheet_name, range_to_table(&range)));
        }

        Ok(WorkbookData { sheets })
    }

    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, table)| table)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    /// Replace a sheet's contents, adding the sheet at the end if absent
    pub fn upsert(&mut self, name: &str, table: Table) {
        match self.sheets.iter_mut().find(|(sheet, _)| sheet == name) {
            Some((_, existing)) => *existing = table,
            None => self.sheets.push((name.to_string(), table)),
        }
    }

    /// Serialise to `.xlsx` bytes
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        for (name, table) in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(name)
                .with_context(|| format!("Invalid sheet name: {}", name))?;
            write_table(worksheet, table)
                .with_context(|| format!("Failed to write sheet: {}", name))?;
        }

        workbook
            .save_to_buffer()
            .context("Failed to serialise workbook")
    }
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::default();
    };

    let headers: Vec<String> = header.iter().map(|c| data_to_cell(c).to_text()).collect();
    let mut table = Table::new(&headers);

    for row in rows {
        let cells: Vec<Cell> = row.iter().map(data_to_cell).collect();
        if cells.iter().all(Cell::is_blank) {
            continue;
        }
        table.push_row(cells);
    }

    table
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| Cell::Text(d.format(crate::intake::DATE_FORMAT).to_string()))
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => Cell::text(s.get(..10).unwrap_or(s).to_string()),
        Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// Convert an Excel serial day number (1900 date system) to a date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn write_table(ws: &mut Worksheet, table: &Table) -> Result<()> {
    for (col, name) in table.headers.iter().enumerate() {
        ws.write_string(0, col as u16, name)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Empty => { /* Leave cell empty */ }
                Cell::Text(s) => {
                    ws.write_string(row_num, col as u16, s)?;
                }
                Cell::Number(n) => {
                    ws.write_number(row_num, col as u16, *n)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_serial_dates() {
        assert_eq!(
            excel_serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
    }

    #[test]
    fn test_workbook_bytes_keep_every_sheet() {
        let mut materials = Table::new(&["NI", "Descrição"]);
        materials.push_row(vec![Cell::Number(123.0), Cell::text("Bolt")]);
        let mut locations = Table::new(&["Onde"]);
        locations.push_row(vec![Cell::text("Doca")]);

        let mut data = WorkbookData::default();
        data.upsert("Planilha3", materials);
        data.upsert("Planilha1", locations);

        let bytes = data.to_xlsx_bytes().unwrap();
        let mut read = WorkbookData::read(Cursor::new(bytes)).unwrap();

        assert_eq!(read.sheet_names().collect::<Vec<_>>(), ["Planilha3", "Planilha1"]);
        let sheet = read.sheet("Planilha3").unwrap();
        assert_eq!(sheet.text(0, 0), "123");
        assert_eq!(sheet.text(0, 1), "Bolt");

        let mut replaced = Table::new(&["Onde"]);
        replaced.push_row(vec![Cell::text("Pátio")]);
        read.upsert("Planilha1", replaced);
        assert_eq!(read.sheet("Planilha1").unwrap().text(0, 0), "Pátio");
        assert_eq!(read.sheet_names().count(), 2);
    }
}
