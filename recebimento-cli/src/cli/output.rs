//! Terminal, JSON and CSV rendering of command results

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use csv::Writer;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::intake::store::records_to_table;
use crate::intake::{Aggregates, IntakeRecord, Table, format_number};

/// Columns shown in the terminal listing
const LISTING_HEADERS: [&str; 10] = [
    "Data",
    "NI",
    "Descrição",
    "Fornecedor",
    "Qtd",
    "Status",
    "Área",
    "Nº Processo",
    "NF",
    "Controle",
];

fn listing_row(r: &IntakeRecord) -> [String; 10] {
    [
        r.date_text(),
        r.ni.clone(),
        r.description.clone(),
        r.supplier.clone(),
        format_number(r.quantity),
        r.status_text(),
        r.area.clone(),
        r.process_number.clone(),
        r.invoice_number.clone(),
        r.control.clone(),
    ]
}

/// Longest value shown in a listing cell before truncation
const MAX_CELL_WIDTH: usize = 32;

/// Aligned table of records
pub fn render_records(records: &[IntakeRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", "Nenhum dado encontrado.".dimmed());
    }

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            listing_row(r)
                .iter()
                .map(|value| truncate(value, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = LISTING_HEADERS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| row[col].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = LISTING_HEADERS
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad(name, *w).bold().cyan().to_string())
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(v, w)| pad(v, *w)).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Summary line block for aggregates
pub fn render_aggregates(agg: &Aggregates) -> String {
    format!(
        "{} {}   {} {}   {} {}   {} {}\n",
        "Total:".bold(),
        agg.count.to_string().bright_green(),
        "Qtd Total:".bold(),
        format_number(agg.quantity_sum).bright_green(),
        "Fornecedores:".bold(),
        agg.distinct_supplier_count.to_string().bright_green(),
        "Áreas:".bold(),
        agg.distinct_area_count.to_string().bright_green(),
    )
}

/// Records as CSV in the persisted column layout
pub fn records_to_csv(records: &[IntakeRecord]) -> Result<String> {
    table_to_csv(&records_to_table(records))
}

fn table_to_csv(table: &Table) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(&table.headers)
        .context("Failed to write CSV header")?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| c.to_text()))
            .context("Failed to write CSV row")?;
    }
    let bytes = wtr.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format JSON output")
}

/// Write to `output` when given, otherwise print to stdout
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            eprintln!("Saved to: {}", path.display().to_string().bright_green());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn truncate(text: &str, max: usize) -> String {
    let text = text.replace('\n', " ");
    if text.width() <= max {
        return text;
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 2 > max {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{Status, cols};

    fn record(ni: &str, supplier: &str) -> IntakeRecord {
        IntakeRecord {
            ni: ni.to_string(),
            supplier: supplier.to_string(),
            quantity: 2.0,
            status: Status::Recebido,
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_uses_persisted_layout() {
        let csv = records_to_csv(&[record("123", "Acme, Ltda")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), cols::ALL.join(","));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Acme, Ltda\""));
        assert!(row.contains("Recebido"));
    }

    #[test]
    fn test_listing_has_one_line_per_record() {
        colored::control::set_override(false);
        let text = render_records(&[record("1", "Acme"), record("2", "Globex")]);
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().starts_with("Data"));
    }

    #[test]
    fn test_truncate_long_values() {
        let long = "x".repeat(50);
        let cut = truncate(&long, 10);
        assert!(cut.width() <= 10);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("curto", 10), "curto");
    }
}
