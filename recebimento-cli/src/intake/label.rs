//! Material labels for received intakes

use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::catalog::CatalogSnapshot;
use super::types::{IntakeRecord, format_number};

const TITLE: &str = "RÓTULO DE MATERIAL";

/// Fixed-field projection of one intake, joined with catalog data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelView {
    pub ni: String,
    pub description: String,
    pub supplier: String,
    pub quantity: f64,
    pub area: String,
    pub date: String,
    /// Omitted entirely when the catalog has no incompatibilities for the NI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incompatibility: Option<String>,
}

/// The most recently appended record for `ni`
pub fn select_latest<'a>(records: &'a [IntakeRecord], ni: &str) -> Option<&'a IntakeRecord> {
    records.iter().rev().find(|r| r.ni == ni)
}

/// Project a record into a label
///
/// The catalog description wins; the record's own description is used only
/// when the catalog has none.
pub fn format_label(record: &IntakeRecord, catalog: &CatalogSnapshot) -> LabelView {
    let description = catalog.lookup_description(&record.ni);
    let description = if description.is_empty() {
        record.description.clone()
    } else {
        description
    };
    let incompatibility = catalog.lookup_incompatibility(&record.ni);

    LabelView {
        ni: record.ni.clone(),
        description,
        supplier: record.supplier.clone(),
        quantity: record.quantity,
        area: record.area.clone(),
        date: record.date_text(),
        incompatibility: (!incompatibility.trim().is_empty()).then_some(incompatibility),
    }
}

impl LabelView {
    /// (caption, value) pairs in print order; the incompatibility row is last
    /// and only present when there is one
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("NI", self.ni.clone()),
            ("Descrição", self.description.clone()),
            ("Fornecedor", self.supplier.clone()),
            ("Quantidade", format_number(self.quantity)),
            ("Área", self.area.clone()),
            ("Data", self.date.clone()),
        ];
        if let Some(ref text) = self.incompatibility {
            rows.push(("Incompatibilidade", text.clone()));
        }
        rows
    }

    /// Boxed terminal rendering
    pub fn render_text(&self) -> String {
        let rows = self.rows();
        let caption_width = rows.iter().map(|(c, _)| c.width()).max().unwrap_or(0) + 1;
        let value_width = rows.iter().map(|(_, v)| v.width()).max().unwrap_or(0);
        let inner = (caption_width + 3 + value_width).max(TITLE.width());

        let mut out = String::new();
        out.push_str(&format!("┌{}┐\n", "─".repeat(inner + 2)));
        out.push_str(&format!("│ {} │\n", center(TITLE, inner).bold()));
        out.push_str(&format!("├{}┤\n", "─".repeat(inner + 2)));

        for (caption, value) in &rows {
            let caption_cell = pad(&format!("{}:", caption), caption_width);
            let value_cell = pad(value, inner - caption_width - 3);
            let is_alert = *caption == "Incompatibilidade";
            let (caption_cell, value_cell) = if is_alert {
                (caption_cell.red().bold(), value_cell.red())
            } else {
                (caption_cell.bold(), value_cell.normal())
            };
            out.push_str(&format!("│ {} │ {} │\n", caption_cell, value_cell));
        }

        out.push_str(&format!("└{}┘\n", "─".repeat(inner + 2)));
        out
    }

    /// Standalone HTML document for printing
    pub fn render_html(&self) -> String {
        let mut rows = String::new();
        for (caption, value) in self.rows() {
            let style = if caption == "Incompatibilidade" {
                " class=\"alert\""
            } else {
                ""
            };
            rows.push_str(&format!(
                "      <tr{style}><th>{}:</th><td>{}</td></tr>\n",
                escape_html(caption),
                escape_html(&value),
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>{title} - {ni}</title>
  <style>
    body {{ font-family: sans-serif; }}
    .label {{ border: 2px solid #000; padding: 20px; background-color: white; }}
    h3 {{ text-align: center; }}
    table {{ width: 100%; border-collapse: collapse; }}
    th, td {{ border: 1px solid #000; padding: 8px; text-align: left; }}
    .alert th, .alert td {{ color: red; }}
  </style>
</head>
<body onload="window.print()">
  <div class="label">
    <h3>{title}</h3>
    <table>
{rows}    </table>
  </div>
</body>
</html>
"#,
            title = TITLE,
            ni = escape_html(&self.ni),
            rows = rows,
        )
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    let left = fill / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
