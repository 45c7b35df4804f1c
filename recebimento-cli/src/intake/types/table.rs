//! Backend-neutral tabular snapshot
//!
//! Every storage backend reads and writes whole tables: a header row followed
//! by data rows. Cells keep just enough typing (text vs number) for workbook
//! backends to write numeric columns as numbers.

use serde::{Deserialize, Serialize};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    /// Blank cell
    #[default]
    Empty,
    /// Text cell
    Text(String),
    /// Numeric cell
    Number(f64),
}

impl Cell {
    /// Build a text cell, collapsing empty strings to `Cell::Empty`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// Check if this cell is blank (empty or whitespace-only text)
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Render the cell as text
    ///
    /// Whole numbers render without a fractional part, so a key stored as
    /// `123.0` in a workbook compares equal to the text `"123"`.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
        }
    }

    /// Try to read the cell as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().replace(',', ".").parse().ok(),
            Cell::Empty => None,
        }
    }
}

/// Format a number the way spreadsheets display it
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// A named-column table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by header name (surrounding whitespace ignored)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell at (row, col), `Cell::Empty` when out of range
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    /// Cell text at (row, col), empty when out of range
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).to_text()
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Iterate over the text of one column
    pub fn column_texts(&self, col: usize) -> impl Iterator<Item = String> + '_ {
        (0..self.rows.len()).map(move |row| self.text(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_render_as_integers() {
        assert_eq!(Cell::Number(123.0).to_text(), "123");
        assert_eq!(Cell::Number(2.5).to_text(), "2.5");
        assert_eq!(Cell::Empty.to_text(), "");
    }

    #[test]
    fn test_text_cell_parses_decimal_comma() {
        assert_eq!(Cell::text("1,5").as_number(), Some(1.5));
        assert_eq!(Cell::text("abc").as_number(), None);
        assert_eq!(Cell::text(""), Cell::Empty);
    }

    #[test]
    fn test_push_row_pads_to_header_width() {
        let mut table = Table::new(&["NI", "Descrição"]);
        table.push_row(vec![Cell::text("123")]);
        table.push_row(vec![Cell::text("1"), Cell::text("a"), Cell::text("extra")]);

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 2);
        assert_eq!(table.text(0, 1), "");
        assert_eq!(table.text(5, 0), "");
    }

    #[test]
    fn test_column_index_ignores_padding() {
        let table = Table::new(&[" NI ", "Onde"]);
        assert_eq!(table.column_index("NI"), Some(0));
        assert_eq!(table.column_index("Onde"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }
}
