//! Intake record and its persisted column layout

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::table::Cell;

/// Persisted intake columns, in the order they are written
pub mod cols {
    pub const TEST_PERIOD: &str = "teste";
    pub const MATERIAL_ITEM: &str = "04 - Item Material na NF";
    pub const INVOICE: &str = "02 - Nf";
    pub const RR: &str = "05 - RR";
    pub const RR2: &str = "6 - RR";
    pub const ACCESS_KEY: &str = "06 - Chave de acesso";
    pub const SUPPLIER: &str = "07 - Fornecedor";
    pub const QUANTITY: &str = "10 - Qtd";
    pub const DESCRIPTION: &str = "09 - Descrição Material";
    pub const MATERIAL_TYPE: &str = "11 - Tipo";
    pub const NI: &str = "08 - Ni";
    pub const AREA: &str = "17 - Área";
    pub const PALLET_MEASURE: &str = "12 - Medida Pallets";
    pub const SCHEDULED: &str = "13 - Programado";
    pub const RECEIVER: &str = "15 - Recebedor";
    pub const STATUS: &str = "14 - Status";
    pub const OBSERVATION: &str = "16 - Observação";
    pub const PROCESS: &str = "01 - Nº Processo";
    pub const CONTROL: &str = "Controle";
    pub const DATE: &str = "Data";
    pub const DAY: &str = "Dia";
    pub const MONTH: &str = "Mês";
    pub const YEAR: &str = "Ano";
    pub const UNIQUE_ID: &str = "__PowerAppsId__";

    /// All columns in write order
    pub const ALL: [&str; 24] = [
        TEST_PERIOD,
        MATERIAL_ITEM,
        INVOICE,
        RR,
        RR2,
        ACCESS_KEY,
        SUPPLIER,
        QUANTITY,
        DESCRIPTION,
        MATERIAL_TYPE,
        NI,
        AREA,
        PALLET_MEASURE,
        SCHEDULED,
        RECEIVER,
        STATUS,
        OBSERVATION,
        PROCESS,
        CONTROL,
        DATE,
        DAY,
        MONTH,
        YEAR,
        UNIQUE_ID,
    ];
}

/// Date format used in the `Data` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Receiving status of an intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// No status chosen
    #[default]
    Unset,
    Recebido,
    Pendente,
    EmAnalise,
}

impl Status {
    /// Text stored in the table
    pub fn label(&self) -> &'static str {
        match self {
            Status::Unset => "",
            Status::Recebido => "Recebido",
            Status::Pendente => "Pendente",
            Status::EmAnalise => "Em Análise",
        }
    }

    /// All variants, in form order
    pub fn all_variants() -> &'static [Status] {
        &[
            Status::Unset,
            Status::Recebido,
            Status::Pendente,
            Status::EmAnalise,
        ]
    }

    /// Parse stored text, `None` for unknown values
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Status::all_variants()
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(text) || s.label() == text)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Test-period tag carried by every intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestPeriod {
    #[default]
    OutroPeriodo,
    PeriodoAtual,
}

impl TestPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            TestPeriod::OutroPeriodo => "Outro Período",
            TestPeriod::PeriodoAtual => "Período Atual",
        }
    }

    pub fn all_variants() -> &'static [TestPeriod] {
        &[TestPeriod::OutroPeriodo, TestPeriod::PeriodoAtual]
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        TestPeriod::all_variants()
            .iter()
            .copied()
            .find(|p| p.label() == text)
    }
}

impl std::fmt::Display for TestPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored cells a record read from a table could not represent in its typed
/// fields; they are written back verbatim on the next rewrite
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyCells {
    /// Schema columns whose stored cell differs from the typed rendering
    pub overrides: Vec<(&'static str, Cell)>,
    /// Columns outside the schema, in table order
    pub extra: Vec<(String, Cell)>,
}

impl LegacyCells {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.extra.is_empty()
    }

    /// Stored cell for a schema column, when it overrides the typed value
    pub fn get(&self, col: &str) -> Option<&Cell> {
        self.overrides
            .iter()
            .find(|(name, _)| *name == col)
            .map(|(_, cell)| cell)
    }

    /// Cell of an extra column
    pub fn extra(&self, header: &str) -> Option<&Cell> {
        self.extra
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, cell)| cell)
    }
}

/// One received-material event
///
/// Records are built by the assembler, appended to the store and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub process_number: String,
    pub invoice_number: String,
    /// Captured on the form; not part of the persisted column set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub invoice_item: String,
    pub material_item: String,
    pub rr: String,
    pub rr2: String,
    pub access_key: String,
    pub supplier: String,
    pub quantity: f64,
    pub description: String,
    pub material_type: String,
    pub ni: String,
    pub pallet_measure: String,
    pub scheduled: String,
    pub receiver: String,
    pub status: Status,
    pub area: String,
    pub observation: String,
    pub control: String,
    /// Intake date; `None` only for legacy rows whose date could not be read
    pub date: Option<NaiveDate>,
    pub unique_id: String,
    pub test_period: TestPeriod,
    /// Cells kept from the stored row; empty for newly assembled records
    #[serde(skip)]
    pub legacy: LegacyCells,
}

impl IntakeRecord {
    pub fn day(&self) -> Option<u32> {
        self.date.map(|d| d.day())
    }

    pub fn month(&self) -> Option<u32> {
        self.date.map(|d| d.month())
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    /// Status as stored, including values outside the known set
    pub fn status_text(&self) -> String {
        match self.legacy.get(cols::STATUS) {
            Some(cell) => cell.to_text(),
            None => self.status.label().to_string(),
        }
    }

    /// Date as stored in the `Data` column
    pub fn date_text(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}
