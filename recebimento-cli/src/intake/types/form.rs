//! Raw form input for a new intake

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{Status, TestPeriod};

/// Field values as typed by the user, before validation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntakeForm {
    pub date: NaiveDate,
    pub process_number: String,
    pub invoice_number: String,
    pub invoice_item: String,
    pub material_item: String,
    pub rr: String,
    pub rr2: String,
    pub access_key: String,
    pub supplier: String,
    pub ni: String,
    pub quantity: f64,
    /// User-edited description; `None` keeps the catalog description
    pub description: Option<String>,
    pub material_type: String,
    pub pallet_measure: String,
    pub scheduled: String,
    pub receiver: String,
    pub status: Status,
    pub area: String,
    pub observation: String,
    /// User-edited control token; `None` or blank generates a fresh one
    pub control: Option<String>,
    pub test_period: TestPeriod,
}

impl IntakeForm {
    /// Start a form dated on the given day
    #[cfg(test)]
    pub fn dated(date: NaiveDate) -> Self {
        IntakeForm {
            date,
            ..Default::default()
        }
    }
}
