//! Filtering and aggregation over loaded intake records

use std::collections::HashSet;

use serde::Serialize;

use super::types::IntakeRecord;

/// Sentinel values meaning "no filter"
pub const ANY_SENTINELS: [&str; 2] = ["Todos", "All"];

/// A single filter criterion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Criterion {
    /// Match everything
    #[default]
    Any,
    /// Exact string match
    Exact(String),
}

impl Criterion {
    /// Parse a user-supplied criterion; missing values and the sentinels
    /// "Todos"/"All" match everything
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Criterion::Any,
            Some(v) if ANY_SENTINELS.contains(&v) => Criterion::Any,
            Some(v) => Criterion::Exact(v.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Criterion::Any => true,
            Criterion::Exact(expected) => expected == value,
        }
    }
}

/// Conjunctive filter over supplier, status and area
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFilter {
    pub supplier: Criterion,
    pub status: Criterion,
    pub area: Criterion,
}

impl RecordFilter {
    pub fn new(supplier: Option<&str>, status: Option<&str>, area: Option<&str>) -> Self {
        RecordFilter {
            supplier: Criterion::parse(supplier),
            status: Criterion::parse(status),
            area: Criterion::parse(area),
        }
    }

    pub fn matches(&self, record: &IntakeRecord) -> bool {
        self.supplier.matches(&record.supplier)
            && self.status.matches(&record.status_text())
            && self.area.matches(&record.area)
    }

    /// Records matching every criterion, in their original order
    pub fn apply<'a>(&self, records: &'a [IntakeRecord]) -> Vec<&'a IntakeRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Summary figures for a set of records
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregates {
    pub count: usize,
    pub quantity_sum: f64,
    pub distinct_supplier_count: usize,
    pub distinct_area_count: usize,
}

/// Count, quantity total and distinct non-empty suppliers/areas
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a IntakeRecord>) -> Aggregates {
    let mut count = 0;
    let mut quantity_sum = 0.0;
    let mut suppliers = HashSet::new();
    let mut areas = HashSet::new();

    for record in records {
        count += 1;
        quantity_sum += record.quantity;
        if !record.supplier.is_empty() {
            suppliers.insert(record.supplier.as_str());
        }
        if !record.area.is_empty() {
            areas.insert(record.area.as_str());
        }
    }

    Aggregates {
        count,
        quantity_sum,
        distinct_supplier_count: suppliers.len(),
        distinct_area_count: areas.len(),
    }
}

/// Values available in each filter dropdown, first-seen order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterOptions {
    pub suppliers: Vec<String>,
    pub statuses: Vec<String>,
    pub areas: Vec<String>,
    /// NIs that have at least one intake (label candidates)
    pub nis: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[IntakeRecord]) -> Self {
        FilterOptions {
            suppliers: distinct(records.iter().map(|r| r.supplier.as_str())),
            statuses: distinct(records.iter().map(|r| r.status_text())),
            areas: distinct(records.iter().map(|r| r.area.as_str())),
            nis: distinct(records.iter().map(|r| r.ni.as_str())),
        }
    }
}

fn distinct<S: AsRef<str>>(values: impl Iterator<Item = S>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref();
        if !value.is_empty() && seen.insert(value.to_string()) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::types::Status;

    fn record(supplier: &str, status: Status, area: &str, qty: f64) -> IntakeRecord {
        IntakeRecord {
            supplier: supplier.to_string(),
            status,
            area: area.to_string(),
            quantity: qty,
            ni: format!("{}-{}", supplier, qty),
            ..Default::default()
        }
    }

    fn sample() -> Vec<IntakeRecord> {
        vec![
            record("Acme", Status::Recebido, "Área 1", 10.0),
            record("Globex", Status::Pendente, "Área 2", 5.0),
            record("Acme", Status::Pendente, "Área 2", 2.5),
            record("Initech", Status::Unset, "", 1.0),
        ]
    }

    #[test]
    fn test_all_sentinels_is_identity() {
        let records = sample();
        let filter = RecordFilter::new(Some("Todos"), Some("Todos"), Some("Todos"));
        let result = filter.apply(&records);

        assert_eq!(result.len(), records.len());
        for (got, expected) in result.iter().zip(records.iter()) {
            assert_eq!(*got, expected);
        }
    }

    #[test]
    fn test_supplier_filter_preserves_order() {
        let records = sample();
        let filter = RecordFilter::new(Some("Acme"), Some("Todos"), Some("Todos"));
        let result = filter.apply(&records);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].quantity, 10.0);
        assert_eq!(result[1].quantity, 2.5);
        assert!(result.iter().all(|r| r.supplier == "Acme"));
    }

    #[test]
    fn test_criteria_compose_conjunctively() {
        let records = sample();
        let filter = RecordFilter::new(Some("Acme"), Some("Pendente"), Some("All"));
        let result = filter.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].area, "Área 2");

        let filter = RecordFilter::new(Some("Globex"), None, Some("Área 1"));
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_aggregate_empty() {
        let empty: Vec<IntakeRecord> = Vec::new();
        assert_eq!(aggregate(&empty), Aggregates::default());
        let agg = aggregate(&empty);
        assert_eq!(agg.count, 0);
        assert_eq!(agg.quantity_sum, 0.0);
    }

    #[test]
    fn test_aggregate_counts_distinct_non_empty() {
        let records = sample();
        let agg = aggregate(&records);
        assert_eq!(agg.count, 4);
        assert_eq!(agg.quantity_sum, 18.5);
        assert_eq!(agg.distinct_supplier_count, 3);
        assert_eq!(agg.distinct_area_count, 2);
    }

    #[test]
    fn test_aggregate_over_filtered_view() {
        let records = sample();
        let filtered = RecordFilter::new(Some("Acme"), None, None).apply(&records);
        let agg = aggregate(filtered);
        assert_eq!(agg.count, 2);
        assert_eq!(agg.quantity_sum, 12.5);
        assert_eq!(agg.distinct_area_count, 2);
    }

    #[test]
    fn test_filter_options() {
        let options = FilterOptions::from_records(&sample());
        assert_eq!(options.suppliers, ["Acme", "Globex", "Initech"]);
        assert_eq!(options.statuses, ["Recebido", "Pendente"]);
        assert_eq!(options.areas, ["Área 1", "Área 2"]);
    }
}
