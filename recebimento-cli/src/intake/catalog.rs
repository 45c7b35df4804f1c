//! Reference catalogs: material descriptions, incompatibilities and locations
//!
//! All three are loaded wholesale into a [`CatalogSnapshot`] and never change
//! afterwards. Lookups are pure reads; a miss is an empty string, not an error.

use super::types::Table;

/// Column names in the reference tables
mod cols {
    pub const COMPAT_NI: &str = "NI";
    pub const COMPAT_INCOMPATIBLE: &str = "Materiais Incompatíveis";
    pub const LOCATION: &str = "Onde";
}

/// Locations offered when the locations table is missing or empty
pub const DEFAULT_LOCATIONS: [&str; 5] = ["Área 1", "Área 2", "Área 3", "Estoque A", "Estoque B"];

/// Material descriptions keyed by the first column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialCatalog {
    entries: Vec<(String, String)>,
}

impl MaterialCatalog {
    /// Build from a [key, description, ...] table
    pub fn from_table(table: &Table) -> Self {
        if table.headers.len() < 2 {
            if !table.headers.is_empty() {
                log::warn!(
                    "Materials table has {} column(s), expected at least 2 - descriptions unavailable",
                    table.headers.len()
                );
            }
            return Self::default();
        }

        let entries = (0..table.len())
            .map(|row| (table.text(row, 0).trim().to_string(), table.text(row, 1)))
            .collect();

        MaterialCatalog { entries }
    }

    #[cfg(test)]
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        MaterialCatalog {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Description of the first entry whose key equals `ni`
    pub fn lookup(&self, ni: &str) -> String {
        let ni = ni.trim();
        if ni.is_empty() {
            return String::new();
        }
        self.entries
            .iter()
            .find(|(key, _)| key == ni)
            .map(|(_, desc)| desc.clone())
            .unwrap_or_default()
    }
}

/// Incompatibility lists keyed by the "NI" column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatibilityCatalog {
    /// (ni, incompatibility text); text is `None` when the table lacks the column
    entries: Vec<(String, Option<String>)>,
}

impl CompatibilityCatalog {
    pub fn from_table(table: &Table) -> Self {
        let Some(ni_col) = table.column_index(cols::COMPAT_NI) else {
            if !table.headers.is_empty() {
                log::warn!("Compatibility table has no '{}' column", cols::COMPAT_NI);
            }
            return Self::default();
        };
        let text_col = table.column_index(cols::COMPAT_INCOMPATIBLE);
        if text_col.is_none() {
            log::warn!(
                "Compatibility table has no '{}' column - incompatibilities unavailable",
                cols::COMPAT_INCOMPATIBLE
            );
        }

        let entries = (0..table.len())
            .map(|row| {
                (
                    table.text(row, ni_col).trim().to_string(),
                    text_col.map(|col| table.text(row, col)),
                )
            })
            .collect();

        CompatibilityCatalog { entries }
    }

    #[cfg(test)]
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        CompatibilityCatalog {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    /// Incompatibility text of the first entry whose NI equals `ni`
    pub fn lookup(&self, ni: &str) -> String {
        let ni = ni.trim();
        if ni.is_empty() {
            return String::new();
        }
        self.entries
            .iter()
            .find(|(key, _)| key == ni)
            .and_then(|(_, text)| text.clone())
            .unwrap_or_default()
    }
}

/// Known storage areas
#[derive(Debug, Clone, PartialEq)]
pub struct Locations {
    names: Vec<String>,
}

impl Default for Locations {
    fn default() -> Self {
        Locations {
            names: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Locations {
    /// Build from the "Onde" column, falling back to the default set
    pub fn from_table(table: Option<&Table>) -> Self {
        let Some(table) = table else {
            log::warn!("Locations table not found, using default areas");
            return Self::default();
        };
        let Some(col) = table.column_index(cols::LOCATION) else {
            log::warn!(
                "Locations table has no '{}' column, using default areas",
                cols::LOCATION
            );
            return Self::default();
        };

        let mut names: Vec<String> = Vec::new();
        for name in table.column_texts(col) {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        if names.is_empty() {
            log::warn!("Locations table is empty, using default areas");
            return Self::default();
        }
        Locations { names }
    }

    #[cfg(test)]
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Locations {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `area` is acceptable: known, blank, or anything when no
    /// locations are configured
    pub fn accepts(&self, area: &str) -> bool {
        let area = area.trim();
        area.is_empty() || self.names.is_empty() || self.names.iter().any(|n| n == area)
    }
}

/// Immutable per-session view of all reference data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub materials: MaterialCatalog,
    pub compatibility: CompatibilityCatalog,
    pub locations: Locations,
}

impl CatalogSnapshot {
    /// Build from the three reference tables; absent tables degrade to empty
    /// catalogs (or the default locations)
    pub fn from_tables(
        materials: Option<&Table>,
        compatibility: Option<&Table>,
        locations: Option<&Table>,
    ) -> Self {
        let materials = match materials {
            Some(table) => MaterialCatalog::from_table(table),
            None => {
                log::warn!("Materials table not found, descriptions unavailable");
                MaterialCatalog::default()
            }
        };
        let compatibility = match compatibility {
            Some(table) => CompatibilityCatalog::from_table(table),
            None => {
                log::warn!("Compatibility table not found, incompatibilities unavailable");
                CompatibilityCatalog::default()
            }
        };

        CatalogSnapshot {
            materials,
            compatibility,
            locations: Locations::from_table(locations),
        }
    }

    pub fn lookup_description(&self, ni: &str) -> String {
        self.materials.lookup(ni)
    }

    pub fn lookup_incompatibility(&self, ni: &str) -> String {
        self.compatibility.lookup(ni)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::types::Cell;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(headers);
        for row in rows {
            t.push_row(row.iter().map(|c| Cell::text(*c)).collect());
        }
        t
    }

    #[test]
    fn test_description_lookup() {
        let materials = table(&["Código", "Descrição"], &[&["123", "Bolt"], &["456", "Nut"]]);
        let catalog = CatalogSnapshot::from_tables(Some(&materials), None, None);

        assert_eq!(catalog.lookup_description("123"), "Bolt");
        assert_eq!(catalog.lookup_description("999"), "");
        assert_eq!(catalog.lookup_description(""), "");
    }

    #[test]
    fn test_empty_catalog_lookups_are_empty() {
        let catalog = CatalogSnapshot::default();
        assert_eq!(catalog.lookup_description("123"), "");
        assert_eq!(catalog.lookup_incompatibility("123"), "");
    }

    #[test]
    fn test_first_matching_row_wins() {
        let materials = table(&["NI", "Desc"], &[&["7", "first"], &["7", "second"]]);
        let catalog = MaterialCatalog::from_table(&materials);
        assert_eq!(catalog.lookup("7"), "first");
    }

    #[test]
    fn test_numeric_keys_compare_as_text() {
        let mut materials = Table::new(&["NI", "Desc"]);
        materials.push_row(vec![Cell::Number(123.0), Cell::text("Bolt")]);
        let catalog = MaterialCatalog::from_table(&materials);
        assert_eq!(catalog.lookup("123"), "Bolt");
    }

    #[test]
    fn test_incompatibility_lookup() {
        let compat = table(
            &["NI", "Materiais Incompatíveis"],
            &[&["123", "Ácidos, Oxidantes"]],
        );
        let catalog = CatalogSnapshot::from_tables(None, Some(&compat), None);
        assert_eq!(catalog.lookup_incompatibility("123"), "Ácidos, Oxidantes");
        assert_eq!(catalog.lookup_incompatibility("999"), "");
    }

    #[test]
    fn test_incompatibility_without_text_column_is_empty() {
        let compat = table(&["NI", "Outro"], &[&["123", "x"]]);
        let catalog = CompatibilityCatalog::from_table(&compat);
        assert_eq!(catalog.lookup("123"), "");
    }

    #[test]
    fn test_locations_default_when_absent_or_empty() {
        assert_eq!(Locations::from_table(None).names().len(), 5);

        let empty = table(&["Onde"], &[]);
        assert_eq!(Locations::from_table(Some(&empty)), Locations::default());

        let blank = table(&["Onde"], &[&[""], &["  "]]);
        assert_eq!(Locations::from_table(Some(&blank)), Locations::default());
    }

    #[test]
    fn test_locations_are_unique_in_sheet_order() {
        let sheet = table(&["Onde"], &[&["Doca"], &["Pátio"], &["Doca"]]);
        let locations = Locations::from_table(Some(&sheet));
        assert_eq!(locations.names(), ["Doca", "Pátio"]);
    }

    #[test]
    fn test_locations_accept() {
        let locations = Locations::default();
        assert!(locations.accepts("Área 2"));
        assert!(locations.accepts(""));
        assert!(!locations.accepts("Telhado"));

        let open = Locations::new(Vec::<String>::new());
        assert!(open.accepts("Telhado"));
    }
}
