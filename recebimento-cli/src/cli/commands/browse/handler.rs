//! Browse and options command handlers

use anyhow::Result;
use colored::*;

use super::{BrowseCommands, OptionsCommands};
use crate::cli::OutputFormat;
use crate::cli::output::{emit, records_to_csv, render_aggregates, render_records, to_json};
use crate::intake::{BrowseResult, FilterOptions, IntakeSession, RecordFilter};

pub async fn handle_browse_command(args: BrowseCommands, session: &IntakeSession) -> Result<()> {
    let filter = RecordFilter::new(
        Some(args.supplier.as_str()),
        Some(args.status.as_str()),
        Some(args.area.as_str()),
    );
    log::debug!("Browsing with {:?}", filter);

    let result = session.browse(&filter).await;
    let rendered = format_browse(&result, args.format, !args.no_totals)?;
    emit(&rendered, args.output.as_deref())
}

fn format_browse(result: &BrowseResult, format: OutputFormat, totals: bool) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = render_records(&result.rows);
            if totals && !result.rows.is_empty() {
                out.push('\n');
                out.push_str(&render_aggregates(&result.aggregates));
            }
            Ok(out)
        }
        OutputFormat::Json => Ok(format!("{}\n", to_json(result)?)),
        OutputFormat::Csv => records_to_csv(&result.rows),
    }
}

pub async fn handle_options_command(args: OptionsCommands, session: &IntakeSession) -> Result<()> {
    let options = session.options().await;
    let locations = match session.catalog().await {
        Ok(catalog) => catalog.locations.names().to_vec(),
        Err(err) => {
            log::warn!("Location list unavailable: {:#}", err);
            Vec::new()
        }
    };

    match args.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "suppliers": options.suppliers,
                "statuses": options.statuses,
                "areas": options.areas,
                "nis": options.nis,
                "locations": locations,
            });
            println!("{}", to_json(&value)?);
        }
        OutputFormat::Table | OutputFormat::Csv => {
            print!("{}", render_options(&options, &locations));
        }
    }
    Ok(())
}

fn render_options(options: &FilterOptions, locations: &[String]) -> String {
    let sections: [(&str, &[String]); 5] = [
        ("Fornecedores", options.suppliers.as_slice()),
        ("Status", options.statuses.as_slice()),
        ("Áreas", options.areas.as_slice()),
        ("NIs com recebimento", options.nis.as_slice()),
        ("Locais de armazenamento", locations),
    ];

    let mut out = String::new();
    for (title, values) in sections {
        out.push_str(&format!("{}\n", title.bold().cyan()));
        if values.is_empty() {
            out.push_str(&format!("  {}\n", "(nenhum)".dimmed()));
        }
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::IntakeRecord;
    use crate::intake::query::aggregate;

    fn result() -> BrowseResult {
        let rows = vec![IntakeRecord {
            ni: "123".to_string(),
            supplier: "Acme".to_string(),
            quantity: 4.0,
            ..Default::default()
        }];
        let aggregates = aggregate(&rows);
        BrowseResult { rows, aggregates }
    }

    #[test]
    fn test_table_includes_totals() {
        colored::control::set_override(false);
        let text = format_browse(&result(), OutputFormat::Table, true).unwrap();
        assert!(text.contains("Total: 1"));
        assert!(text.contains("Qtd Total: 4"));

        let bare = format_browse(&result(), OutputFormat::Table, false).unwrap();
        assert!(!bare.contains("Total:"));
    }

    #[test]
    fn test_json_carries_rows_and_aggregates() {
        let text = format_browse(&result(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["aggregates"]["count"], 1);
        assert_eq!(value["rows"][0]["ni"], "123");
    }

    #[test]
    fn test_options_lists_every_section() {
        colored::control::set_override(false);
        let options = FilterOptions {
            suppliers: vec!["Acme".to_string()],
            ..Default::default()
        };
        let text = render_options(&options, &["Almoxarifado A".to_string()]);
        assert!(text.contains("Fornecedores\n  Acme"));
        assert!(text.contains("Status\n  (nenhum)"));
        assert!(text.contains("Almoxarifado A"));
    }
}
