//! Catalog lookup and table initialisation handlers

use anyhow::Result;
use colored::*;

use super::LookupCommands;
use crate::intake::IntakeSession;

pub async fn handle_lookup_command(args: LookupCommands, session: &IntakeSession) -> Result<()> {
    let catalog = session.catalog().await?;
    let ni = args.ni.trim();

    let description = catalog.lookup_description(ni);
    let incompatibility = catalog.lookup_incompatibility(ni);

    if description.is_empty() {
        println!("{} {}", "Descrição:".bold(), "(não cadastrado)".dimmed());
    } else {
        println!("{} {}", "Descrição:".bold(), description);
    }
    if !incompatibility.trim().is_empty() {
        println!(
            "{} {}",
            "Materiais Incompatíveis:".bold(),
            incompatibility.bright_red()
        );
    }
    Ok(())
}

pub async fn handle_init_command(session: &IntakeSession) -> Result<()> {
    let table = session.store().table_name().to_string();
    if session.init_table().await? {
        println!(
            "{} Created table '{}' in {}",
            "✓".bright_green(),
            table,
            session.backend().describe()
        );
    } else {
        println!(
            "Table '{}' already exists in {}",
            table,
            session.backend().describe()
        );
    }
    Ok(())
}
