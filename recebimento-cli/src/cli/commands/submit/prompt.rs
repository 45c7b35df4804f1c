//! Interactive intake form

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::intake::{IntakeForm, IntakeSession, Status, TestPeriod, new_control_token};

use super::SubmitCommands;

/// Prompt for every form field, using flag values as initial text
pub async fn prompt_form(args: &SubmitCommands, session: &IntakeSession) -> Result<IntakeForm> {
    let theme = ColorfulTheme::default();
    let catalog = session.catalog().await?;

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let date: NaiveDate = Input::with_theme(&theme)
        .with_prompt("Data (AAAA-MM-DD)")
        .with_initial_text(today.to_string())
        .interact_text()
        .context("Failed to read date")?;

    let process_number = text(&theme, "01 - Nº Processo", args.process_number.as_deref())?;
    let invoice_number = text(&theme, "02 - NF", args.invoice_number.as_deref())?;
    let invoice_item = text(&theme, "03 - Item NF", args.invoice_item.as_deref())?;
    let material_item = text(&theme, "04 - Item Material na NF", args.material_item.as_deref())?;
    let rr = text(&theme, "05 - RR", args.rr.as_deref())?;
    let rr2 = text(&theme, "06 - RR", args.rr2.as_deref())?;
    let access_key = text(&theme, "07 - Chave de Acesso", args.access_key.as_deref())?;
    let supplier = text(&theme, "08 - Fornecedor", args.supplier.as_deref())?;
    let ni = text(&theme, "09 - NI (Número de Identificação)", args.ni.as_deref())?;

    let quantity: f64 = Input::with_theme(&theme)
        .with_prompt("10 - Quantidade")
        .with_initial_text(args.quantity.to_string())
        .validate_with(|q: &f64| -> Result<(), &str> {
            if q.is_finite() && *q >= 0.0 {
                Ok(())
            } else {
                Err("Quantidade deve ser >= 0")
            }
        })
        .interact_text()
        .context("Failed to read quantity")?;

    let seeded = args
        .description
        .clone()
        .unwrap_or_else(|| catalog.lookup_description(&ni));
    let description = text(&theme, "11 - Descrição Material", Some(&seeded))?;

    let material_type = text(&theme, "12 - Tipo", args.material_type.as_deref())?;
    let pallet_measure = text(&theme, "13 - Medida Pallets", args.pallet_measure.as_deref())?;
    let scheduled = text(&theme, "14 - Programado", args.scheduled.as_deref())?;
    let receiver = text(&theme, "15 - Recebedor", args.receiver.as_deref())?;

    let status_items: Vec<&str> = Status::all_variants()
        .iter()
        .map(|s| match s {
            Status::Unset => "(nenhum)",
            other => other.label(),
        })
        .collect();
    let status_idx = Select::with_theme(&theme)
        .with_prompt("16 - Status")
        .items(&status_items)
        .default(
            args.status
                .and_then(|s| Status::all_variants().iter().position(|v| *v == s))
                .unwrap_or(0),
        )
        .interact()
        .context("Failed to read status")?;
    let status = Status::all_variants()[status_idx];

    let area = prompt_area(&theme, catalog.locations.names(), args.area.as_deref())?;
    let observation = text(&theme, "Observação", args.observation.as_deref())?;

    let control_seed = args.control.clone().unwrap_or_else(new_control_token);
    let control = text(&theme, "Controle", Some(&control_seed))?;

    let period_items: Vec<&str> = TestPeriod::all_variants().iter().map(|p| p.label()).collect();
    let period_idx = Select::with_theme(&theme)
        .with_prompt("Teste")
        .items(&period_items)
        .default(
            args.test_period
                .and_then(|p| TestPeriod::all_variants().iter().position(|v| *v == p))
                .unwrap_or(0),
        )
        .interact()
        .context("Failed to read test period")?;

    Ok(IntakeForm {
        date,
        process_number,
        invoice_number,
        invoice_item,
        material_item,
        rr,
        rr2,
        access_key,
        supplier,
        ni,
        quantity,
        description: Some(description),
        material_type,
        pallet_measure,
        scheduled,
        receiver,
        status,
        area,
        observation,
        control: Some(control),
        test_period: TestPeriod::all_variants()[period_idx],
    })
}

fn text(theme: &ColorfulTheme, prompt: &str, initial: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    input
        .interact_text()
        .with_context(|| format!("Failed to read '{}'", prompt))
}

fn prompt_area(theme: &ColorfulTheme, locations: &[String], preset: Option<&str>) -> Result<String> {
    if locations.is_empty() {
        return text(theme, "17 - Área", preset);
    }

    let mut items = vec!["(nenhuma)".to_string()];
    items.extend(locations.iter().cloned());

    let default = preset
        .and_then(|p| locations.iter().position(|l| l == p))
        .map(|i| i + 1)
        .unwrap_or(0);

    let idx = Select::with_theme(theme)
        .with_prompt("17 - Área")
        .items(&items)
        .default(default)
        .interact()
        .context("Failed to read area")?;

    Ok(if idx == 0 {
        String::new()
    } else {
        items[idx].clone()
    })
}
