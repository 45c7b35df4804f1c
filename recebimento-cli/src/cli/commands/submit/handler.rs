//! Submit command handler

use anyhow::{Result, bail};
use chrono::Local;
use colored::*;
use is_terminal::IsTerminal;

use super::SubmitCommands;
use super::prompt::prompt_form;
use crate::cli::OutputFormat;
use crate::cli::output::{emit, records_to_csv, render_records, to_json};
use crate::intake::{IntakeForm, IntakeSession, SessionError};

pub async fn handle_submit_command(args: SubmitCommands, session: &IntakeSession) -> Result<()> {
    let form = if args.interactive {
        if !std::io::stdin().is_terminal() {
            bail!("--interactive needs a terminal; pass the fields as flags instead");
        }
        prompt_form(&args, session).await?
    } else {
        form_from_args(&args)
    };

    let record = match session.submit(form).await {
        Ok(record) => record,
        Err(SessionError::Validation(err)) => {
            bail!("{} {}", "⚠".yellow(), err);
        }
        Err(err) => return Err(err.into()),
    };

    let rendered = match args.format {
        OutputFormat::Table => render_records(std::slice::from_ref(&record)),
        OutputFormat::Json => format!("{}\n", to_json(&record)?),
        OutputFormat::Csv => records_to_csv(std::slice::from_ref(&record))?,
    };

    eprintln!(
        "{} Intake saved (controle {})",
        "✓".bright_green(),
        record.control.bright_green()
    );
    emit(&rendered, None)
}

fn form_from_args(args: &SubmitCommands) -> IntakeForm {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    IntakeForm {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        process_number: text(&args.process_number),
        invoice_number: text(&args.invoice_number),
        invoice_item: text(&args.invoice_item),
        material_item: text(&args.material_item),
        rr: text(&args.rr),
        rr2: text(&args.rr2),
        access_key: text(&args.access_key),
        supplier: text(&args.supplier),
        ni: text(&args.ni),
        quantity: args.quantity,
        description: args.description.clone(),
        material_type: text(&args.material_type),
        pallet_measure: text(&args.pallet_measure),
        scheduled: text(&args.scheduled),
        receiver: text(&args.receiver),
        status: args.status.unwrap_or_default(),
        area: text(&args.area),
        observation: text(&args.observation),
        control: args.control.clone(),
        test_period: args.test_period.unwrap_or_default(),
    }
}
