//! Label command handler

use anyhow::{Result, bail};
use colored::*;

use super::LabelCommands;
use crate::cli::OutputFormat;
use crate::cli::output::{emit, to_json};
use crate::intake::{IntakeSession, SessionError};

pub async fn handle_label_command(args: LabelCommands, session: &IntakeSession) -> Result<()> {
    let ni = args.ni.trim();
    if ni.is_empty() {
        bail!("Selecione um NI para imprimir a etiqueta");
    }

    let label = match session.print_label(ni).await {
        Ok(label) => label,
        Err(SessionError::NotFound { ni }) => {
            bail!("{} Nenhum recebimento encontrado para o NI {}", "⚠".yellow(), ni);
        }
        Err(err) => return Err(err.into()),
    };

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&label)?),
        OutputFormat::Table | OutputFormat::Csv => print!("{}", label.render_text()),
    }

    if let Some(path) = args.html.as_deref() {
        emit(&label.render_html(), Some(path))?;
    }
    Ok(())
}
