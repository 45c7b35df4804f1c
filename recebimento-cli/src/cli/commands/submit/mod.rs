//! `submit` command

pub mod handler;
mod prompt;

use chrono::NaiveDate;
use clap::Args;

use crate::cli::OutputFormat;
use crate::intake::{Status, TestPeriod};

#[derive(Args, Debug, Default)]
pub struct SubmitCommands {
    /// Prompt for every field instead of reading flags
    #[arg(short, long)]
    pub interactive: bool,

    /// Intake date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// 01 - Nº Processo
    #[arg(long = "process")]
    pub process_number: Option<String>,

    /// 02 - NF
    #[arg(long = "invoice")]
    pub invoice_number: Option<String>,

    /// 03 - Item NF
    #[arg(long)]
    pub invoice_item: Option<String>,

    /// 04 - Item Material na NF
    #[arg(long)]
    pub material_item: Option<String>,

    /// 05 - RR
    #[arg(long)]
    pub rr: Option<String>,

    /// 06 - RR (second)
    #[arg(long)]
    pub rr2: Option<String>,

    /// 07 - Chave de Acesso
    #[arg(long)]
    pub access_key: Option<String>,

    /// 08 - Fornecedor
    #[arg(long)]
    pub supplier: Option<String>,

    /// 09 - NI (material identification)
    #[arg(long)]
    pub ni: Option<String>,

    /// 10 - Quantidade
    #[arg(long, default_value_t = 0.0)]
    pub quantity: f64,

    /// 11 - Descrição Material (default: catalog description of the NI)
    #[arg(long)]
    pub description: Option<String>,

    /// 12 - Tipo
    #[arg(long = "type")]
    pub material_type: Option<String>,

    /// 13 - Medida Pallets
    #[arg(long)]
    pub pallet_measure: Option<String>,

    /// 14 - Programado
    #[arg(long)]
    pub scheduled: Option<String>,

    /// 15 - Recebedor
    #[arg(long)]
    pub receiver: Option<String>,

    /// 16 - Status: Recebido, Pendente or "Em Análise"
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,

    /// 17 - Área
    #[arg(long)]
    pub area: Option<String>,

    /// Observação
    #[arg(long)]
    pub observation: Option<String>,

    /// Controle (default: a fresh 8-character token)
    #[arg(long)]
    pub control: Option<String>,

    /// Teste: "Outro Período" or "Período Atual"
    #[arg(long, value_parser = parse_test_period)]
    pub test_period: Option<TestPeriod>,

    /// Output format for the stored record
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

fn parse_status(text: &str) -> Result<Status, String> {
    Status::parse(text).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected Recebido, Pendente or Em Análise)",
            text
        )
    })
}

fn parse_test_period(text: &str) -> Result<TestPeriod, String> {
    TestPeriod::parse(text).ok_or_else(|| {
        format!(
            "unknown test period '{}' (expected Outro Período or Período Atual)",
            text
        )
    })
}
