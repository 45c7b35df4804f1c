//! `browse` and `options` commands

pub mod handler;

use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct BrowseCommands {
    /// Only intakes from this supplier ("Todos" for any)
    #[arg(long, default_value = "Todos")]
    pub supplier: String,

    /// Only intakes with this status ("Todos" for any)
    #[arg(long, default_value = "Todos")]
    pub status: String,

    /// Only intakes stored in this area ("Todos" for any)
    #[arg(long, default_value = "Todos")]
    pub area: String,

    /// Skip the totals line in table output
    #[arg(long)]
    pub no_totals: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OptionsCommands {
    /// Output format (csv is treated as table)
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
