//! Command-line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::BackendKind;
use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "recebimento",
    version,
    about = "Record received-material intakes and print material labels"
)]
pub struct Cli {
    /// Config file (default: ~/.config/recebimento/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// CSV directory or workbook path, overrides the config file
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Workbook URL for the http backend, overrides the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned terminal table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// CSV with the persisted column layout
    Csv,
}
