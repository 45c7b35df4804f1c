//! `label` command

pub mod handler;

use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct LabelCommands {
    /// NI of the material; the most recent intake for it is used
    pub ni: String,

    /// Also write a printable HTML label to this file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Output format (csv is treated as table)
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
