//! `lookup` and `init` commands

pub mod handler;

use clap::Args;

#[derive(Args, Debug)]
pub struct LookupCommands {
    /// NI of the material
    pub ni: String,
}
