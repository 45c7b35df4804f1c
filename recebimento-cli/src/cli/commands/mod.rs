//! Subcommands

pub mod browse;
pub mod catalog;
pub mod label;
pub mod submit;

use anyhow::Result;
use clap::Subcommand;

use crate::intake::IntakeSession;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new intake
    Submit(submit::SubmitCommands),
    /// List intakes with optional filters and totals
    Browse(browse::BrowseCommands),
    /// Show the values available for filters and labels
    Options(browse::OptionsCommands),
    /// Print the material label for the latest intake of an NI
    Label(label::LabelCommands),
    /// Look up a material's description and incompatibilities
    Lookup(catalog::LookupCommands),
    /// Create the intake table if it does not exist yet
    Init,
}

pub async fn run(command: Commands, session: &IntakeSession) -> Result<()> {
    match command {
        Commands::Submit(args) => submit::handler::handle_submit_command(args, session).await,
        Commands::Browse(args) => browse::handler::handle_browse_command(args, session).await,
        Commands::Options(args) => browse::handler::handle_options_command(args, session).await,
        Commands::Label(args) => label::handler::handle_label_command(args, session).await,
        Commands::Lookup(args) => catalog::handler::handle_lookup_command(args, session).await,
        Commands::Init => catalog::handler::handle_init_command(session).await,
    }
}
