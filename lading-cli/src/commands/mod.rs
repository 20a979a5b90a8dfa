//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod dataset;
mod job;
mod project;
mod table;

pub use dataset::DatasetCommands;
pub use job::{ExportArgs, ImportArgs, PollArgs};
pub use project::ProjectCommands;
pub use table::TableCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Export a table to a storage object
    Export(ExportArgs),
    /// Check the status of a job
    Poll(PollArgs),
    /// Import a local file or storage object into a table
    Import(ImportArgs),
    /// Table management
    Table {
        #[command(subcommand)]
        command: TableCommands,
    },
    /// Dataset management
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },
    /// Project listing
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Export(args) => job::export(args, config).await,
        Commands::Poll(args) => job::poll(args, config).await,
        Commands::Import(args) => job::import(args, config).await,
        Commands::Table { command } => table::handle_table_command(command, config).await,
        Commands::Dataset { command } => dataset::handle_dataset_command(command, config).await,
        Commands::Project { command } => project::handle_project_command(command, config).await,
    }
}
