//! Project command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List the projects visible to the caller
    List,
}

pub async fn handle_project_command(command: ProjectCommands, config: &Config) -> Result<()> {
    match command {
        ProjectCommands::List => list_projects(config).await,
    }
}

async fn list_projects(config: &Config) -> Result<()> {
    let projects = config
        .client()?
        .list_projects()
        .await
        .context("Failed to list projects")?;

    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} project(s)!", projects.len()).bold());
    println!();
    for project in projects {
        println!("  {} {}", "▸".cyan(), project.id.bold());
        if let Some(name) = &project.name {
            println!("    Name:   {}", name.dimmed());
        }
        if let Some(state) = &project.state {
            println!("    State:  {}", state.dimmed());
        }
    }

    Ok(())
}
