//! Table command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use lading_core::domain::catalog::{Table, parse_schema};
use lading_core::dto::table::CreateTable;

use crate::config::Config;

/// Table subcommands
#[derive(Subcommand)]
pub enum TableCommands {
    /// Create a table
    Create {
        /// Dataset to create the table in
        dataset: String,

        /// Name of the new table
        table: String,

        /// Column definitions, e.g. `Name:string,Age:integer`
        #[arg(short, long)]
        schema: Option<String>,
    },
    /// List the tables of a dataset
    List {
        dataset: String,
    },
    /// Delete a table
    Delete {
        dataset: String,
        table: String,
    },
}

/// Handle table commands
pub async fn handle_table_command(command: TableCommands, config: &Config) -> Result<()> {
    match command {
        TableCommands::Create {
            dataset,
            table,
            schema,
        } => create_table(config, &dataset, &table, schema.as_deref()).await,
        TableCommands::List { dataset } => list_tables(config, &dataset).await,
        TableCommands::Delete { dataset, table } => delete_table(config, &dataset, &table).await,
    }
}

async fn create_table(
    config: &Config,
    dataset: &str,
    table: &str,
    schema: Option<&str>,
) -> Result<()> {
    let schema = match schema {
        Some(raw) => parse_schema(raw)?,
        None => Vec::new(),
    };
    let req = CreateTable {
        table: config.table(dataset, table),
        schema,
    };

    let created = config
        .client()?
        .create_table(&req)
        .await
        .with_context(|| format!("Failed to create table {}", req.table))?;

    println!(
        "{}",
        format!("✓ Created table: {}", created.reference.table_id)
            .green()
            .bold()
    );
    for field in &created.schema {
        println!("    {} {}", field.name.cyan(), field.field_type.dimmed());
    }

    Ok(())
}

async fn list_tables(config: &Config, dataset: &str) -> Result<()> {
    let dataset = config.dataset(dataset);
    let tables = config
        .client()?
        .list_tables(&dataset)
        .await
        .with_context(|| format!("Failed to list tables of {}", dataset))?;

    if tables.is_empty() {
        println!("{}", format!("No tables found in {}.", dataset).yellow());
    } else {
        println!("{}", format!("Found {} table(s)!", tables.len()).bold());
        println!();
        for table in tables {
            print_table_summary(&table);
        }
    }

    Ok(())
}

async fn delete_table(config: &Config, dataset: &str, table: &str) -> Result<()> {
    let table = config.table(dataset, table);
    config
        .client()?
        .delete_table(&table)
        .await
        .with_context(|| format!("Failed to delete table {}", table))?;

    println!(
        "{}",
        format!("✓ Deleted table: {}", table.table_id).green().bold()
    );

    Ok(())
}

fn print_table_summary(table: &Table) {
    println!("  {} {}", "▸".cyan(), table.reference.table_id.bold());
    if let Some(created) = table.created_at {
        println!(
            "    Created: {}",
            created.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
}
