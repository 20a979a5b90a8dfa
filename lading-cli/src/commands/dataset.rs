//! Dataset command handlers
//!
//! Creation, listing, deletion and size reporting of datasets in the
//! configured project.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use lading_core::domain::catalog::Dataset;

use crate::config::Config;

const BYTES_PER_MB: f64 = 1_000_000.0;

/// Dataset subcommands
#[derive(Subcommand)]
pub enum DatasetCommands {
    /// Create a dataset
    Create {
        dataset: String,
    },
    /// List the datasets of the project
    List,
    /// Delete a dataset
    Delete {
        dataset: String,

        /// Also delete every table in the dataset
        #[arg(short, long)]
        force: bool,
    },
    /// Report the total size of the tables in a dataset
    Size {
        dataset: String,
    },
}

/// Handle dataset commands
///
/// # Arguments
/// * `command` - The dataset command to execute
/// * `config` - The CLI configuration
pub async fn handle_dataset_command(command: DatasetCommands, config: &Config) -> Result<()> {
    match command {
        DatasetCommands::Create { dataset } => create_dataset(config, &dataset).await,
        DatasetCommands::List => list_datasets(config).await,
        DatasetCommands::Delete { dataset, force } => {
            delete_dataset(config, &dataset, force).await
        }
        DatasetCommands::Size { dataset } => dataset_size(config, &dataset).await,
    }
}

async fn create_dataset(config: &Config, dataset: &str) -> Result<()> {
    let reference = config.dataset(dataset);
    let created = config
        .client()?
        .create_dataset(&reference)
        .await
        .with_context(|| format!("Failed to create dataset {}", reference))?;

    println!(
        "{}",
        format!("✓ Created dataset: {}", created.reference.dataset_id)
            .green()
            .bold()
    );
    if let Some(location) = &created.location {
        println!("  Location: {}", location.dimmed());
    }

    Ok(())
}

async fn list_datasets(config: &Config) -> Result<()> {
    let datasets = config
        .client()?
        .list_datasets(&config.project_id)
        .await
        .with_context(|| format!("Failed to list datasets of {}", config.project_id))?;

    if datasets.is_empty() {
        println!("{}", "No datasets found.".yellow());
    } else {
        println!("{}", format!("Found {} dataset(s)!", datasets.len()).bold());
        println!();
        for dataset in datasets {
            print_dataset_summary(&dataset);
        }
    }

    Ok(())
}

async fn delete_dataset(config: &Config, dataset: &str, force: bool) -> Result<()> {
    let reference = config.dataset(dataset);
    config
        .client()?
        .delete_dataset(&reference, force)
        .await
        .with_context(|| format!("Failed to delete dataset {}", reference))?;

    println!(
        "{}",
        format!("✓ Deleted dataset: {}", reference.dataset_id)
            .green()
            .bold()
    );

    Ok(())
}

async fn dataset_size(config: &Config, dataset: &str) -> Result<()> {
    let reference = config.dataset(dataset);
    let bytes = config
        .client()?
        .dataset_size(&reference)
        .await
        .with_context(|| format!("Failed to compute size of {}", reference))?;

    println!("Size of {}: {} MB", reference.dataset_id, bytes_to_mb(bytes));

    Ok(())
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

fn print_dataset_summary(dataset: &Dataset) {
    println!("  {} {}", "▸".cyan(), dataset.reference.dataset_id.bold());
    if let Some(name) = &dataset.friendly_name {
        println!("    Name:     {}", name.dimmed());
    }
    if let Some(location) = &dataset.location {
        println!("    Location: {}", location.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_decimal_megabytes() {
        assert_eq!(bytes_to_mb(1_000_000).to_string(), "1");
        assert_eq!(bytes_to_mb(2_500_000).to_string(), "2.5");
        assert_eq!(bytes_to_mb(0).to_string(), "0");
    }
}
