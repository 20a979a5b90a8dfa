//! Lading CLI
//!
//! Command-line interface for moving data between the warehouse and object
//! storage, and for managing the datasets and tables involved.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::{Config, EndpointArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lading")]
#[command(about = "Warehouse and object storage transfer CLI", long_about = None)]
struct Cli {
    /// Project to run jobs in
    #[arg(short, long, env = "GCLOUD_PROJECT")]
    project_id: String,

    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(cli.project_id, cli.endpoints);
    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::{DatasetCommands, TableCommands};
    use lading_core::domain::transfer::DataFormat;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lading").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_export() {
        let cli = parse(&[
            "-p",
            "proj",
            "export",
            "sample-bigquery-export",
            "data.json",
            "github_samples",
            "natality",
            "--format",
            "json",
            "--gzip",
        ]);

        assert_eq!(cli.project_id, "proj");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.bucket, "sample-bigquery-export");
                assert_eq!(args.file, "data.json");
                assert_eq!(args.dataset, "github_samples");
                assert_eq!(args.table, "natality");
                assert_eq!(args.format.to_string(), "JSON");
                assert!(args.gzip);
                assert!(!args.wait);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_parse_poll_defaults() {
        let cli = parse(&["--project-id", "proj", "poll", "job_12345ABCDE"]);

        match cli.command {
            Commands::Poll(args) => {
                assert_eq!(args.job_id, "job_12345ABCDE");
                assert!(!args.wait);
                assert!(args.bounds.max_attempts > 0);
            }
            _ => panic!("expected poll"),
        }
    }

    #[test]
    fn test_parse_import_with_bucket() {
        let cli = parse(&[
            "-p",
            "proj",
            "import",
            "my_dataset",
            "my_table",
            "data.csv",
            "--bucket",
            "my-bucket",
            "--detach",
        ]);

        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.bucket.as_deref(), Some("my-bucket"));
                assert!(args.detach);
            }
            _ => panic!("expected import"),
        }
    }

    fn import_args(extra: &[&str]) -> commands::ImportArgs {
        let mut args = vec!["-p", "proj", "import", "my_dataset", "my_table"];
        args.extend_from_slice(extra);
        match parse(&args).command {
            Commands::Import(args) => args,
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_import_format_follows_file_extension() {
        let args = import_args(&["data.json"]);
        assert_eq!(args.format, None);
        assert_eq!(args.input_format(), DataFormat::Json);

        let args = import_args(&["exports/rows.AVRO", "--bucket", "my-bucket"]);
        assert_eq!(args.input_format(), DataFormat::Avro);

        let args = import_args(&["data.txt"]);
        assert_eq!(args.input_format(), DataFormat::Csv);
    }

    #[test]
    fn test_import_explicit_format_wins_over_extension() {
        let args = import_args(&["data.json", "--format", "avro"]);
        assert_eq!(args.input_format(), DataFormat::Avro);
    }

    #[test]
    fn test_parse_nested_catalog_commands() {
        let cli = parse(&["-p", "proj", "dataset", "delete", "old", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Dataset {
                command: DatasetCommands::Delete { force: true, .. }
            }
        ));

        let cli = parse(&[
            "-p",
            "proj",
            "table",
            "create",
            "my_dataset",
            "people",
            "--schema",
            "Name:string,Age:integer",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Table {
                command: TableCommands::Create { schema: Some(_), .. }
            }
        ));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from([
            "lading", "-p", "proj", "export", "b", "f", "d", "t", "--format", "parquet",
        ]);
        assert!(result.is_err());
    }
}
