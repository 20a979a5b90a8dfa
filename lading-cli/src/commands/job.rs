//! Job command handlers
//!
//! Handles the transfer commands: submitting exports and imports, and
//! checking on the jobs they create.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::Path;
use lading_client::{JobPoller, JobSubmitter, PollOutcome};
use lading_core::domain::job::{Job, JobId, JobStatus};
use lading_core::domain::storage::ObjectRef;
use lading_core::domain::transfer::{Compression, DataFormat, SourceLocator, TransferRequest};
use tracing::debug;

use crate::config::{Config, WaitArgs};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination bucket
    pub bucket: String,

    /// Destination object name within the bucket
    pub file: String,

    /// Dataset of the source table
    pub dataset: String,

    /// Source table
    pub table: String,

    /// Output format (CSV, JSON or AVRO)
    #[arg(short, long, default_value_t = DataFormat::Csv)]
    pub format: DataFormat,

    /// Compress the exported file with gzip
    #[arg(long)]
    pub gzip: bool,

    /// Wait for the export to finish instead of returning the job ID
    #[arg(short, long)]
    pub wait: bool,

    #[command(flatten)]
    pub bounds: WaitArgs,
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// Job ID, as printed when the job was submitted
    pub job_id: String,

    /// Keep polling until the job finishes
    #[arg(short, long)]
    pub wait: bool,

    #[command(flatten)]
    pub bounds: WaitArgs,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Destination dataset
    pub dataset: String,

    /// Destination table
    pub table: String,

    /// Local path, or object name when `--bucket` is given
    pub file: String,

    /// Read the file from this bucket instead of the local filesystem
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Input format (CSV, JSON or AVRO); guessed from the file extension when omitted
    #[arg(short, long)]
    pub format: Option<DataFormat>,

    /// Return as soon as the job is submitted
    #[arg(short, long)]
    pub detach: bool,

    #[command(flatten)]
    pub bounds: WaitArgs,
}

impl ImportArgs {
    /// The explicit `--format`, else the one named by the file extension, else CSV
    pub fn input_format(&self) -> DataFormat {
        self.format
            .or_else(|| DataFormat::from_path(Path::new(&self.file)))
            .unwrap_or_default()
    }
}

/// Submit an export job, optionally waiting for it
pub async fn export(args: ExportArgs, config: &Config) -> Result<()> {
    let client = config.client()?;

    let request = TransferRequest::export(
        config.table(&args.dataset, &args.table),
        ObjectRef::new(args.bucket, args.file),
    )
    .with_format(args.format)
    .with_compression(Compression::from_gzip_flag(args.gzip));

    let job = JobSubmitter::new(client.clone())
        .submit(&request)
        .await
        .context("Failed to submit export job")?;

    println!("{}", "✓ Export job submitted!".green().bold());
    print_job_summary(&job);

    if !args.wait {
        println!(
            "{}",
            format!("  Check on it with: lading poll {}", job.id).dimmed()
        );
        return Ok(());
    }

    let done = JobPoller::new(client)
        .wait(&job.id, &args.bounds.policy())
        .await
        .with_context(|| format!("Export job {} did not complete", job.id))?;

    println!("{}", format!("✓ Completed job: {}", done.id).green().bold());
    print_job_details(&done);

    Ok(())
}

/// Check on a job once, or wait for it to finish
///
/// A job that is still pending or running is reported, not treated as an error.
pub async fn poll(args: PollArgs, config: &Config) -> Result<()> {
    let client = config.client()?;
    let poller = JobPoller::new(client);
    let job_id = JobId::new(args.job_id);

    if args.wait {
        let job = poller
            .wait(&job_id, &args.bounds.policy())
            .await
            .with_context(|| format!("Failed to wait for job {}", job_id))?;
        print_job_details(&job);
        return Ok(());
    }

    let outcome = poller
        .check(&job_id)
        .await
        .with_context(|| format!("Failed to check job {}", job_id))?;
    debug!("Job {} terminal: {}", job_id, outcome.is_terminal());

    match outcome {
        PollOutcome::InProgress(job) => {
            println!("Job {} status: {}", job.id.to_string().cyan(), colorize_status(job.status));
            println!("{}", "  Job is not done yet.".yellow());
            Ok(())
        }
        PollOutcome::Done(job) => {
            print_job_details(&job);
            Ok(())
        }
        failed @ PollOutcome::Failed(_) => {
            print_job_details(failed.job());
            failed.into_result().map(|_| ()).map_err(Into::into)
        }
    }
}

/// Submit an import job and, unless detached, wait for it
pub async fn import(args: ImportArgs, config: &Config) -> Result<()> {
    let client = config.client()?;
    let format = args.input_format();
    debug!("Importing {} as {}", args.file, format);

    let request = TransferRequest::import(
        SourceLocator::for_import(&args.file, args.bucket.as_deref()),
        config.table(&args.dataset, &args.table),
    )
    .with_format(format);

    let job = JobSubmitter::new(client.clone())
        .submit(&request)
        .await
        .context("Failed to submit import job")?;

    println!("{}", format!("✓ Started job: {}", job.id).green().bold());

    if args.detach {
        print_job_summary(&job);
        return Ok(());
    }

    let done = JobPoller::new(client)
        .wait(&job.id, &args.bounds.policy())
        .await
        .with_context(|| format!("Import job {} did not complete", job.id))?;

    println!("{}", format!("✓ Completed job: {}", done.id).green().bold());
    print_job_details(&done);

    Ok(())
}

/// Print the submission handle of a job
fn print_job_summary(job: &Job) {
    println!("  Job ID: {}", job.id.to_string().cyan());
    if let Some(kind) = job.kind {
        println!("  Kind:   {}", kind);
    }
    println!("  Status: {}", colorize_status(job.status));
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:        {}", job.id.to_string().cyan());
    if let Some(kind) = job.kind {
        println!("  Kind:      {}", kind);
    }
    println!("  Status:    {}", colorize_status(job.status));

    if let Some(metadata) = &job.metadata {
        if let Some(created) = metadata.created_at {
            println!("  Created:   {}", created.format("%Y-%m-%d %H:%M:%S"));
        }
        if let Some(started) = metadata.started_at {
            println!("  Started:   {}", started.format("%Y-%m-%d %H:%M:%S"));
        }
        if let Some(ended) = metadata.ended_at {
            println!("  Completed: {}", ended.format("%Y-%m-%d %H:%M:%S"));
        }
        if let Some(duration) = metadata.duration() {
            println!(
                "  Duration:  {:.1}s",
                duration.num_milliseconds() as f64 / 1000.0
            );
        }

        if !metadata.destination_uris.is_empty() {
            println!("\n{}", "Destination:".bold());
            for (i, uri) in metadata.destination_uris.iter().enumerate() {
                match metadata.destination_file_counts.get(i) {
                    Some(count) => println!("  {} ({} file(s))", uri.cyan(), count),
                    None => println!("  {}", uri.cyan()),
                }
            }
        }

        if let Some(table) = &metadata.destination_table {
            println!("\n{}", "Destination:".bold());
            println!("  {}", table.to_string().cyan());
            if let Some(rows) = metadata.output_rows {
                println!("  Rows:  {}", rows);
            }
            if let Some(bytes) = metadata.output_bytes {
                println!("  Bytes: {}", bytes);
            }
        }
    }

    if let Some(failure) = &job.error {
        println!("\n{}", "Error:".bold());
        println!("{}", failure.message.red());
        if let Some(location) = &failure.location {
            println!("  at {}", location.dimmed());
        }
        for detail in &failure.details {
            println!("  - {}", detail.dimmed());
        }
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Done => status_str.green(),
        JobStatus::Error => status_str.red(),
    }
}
