//! Open-house export and follow-up sequencing CLI
//!
//! Module structure:
//! - `domain/` - Core business types (Session, Visitor, Enrollment)
//! - `services/` - Business logic (formatting, CSV/PDF export, governor, sequence driver)
//! - `infra/` - Infrastructure (Config)
//! - `io/` - Filesystem output (ExportWriter)

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use openhouse_core::domain::{Enrollment, EnrollmentId, Session, UserId, Visitor};
use openhouse_core::infra::Config;
use openhouse_core::io::ExportWriter;
use openhouse_core::services::governor::{
    estimate_export_time, should_use_streaming, ExportFormat, ExportMetrics,
};
use openhouse_core::services::sequence::{
    is_touchpoint_due, EnrollmentRepository, SequenceDriver, TouchpointExecutor,
    TouchpointOutcome,
};
use openhouse_core::services::{generate_session_pdf, generate_visitor_csv};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Open-house visitor export and follow-up sequencing
#[derive(Parser, Debug)]
#[command(name = "openhouse-core", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a session's visitors to CSV or PDF
    Export {
        /// Session record (JSON)
        #[arg(long)]
        session: PathBuf,
        /// Visitor records (JSON array)
        #[arg(long)]
        visitors: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
    },
    /// Run due follow-up touchpoints from an enrollment file (dry run)
    Sequence {
        /// Enrollment records (JSON array)
        #[arg(long)]
        enrollments: PathBuf,
        /// Restrict the run to one user's enrollments
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Pdf,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FormatArg::Csv => "csv",
            FormatArg::Pdf => "pdf",
        })
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

/// Repository backed by a JSON file of enrollment records
///
/// Applies the repository contract locally: only unpaused, uncompleted
/// enrollments with a due touchpoint are returned.
struct FileEnrollmentStore {
    path: PathBuf,
}

#[async_trait]
impl EnrollmentRepository for FileEnrollmentStore {
    async fn pending_touchpoints(&self) -> anyhow::Result<Vec<Enrollment>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let enrollments: Vec<Enrollment> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok(enrollments
            .into_iter()
            .filter(|e| {
                !e.paused && e.completed_at.is_none() && is_touchpoint_due(e.next_touchpoint_at)
            })
            .collect())
    }
}

/// Dry-run executor: logs the touchpoint instead of sending anything
struct DryRunExecutor;

#[async_trait]
impl TouchpointExecutor for DryRunExecutor {
    async fn execute(&self, enrollment_id: &EnrollmentId) -> anyhow::Result<TouchpointOutcome> {
        info!(enrollment_id = %enrollment_id, "touchpoint_dry_run");
        Ok(TouchpointOutcome { success: true, error: None })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn run_export(
    config: &Config,
    session_path: &PathBuf,
    visitors_path: &PathBuf,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let session: Session = read_json(session_path)?;
    let visitors: Vec<Visitor> = read_json(visitors_path)?;

    info!(
        session_id = %session.session_id,
        visitors = %visitors.len(),
        format = %format.as_str(),
        estimated_ms = %estimate_export_time(visitors.len()),
        streaming_recommended = %should_use_streaming(visitors.len()),
        "export_starting"
    );

    let metrics = ExportMetrics::start(format, visitors.len());
    let bytes = match format {
        ExportFormat::Csv => generate_visitor_csv(&visitors, config.csv_fields())?.into_bytes(),
        ExportFormat::Pdf => generate_session_pdf(&session, &visitors)?,
    };
    metrics.complete(bytes.len());

    let writer = ExportWriter::new(config.output_dir());
    let path = writer.write(&session.session_id, format, &bytes)?;
    println!("{}", path.display());
    Ok(())
}

async fn run_sequence(
    config: &Config,
    enrollments_path: &PathBuf,
    user: Option<String>,
) -> anyhow::Result<()> {
    let driver = SequenceDriver::new(
        Arc::new(FileEnrollmentStore { path: enrollments_path.clone() }),
        Arc::new(DryRunExecutor),
        Duration::from_millis(config.touchpoint_timeout_ms()),
    );

    let report = match user {
        Some(user_id) => driver.process_pending_for_user(&UserId(user_id)).await,
        None => driver.process_all_pending().await,
    };

    println!("processed: {}", report.processed);
    println!("failed: {}", report.failed);
    for error in &report.errors {
        println!("error: {}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        version = %env!("CARGO_PKG_VERSION"),
        git_hash = %env!("GIT_HASH"),
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        output_dir = %config.output_dir(),
        "openhouse-core starting"
    );

    match args.command {
        Command::Export { session, visitors, format } => {
            run_export(&config, &session, &visitors, format.into()).await
        }
        Command::Sequence { enrollments, user } => {
            run_sequence(&config, &enrollments, user).await
        }
    }
}
