//! ttgen - command-line client for the timetable generation server
//!
//! Uploads room, batch, course, reserved-slot, faculty and elective data,
//! lists and filters the course table, and downloads generated timetables.

use std::future::{pending, Future};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttgen_client::ui::{Notice, TerminalUi, UiPort};
use ttgen_client::{HttpBackend, UploadController, UploadFile};
use ttgen_common::api::DurationConstants;
use ttgen_common::config::{load_config, resolve_server_url, SERVER_URL_ENV};
use ttgen_common::{CourseFilter, Error, UploadCategory};

/// Command-line arguments for ttgen
#[derive(Parser, Debug)]
#[command(name = "ttgen")]
#[command(about = "Client for the timetable generation server")]
#[command(version)]
struct Args {
    /// Server base URL (overrides TTGEN_SERVER_URL and the config file)
    #[arg(short, long, global = true)]
    server_url: Option<String>,

    /// Config file (default: platform config dir, ttgen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    request_timeout: Option<u64>,

    /// Deadline for a whole bulk upload in seconds
    #[arg(long, global = true)]
    batch_timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload several CSV files, each routed by its file name
    UploadAll {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Upload one file to an explicit category
    Upload {
        /// room, batch, course, reserved, faculty or elective
        category: UploadCategory,
        file: PathBuf,
    },

    /// Show the course table and filter options
    Courses {
        /// Department to show (default: all)
        #[arg(short, long, default_value = "")]
        department: String,

        /// Semester number ("3" matches 3, 3A, 30...) or exact label ("3A")
        #[arg(short = 'S', long, default_value = "")]
        semester: String,
    },

    /// Save duration settings and download all generated timetables
    Generate {
        #[command(flatten)]
        durations: DurationArgs,

        /// Where to write the zip archive
        #[arg(short, long, default_value = "timetables.zip")]
        output: PathBuf,
    },

    /// Upload department timetables (.xlsx) used for faculty views
    DeptTimetables {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Download one faculty member's timetable
    FacultyTimetable {
        name: String,

        /// Output path (default: faculty_timetable_<name>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Duration overrides in 30-minute slots
#[derive(clap::Args, Debug)]
struct DurationArgs {
    #[arg(long)]
    lecture: Option<u32>,
    #[arg(long)]
    lab: Option<u32>,
    #[arg(long)]
    tutorial: Option<u32>,
    #[arg(long)]
    self_study: Option<u32>,
    #[arg(long = "break")]
    break_slots: Option<u32>,
    #[arg(long)]
    hour_slots: Option<u32>,
}

impl DurationArgs {
    fn apply(&self, base: DurationConstants) -> DurationConstants {
        DurationConstants {
            lecture_duration: self.lecture.unwrap_or(base.lecture_duration),
            lab_duration: self.lab.unwrap_or(base.lab_duration),
            tutorial_duration: self.tutorial.unwrap_or(base.tutorial_duration),
            self_study_duration: self.self_study.unwrap_or(base.self_study_duration),
            break_duration: self.break_slots.unwrap_or(base.break_duration),
            hour_slots: self.hour_slots.unwrap_or(base.hour_slots),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting ttgen v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let server_url = resolve_server_url(args.server_url.as_deref(), SERVER_URL_ENV, &config);
    let request_timeout = args
        .request_timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.request_timeout());
    let batch_timeout = args
        .batch_timeout
        .map(Duration::from_secs)
        .or_else(|| config.batch_timeout());
    info!("Server: {}", server_url);

    let backend = Arc::new(
        HttpBackend::new(&server_url, request_timeout).context("Failed to create HTTP client")?,
    );
    let ui = Arc::new(TerminalUi);
    let mut controller =
        UploadController::new(backend.clone(), ui.clone()).with_batch_timeout(batch_timeout);

    // Every command below stops waiting once this fires
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        on_signal.cancel();
    });

    let outcome = match args.command {
        Command::UploadAll { files } => {
            let files = read_files(&files).await?;
            controller.upload_all_with_cancel(&files, &cancel).await
        }
        Command::Upload { category, file } => {
            let file = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            until_cancelled(&cancel, controller.upload_one(category, &file)).await
        }
        Command::Courses {
            department,
            semester,
        } => {
            let mut controller = controller.with_filter(CourseFilter::new(&department, &semester));
            let result = until_cancelled(&cancel, controller.refresh_view()).await;
            if let Err(e) = &result {
                ui.notify(&Notice::Failure(format!("Failed to load courses: {}", e)));
            }
            result
        }
        Command::Generate { durations, output } => {
            let durations = durations.apply(config.durations());
            until_cancelled(&cancel, controller.generate(&durations, &output)).await
        }
        Command::DeptTimetables { files } => {
            let files = read_files(&files).await?;
            let result =
                until_cancelled(&cancel, backend.upload_department_timetables(&files)).await;
            match &result {
                Ok(sent) => ui.notify(&Notice::Success(format!(
                    "{} department timetable(s) uploaded",
                    sent
                ))),
                Err(e) => ui.notify(&Notice::Failure(format!("Upload failed: {}", e))),
            }
            result.map(|_| ())
        }
        Command::FacultyTimetable { name, output } => {
            let output = output.unwrap_or_else(|| default_faculty_output(&name));
            let result = until_cancelled(
                &cancel,
                download_faculty_timetable(&backend, &name, &output),
            )
            .await;
            match &result {
                Ok(()) => ui.notify(&Notice::Success(format!(
                    "Faculty timetable saved to {}",
                    output.display()
                ))),
                Err(e) => ui.notify(&Notice::Failure(e.to_string())),
            }
            result
        }
    };

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal, cancelling");
}

/// Run `request` unless `cancel` fires first
///
/// A request that has already finished keeps its result.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    request: impl Future<Output = ttgen_common::Result<T>>,
) -> ttgen_common::Result<T> {
    tokio::select! {
        biased;
        result = request => result,
        _ = cancel.cancelled() => {
            warn!("Cancelled before the server answered");
            Err(Error::Cancelled)
        }
    }
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

async fn download_faculty_timetable(
    backend: &HttpBackend,
    name: &str,
    output: &Path,
) -> ttgen_common::Result<()> {
    let workbook = backend.faculty_timetable(name).await?;
    tokio::fs::write(output, workbook).await?;
    Ok(())
}

/// `faculty_timetable_<name>.xlsx` keeping alphanumerics, dots and
/// underscores; spaces become underscores
fn default_faculty_output(name: &str) -> PathBuf {
    let safe: String = name
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_'))
        .collect::<String>()
        .trim_end()
        .replace(' ', "_");
    PathBuf::from(format!("faculty_timetable_{}.xlsx", safe))
}
